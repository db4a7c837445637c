//! Modelo de CheckInOutLog
//!
//! Una fila por ciclo check-in/check-out de un matatu en un stage. La fila
//! con check_out_time en NULL es el marcador "actualmente en el stage";
//! después del check-out la fila no se vuelve a mutar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckInOutLog {
    pub id: i64,
    pub plate_number: String,
    pub stage_name: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub trip_number: i32,
}
