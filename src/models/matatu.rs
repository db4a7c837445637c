//! Modelo de Matatu
//!
//! Este módulo contiene el struct Matatu y el enum de estados operativos.
//! Mapea exactamente a la tabla matatus con primary key plate_number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado operativo del matatu. Se persiste como TEXT con la forma
/// canónica en minúsculas ("in-maintenance" incluido).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatatuStatus {
    Available,
    Assigned,
    Boarding,
    Enroute,
    InMaintenance,
    Breakdown,
    Delay,
}

impl MatatuStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatatuStatus::Available => "available",
            MatatuStatus::Assigned => "assigned",
            MatatuStatus::Boarding => "boarding",
            MatatuStatus::Enroute => "enroute",
            MatatuStatus::InMaintenance => "in-maintenance",
            MatatuStatus::Breakdown => "breakdown",
            MatatuStatus::Delay => "delay",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "available" => Some(MatatuStatus::Available),
            "assigned" => Some(MatatuStatus::Assigned),
            "boarding" => Some(MatatuStatus::Boarding),
            "enroute" => Some(MatatuStatus::Enroute),
            "in-maintenance" => Some(MatatuStatus::InMaintenance),
            "breakdown" => Some(MatatuStatus::Breakdown),
            "delay" => Some(MatatuStatus::Delay),
            _ => None,
        }
    }
}

/// Matatu principal - mapea exactamente a la tabla matatus
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Matatu {
    pub plate_number: String,
    pub capacity: i32,
    pub model: String,
    pub status: String,
    pub route_id: Option<i64>,
    pub current_stage: Option<String>,
    pub trip_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Matatu {
    pub fn is_in_maintenance(&self) -> bool {
        MatatuStatus::parse(&self.status) == Some(MatatuStatus::InMaintenance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            MatatuStatus::Available,
            MatatuStatus::Assigned,
            MatatuStatus::Boarding,
            MatatuStatus::Enroute,
            MatatuStatus::InMaintenance,
            MatatuStatus::Breakdown,
            MatatuStatus::Delay,
        ] {
            assert_eq!(MatatuStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(MatatuStatus::parse("Boarding"), Some(MatatuStatus::Boarding));
        assert_eq!(
            MatatuStatus::parse("IN-MAINTENANCE"),
            Some(MatatuStatus::InMaintenance)
        );
        assert_eq!(MatatuStatus::parse("flying"), None);
    }
}
