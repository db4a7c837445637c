//! Modelo de Route
//!
//! Una ruta tiene dos extremos con nombre (start_point / end_point) y dos
//! slots opcionales de marshall, uno por extremo.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub route_id: i64,
    pub name: String,
    pub start_point: String,
    pub end_point: String,
    pub start_marshall_id: Option<i64>,
    pub end_marshall_id: Option<i64>,
}

impl Route {
    /// Extremo opuesto al stage dado. El stage de un matatu siempre alterna
    /// entre los dos extremos de su ruta; cualquier otro valor vuelve al
    /// punto de partida.
    pub fn opposite_stage(&self, stage: &str) -> &str {
        if stage == self.start_point {
            &self.end_point
        } else {
            &self.start_point
        }
    }

    /// True si alguno de los dos slots de marshall está ocupado
    pub fn has_marshall(&self) -> bool {
        self.start_marshall_id.is_some() || self.end_marshall_id.is_some()
    }

    /// True si el marshall ocupa alguno de los dos slots de esta ruta
    pub fn holds_marshall(&self, marshall_id: i64) -> bool {
        self.start_marshall_id == Some(marshall_id) || self.end_marshall_id == Some(marshall_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route {
            route_id: 1,
            name: "Route 46".to_string(),
            start_point: "Town".to_string(),
            end_point: "Estate".to_string(),
            start_marshall_id: None,
            end_marshall_id: Some(7),
        }
    }

    #[test]
    fn test_opposite_stage_alternates() {
        let r = route();
        assert_eq!(r.opposite_stage("Town"), "Estate");
        assert_eq!(r.opposite_stage("Estate"), "Town");
    }

    #[test]
    fn test_marshall_slots() {
        let r = route();
        assert!(r.has_marshall());
        assert!(r.holds_marshall(7));
        assert!(!r.holds_marshall(8));
    }
}
