//! Envelope de respuesta de la API
//!
//! Toda respuesta del sistema, éxito o fallo, viaja en el mismo envelope
//! `{status: 1|0, message, data}`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 1 para éxito, 0 para fallo
    pub status: u8,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 1,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            status: 1,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::success("Matatu retrieved successfully", 42);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], 1);
        assert_eq!(value["message"], "Matatu retrieved successfully");
        assert_eq!(value["data"], 42);

        let failure: ApiResponse<()> = ApiResponse::failure("Matatu not found");
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["status"], 0);
        assert!(value["data"].is_null());
    }
}
