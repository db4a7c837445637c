//! Utilidades de validación
//!
//! Validadores compartidos por los DTOs de request: matrículas,
//! teléfonos y roles. Las matrículas se canonicalizan a mayúsculas
//! antes de tocar la base de datos.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Matrícula: alfanumérica con espacios opcionales, 5 a 10 caracteres
    static ref PLATE_NUMBER_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]{3,8}[A-Za-z0-9]$").unwrap();

    /// Teléfono en formato internacional E.164
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap();
}

/// Canonicaliza una matrícula: trim + mayúsculas
pub fn canonical_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

pub fn validate_plate_number(plate: &str) -> Result<(), ValidationError> {
    if !PLATE_NUMBER_RE.is_match(plate.trim()) {
        let mut error = ValidationError::new("plate_number");
        error.message = Some("Plate number must be 5 to 10 alphanumeric characters".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if !PHONE_RE.is_match(phone) {
        let mut error = ValidationError::new("phone_number");
        error.message = Some("Invalid phone number format".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_account_role(role: &str) -> Result<(), ValidationError> {
    match role.to_uppercase().as_str() {
        "DRIVER" | "MARSHALL" => Ok(()),
        _ => {
            let mut error = ValidationError::new("role");
            error.message = Some("Role must be DRIVER or MARSHALL".into());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_plate() {
        assert_eq!(canonical_plate("  kbx 123a "), "KBX 123A");
        assert_eq!(canonical_plate("KDA001B"), "KDA001B");
    }

    #[test]
    fn test_plate_number_bounds() {
        assert!(validate_plate_number("KBX 123A").is_ok());
        assert!(validate_plate_number("KDA001B").is_ok());
        // demasiado corta
        assert!(validate_plate_number("KB1").is_err());
        // demasiado larga
        assert!(validate_plate_number("KBX 123456789").is_err());
        assert!(validate_plate_number("KBX-123A").is_err());
    }

    #[test]
    fn test_phone_number() {
        assert!(validate_phone_number("+254745115711").is_ok());
        assert!(validate_phone_number("0712345678").is_err());
        assert!(validate_phone_number("not-a-phone").is_err());
    }

    #[test]
    fn test_account_role() {
        assert!(validate_account_role("DRIVER").is_ok());
        assert!(validate_account_role("marshall").is_ok());
        assert!(validate_account_role("ADMIN").is_err());
        assert!(validate_account_role("CONDUCTOR").is_err());
    }
}
