//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Validates email format.
///
/// Requirements:
/// - Exactly one `@` with a non-empty local part
/// - Domain part containing an interior dot
/// - No whitespace anywhere
pub fn validar_correo(correo: &str) -> Result<(), ValidationError> {
    let invalido = || {
        ValidationError::new("correo_invalido")
            .with_message("Formato de correo electrónico inválido".into())
    };

    if correo.chars().any(|c| c.is_whitespace()) {
        return Err(invalido());
    }

    let (local, dominio) = match correo.split_once('@') {
        Some(partes) => partes,
        None => return Err(invalido()),
    };

    if local.is_empty() || dominio.is_empty() || dominio.contains('@') {
        return Err(invalido());
    }

    let punto_interior = dominio
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < dominio.len() - 1);
    if !punto_interior {
        return Err(invalido());
    }

    Ok(())
}

/// Validates password strength.
///
/// Requirements:
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter and one digit
/// - At least one special character from `!@#$%^&*`
pub fn validar_password(password: &str) -> Result<(), ValidationError> {
    let tiene_mayuscula = password.chars().any(|c| c.is_ascii_uppercase());
    let tiene_minuscula = password.chars().any(|c| c.is_ascii_lowercase());
    let tiene_digito = password.chars().any(|c| c.is_ascii_digit());
    let tiene_especial = password.chars().any(|c| "!@#$%^&*".contains(c));

    if password.chars().count() < 8
        || !tiene_mayuscula
        || !tiene_minuscula
        || !tiene_digito
        || !tiene_especial
    {
        return Err(ValidationError::new("password_debil").with_message(
            "La contraseña debe tener al menos 8 caracteres, incluir mayúsculas, minúsculas, números y caracteres especiales como *"
                .into(),
        ));
    }

    Ok(())
}

/// Checks the `AAAA-MM-DD` digit grouping of a date string.
///
/// Only the shape is checked here; calendar validity is left to the
/// database `DATE` cast.
pub fn fecha_valida(fecha: &str) -> bool {
    let bytes = fecha.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correo_rejects_missing_at() {
        assert!(validar_correo("usuario.correo.com").is_err());
    }

    #[test]
    fn correo_rejects_domain_without_dot() {
        assert!(validar_correo("usuario@correo").is_err());
    }

    #[test]
    fn correo_rejects_whitespace() {
        assert!(validar_correo("usuario @correo.com").is_err());
    }

    #[test]
    fn correo_rejects_edge_dots() {
        assert!(validar_correo("usuario@.com").is_err());
        assert!(validar_correo("usuario@correo.").is_err());
    }

    #[test]
    fn correo_accepts_valid() {
        assert!(validar_correo("usuario@correo.com").is_ok());
        assert!(validar_correo("a.b@sub.dominio.co").is_ok());
    }

    #[test]
    fn password_rejects_short() {
        assert!(validar_password("Ab1*").is_err());
    }

    #[test]
    fn password_rejects_missing_classes() {
        assert!(validar_password("minusculas1*").is_err());
        assert!(validar_password("MAYUSCULAS1*").is_err());
        assert!(validar_password("SinDigitos*").is_err());
        assert!(validar_password("SinEspecial1").is_err());
    }

    #[test]
    fn password_accepts_valid() {
        assert!(validar_password("Segura123*").is_ok());
    }

    #[test]
    fn fecha_accepts_digit_grouping() {
        assert!(fecha_valida("2024-01-15"));
        // Shape-only check: out-of-range components pass here.
        assert!(fecha_valida("2024-13-40"));
    }

    #[test]
    fn fecha_rejects_wrong_shape() {
        assert!(!fecha_valida("15-01-2024"));
        assert!(!fecha_valida("2024/01/15"));
        assert!(!fecha_valida("2024-1-15"));
        assert!(!fecha_valida(""));
    }
}
