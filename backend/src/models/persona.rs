//! Models for personas and the password-recovery payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::rules;

/// Database representation of a persona (aprendiz or instructor).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Persona {
    pub id_persona: i32,
    /// National identification number, used to look aprendices up.
    pub identificacion: i64,
    pub nombres: String,
    pub correo: String,
    /// Bcrypt hash of the password, never serialized in responses.
    #[serde(skip_serializing)]
    pub password: String,
    /// Only personas with estado `Activo` may recover their password.
    pub estado: String,
    /// Six-digit recovery code, null while no recovery is in flight.
    pub reset_password_token: Option<String>,
    /// Expiry of the recovery code, null alongside the token.
    pub reset_password_expires: Option<DateTime<Utc>>,
}

impl Persona {
    pub fn activo(&self) -> bool {
        self.estado == "Activo"
    }
}

/// Body of `POST /recuperar/recuperar`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecuperarRequest {
    #[serde(default)]
    #[validate(custom(function = rules::validar_correo))]
    pub correo: String,
}

/// Body of `POST /recuperar/verificar`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerificarRequest {
    #[serde(default)]
    pub token: String,
}

/// Body of `PUT /recuperar/cambiar`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CambiarRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    #[validate(custom(function = rules::validar_password))]
    pub password: String,
}

/// Success body of `POST /recuperar/recuperar`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CodigoEnviado {
    pub message: String,
    /// Minutes until the emailed code expires.
    #[serde(rename = "expiraEn")]
    pub expira_en: i64,
}

/// Success body of `POST /recuperar/verificar`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenValido {
    pub message: String,
    /// Correo of the persona that owns the code, shown by the frontend.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_nunca_serializa_password() {
        let persona = Persona {
            id_persona: 1,
            identificacion: 1073228955,
            nombres: "Juan Pérez".into(),
            correo: "juan@correo.com".into(),
            password: "$2b$12$hash".into(),
            estado: "Activo".into(),
            reset_password_token: None,
            reset_password_expires: None,
        };

        let json = serde_json::to_value(&persona).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["correo"], "juan@correo.com");
    }

    #[test]
    fn recuperar_request_valida_correo() {
        let ok = RecuperarRequest {
            correo: "juan@correo.com".into(),
        };
        assert!(ok.validate().is_ok());

        let mal = RecuperarRequest {
            correo: "juan-en-correo".into(),
        };
        assert!(mal.validate().is_err());
    }

    #[test]
    fn cambiar_request_valida_password() {
        let ok = CambiarRequest {
            token: "348921".into(),
            password: "NuevaClave1*".into(),
        };
        assert!(ok.validate().is_ok());

        let debil = CambiarRequest {
            token: "348921".into(),
            password: "alllowercase1!".into(),
        };
        assert!(debil.validate().is_err());
    }

    #[test]
    fn campos_ausentes_se_toman_como_vacios() {
        let req: CambiarRequest = serde_json::from_str("{}").unwrap();
        assert!(req.token.is_empty());
        assert!(req.validate().is_err());
    }
}
