use axum::{extract::Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::error::AppError;
use crate::models::persona::{
    CambiarRequest, CodigoEnviado, RecuperarRequest, TokenValido, VerificarRequest,
};
use crate::models::MensajeRespuesta;
use crate::services::recuperacion::{
    RecuperacionError, RecuperacionService, VALIDEZ_CODIGO_MINUTOS,
};

/// `POST /recuperar/recuperar`: emails a six-digit recovery code.
pub async fn recuperar(
    Extension(servicio): Extension<Arc<RecuperacionService>>,
    Json(payload): Json<RecuperarRequest>,
) -> Result<Json<CodigoEnviado>, AppError> {
    payload.validate()?;

    match servicio.emitir(&payload.correo).await {
        Ok(()) => Ok(Json(CodigoEnviado {
            message: "Código de verificación enviado exitosamente".to_string(),
            expira_en: VALIDEZ_CODIGO_MINUTOS,
        })),
        Err(RecuperacionError::UsuarioNoEncontrado) => Err(AppError::NotFound(
            "No se encontró un usuario activo con este correo".to_string(),
        )),
        Err(RecuperacionError::SolicitudReciente { minutos }) => {
            Err(AppError::RateLimited { minutos })
        }
        Err(err) => Err(AppError::Internal(err.into())),
    }
}

/// `POST /recuperar/verificar`: checks a code without consuming it.
pub async fn verificar(
    Extension(servicio): Extension<Arc<RecuperacionService>>,
    Json(payload): Json<VerificarRequest>,
) -> Result<Json<TokenValido>, AppError> {
    match servicio.verificar(&payload.token).await {
        Ok(persona) => Ok(Json(TokenValido {
            message: "Token válido".to_string(),
            email: persona.correo,
        })),
        Err(RecuperacionError::TokenInvalido) => Err(AppError::BadRequest(
            "Token inválido o expirado".to_string(),
        )),
        Err(err) => Err(AppError::Internal(err.into())),
    }
}

/// `PUT /recuperar/cambiar`: consumes the code and stores the new
/// password.
pub async fn cambiar(
    Extension(servicio): Extension<Arc<RecuperacionService>>,
    Json(payload): Json<CambiarRequest>,
) -> Result<Json<MensajeRespuesta>, AppError> {
    payload.validate()?;

    match servicio.cambiar(&payload.token, &payload.password).await {
        Ok(()) => Ok(Json(MensajeRespuesta::new(
            "Contraseña actualizada exitosamente",
        ))),
        Err(RecuperacionError::TokenInvalido) => Err(AppError::BadRequest(
            "Código inválido o expirado".to_string(),
        )),
        Err(RecuperacionError::PasswordIgual) => Err(AppError::BadRequest(
            "La nueva contraseña debe ser diferente a la anterior".to_string(),
        )),
        Err(err) => Err(AppError::Internal(err.into())),
    }
}
