use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error payload returned by every endpoint. The body always carries a
/// `message` field; `tiempoRestante` only appears on rate-limited replies.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(rename = "tiempoRestante", skip_serializing_if = "Option::is_none")]
    pub tiempo_restante: Option<i64>,
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Write operations that touch no rows answer 403 with an
    /// operation-specific message.
    OperationFailed(String),
    /// Another recovery code is still active; `minutos` is the ceiling of
    /// the time left until it expires.
    RateLimited { minutos: i64 },
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, tiempo_restante) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::OperationFailed(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::RateLimited { minutos } => (
                StatusCode::TOO_MANY_REQUESTS,
                format!(
                    "Por favor espere {} minutos antes de solicitar otro código",
                    minutos
                ),
                Some(minutos),
            ),
            AppError::Internal(err) => {
                tracing::error!("Error del servidor: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error del servidor".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            message,
            tiempo_restante,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Recurso no encontrado".to_string()),
            _ => AppError::Internal(err.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Solicitud inválida".to_string());
        AppError::BadRequest(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let response = AppError::BadRequest("Fecha no válida".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Fecha no válida");
        assert!(json.get("tiempoRestante").is_none());

        let response =
            AppError::NotFound("No hay novedades registradas para este seguimiento".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(
            json["message"],
            "No hay novedades registradas para este seguimiento"
        );

        let response =
            AppError::OperationFailed("Error al registrar la novedad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Error al registrar la novedad");
    }

    #[tokio::test]
    async fn app_error_rate_limited_includes_minutes() {
        let response = AppError::RateLimited { minutos: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = response_json(response).await;
        assert_eq!(
            json["message"],
            "Por favor espere 42 minutos antes de solicitar otro código"
        );
        assert_eq!(json["tiempoRestante"], 42);
    }

    #[tokio::test]
    async fn app_error_internal_maps_to_generic_message() {
        let response = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Error del servidor");
        assert!(json.get("tiempoRestante").is_none());
    }

    #[tokio::test]
    async fn validation_errors_surface_first_message() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(custom(function = crate::validation::rules::validar_correo))]
            correo: String,
        }

        let payload = Payload {
            correo: "sin-arroba".to_string(),
        };
        let err = payload.validate().unwrap_err();
        let app_err: AppError = err.into();
        let response = app_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Formato de correo electrónico inválido");
    }
}
