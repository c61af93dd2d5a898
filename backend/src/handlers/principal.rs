use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::IntoParams;

use crate::config::Config;
use crate::error::AppError;
use crate::utils::archivos;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DescargaQuery {
    /// Bare filename inside the configured archivos directory.
    pub nombre: Option<String>,
}

/// `GET /principal/descargarPdf?nombre=...`: serves a stored PDF as an
/// attachment. Lookups are confined to the archivos directory; anything
/// that resolves outside of it is treated as an invalid name.
pub async fn descargar_pdf(
    State((_pool, config)): State<(PgPool, Config)>,
    Query(query): Query<DescargaQuery>,
) -> Result<Response, AppError> {
    let nombre = match query.nombre.as_deref().filter(|n| !n.is_empty()) {
        Some(n) if archivos::nombre_archivo_valido(n) => n.to_string(),
        _ => {
            return Err(AppError::BadRequest(
                "Debe proporcionar un nombre de archivo válido".to_string(),
            ))
        }
    };

    let ruta = archivos::resolver_confinado(&config.archivos_dir, &nombre)?
        .ok_or_else(|| AppError::NotFound("Archivo no encontrado".to_string()))?;

    let contenido = tokio::fs::read(&ruta)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    let disposition = format!("attachment; filename=\"{}\"", nombre);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|e| AppError::Internal(e.into()))?,
    );

    Ok((headers, contenido).into_response())
}
