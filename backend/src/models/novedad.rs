//! Models for novedades (incident reports) logged against a seguimiento.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One novedad row, as returned by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Novedad {
    pub id_novedad: i32,
    pub descripcion: String,
    /// Calendar day of the report, no time component.
    pub fecha: NaiveDate,
    /// Stored filename of the uploaded photo, if any.
    pub foto: Option<String>,
    pub seguimiento: i32,
    pub instructor: i32,
}

/// Fields accepted by the registrar/actualizar multipart forms. All of
/// them arrive as text parts; `foto` is the optional file part.
#[derive(Debug, Default)]
pub struct NovedadForm {
    pub descripcion: Option<String>,
    pub fecha: Option<String>,
    pub seguimiento: Option<String>,
    pub instructor: Option<String>,
    pub foto: Option<FotoSubida>,
}

/// Uploaded photo: original client filename plus raw bytes.
#[derive(Debug)]
pub struct FotoSubida {
    pub nombre: String,
    pub datos: Vec<u8>,
}
