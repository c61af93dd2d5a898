//! Data models shared across database access and API handlers.

use serde::Serialize;
use utoipa::ToSchema;

/// Plain acknowledgement body used by most endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MensajeRespuesta {
    pub message: String,
}

impl MensajeRespuesta {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod novedad;
pub mod persona;
