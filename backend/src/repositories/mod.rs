pub mod novedad;
pub mod recuperacion;

pub use recuperacion::{PersonaStore, PgPersonaStore};
