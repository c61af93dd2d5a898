pub mod recuperacion;

pub use recuperacion::{RecuperacionError, RecuperacionService};
