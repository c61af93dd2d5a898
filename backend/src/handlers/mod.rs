pub mod novedades;
pub mod principal;
pub mod recuperar;
