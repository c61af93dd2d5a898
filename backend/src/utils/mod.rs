pub mod archivos;
pub mod email;
pub mod jwt;
pub mod password;

pub use email::*;
pub use jwt::*;
pub use password::*;
