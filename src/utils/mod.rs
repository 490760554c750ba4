pub mod jwt;
pub mod password;
pub mod validate;

pub use jwt::*;
pub use password::*;
pub use validate::*;
