//! Authentication implementations.

#[cfg(feature = "auth")]
mod password;
mod token;

#[cfg(feature = "auth")]
pub use password::{Argon2PasswordService, PasswordConfig};
pub use token::UuidTokenGenerator;
