//! Security adapters for the password capability ports.

mod argon2_password;

pub use argon2_password::Argon2PasswordHasher;
