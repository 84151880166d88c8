pub mod password;
pub mod tokens;

pub use password::Argon2PasswordHasher;
pub use tokens::JwtTokenSigner;
