//! Authentication infrastructure library
//!
//! Provides the cryptographic building blocks for the identity service:
//! - Argon2id digests, used both for password storage and for refresh-token
//!   digests persisted alongside the user
//! - JWT encoding/decoding (HS256), generic over the claims type
//!
//! The service defines its own claim structs and port traits and adapts these
//! implementations behind them. Access and refresh tokens are signed with two
//! independent secrets by holding two `JwtHandler` instances.
//!
//! # Examples
//!
//! ## Digests
//! ```
//! use auth::Hasher;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest).unwrap());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::JwtHandler;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Claims { sub: String }
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.encode(&Claims { sub: "user123".to_string() }).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod hashing;
pub mod jwt;

// Re-export commonly used items
pub use hashing::HashError;
pub use hashing::Hasher;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
