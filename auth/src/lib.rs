//! Authentication utilities library
//!
//! Provides the authentication infrastructure for the marketplace service:
//! - Password hashing (Argon2id)
//! - Bearer token issuing and verification (HS256, fixed 24h lifetime)
//! - Authentication coordination (password check + token issue)
//!
//! Tokens are self-contained: verification is a pure function of the token,
//! the shared secret and the caller-supplied clock. There is no revocation
//! list, so a compromised token stays valid until its natural expiry.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenCodec};
//! use chrono::Utc;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//! let token = codec.issue("alice@example.com", Role::User, now).unwrap();
//! let identity = codec.verify(&token, now).unwrap();
//! assert_eq!(identity.subject, "alice@example.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Role};
//! use chrono::Utc;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let digest = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth
//!     .authenticate("password123", &digest, "alice@example.com", Role::User, Utc::now())
//!     .unwrap();
//!
//! // Gate: verify token
//! let identity = auth.verify_token(&result.access_token, Utc::now()).unwrap();
//! assert_eq!(identity.role, Role::User);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Identity;
pub use token::Role;
pub use token::TokenCodec;
pub use token::TokenError;
