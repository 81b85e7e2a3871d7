//! # auth-adapters
//!
//! Identity-boundary adapters: campus derivation from verified .edu emails
//! and the JWT session verifier (feature `auth-jwt`). Login and email
//! verification flows belong to the identity service, not the board.

pub mod campus;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use campus::campus_from_email;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtSessions;
