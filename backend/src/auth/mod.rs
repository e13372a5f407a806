//! Authentication module for username/password login with JWT bearer tokens.
//!
//! This module provides:
//! - bcrypt password hashing
//! - JWT token creation and validation against an injectable clock
//! - register / login / logout handlers
//! - the `AuthUser` extractor that protects routes

pub mod clock;
mod handlers;
mod jwt;
mod middleware;
mod password;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use handlers::{login, logout, register};
pub use jwt::{TokenError, TokenService};
pub use middleware::authenticate;
pub use password::PasswordHasher;
pub use types::{AuthUser, Claims};
