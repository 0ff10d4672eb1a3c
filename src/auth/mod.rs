//! Bearer-token authentication.
//!
//! Tokens are minted by the external auth provider; this service only
//! verifies them and reads the user id from `sub`.

mod claims;
mod extractors;
mod jwt;

pub use extractors::AuthUser;

#[cfg(test)]
pub(crate) use jwt::testing;
