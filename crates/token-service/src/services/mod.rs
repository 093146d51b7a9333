pub mod token_service;

pub use token_service::{IssuedToken, TokenService, Verification};
