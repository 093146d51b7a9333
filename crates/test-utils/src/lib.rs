//! # Test Utilities
//!
//! Shared test utilities for the token service, key service and room client.
//!
//! This crate provides:
//! - Deterministic fixtures (fixed signing secret and shared key)
//! - Test data builders (`TestTokenBuilder`)
//! - Server test harnesses (`TestTokenServer`, `TestKeyServer`)
//! - Fakes for the room client seams (`MockRoomTransport`,
//!   `MockCredentialProvider`)
//! - Fixed test identities
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestTokenServer::spawn().await?;
//!
//!     let token = TestTokenBuilder::new().for_user(TEST_USER_ALICE).sign();
//!     token.assert_valid_jwt().assert_for_user(TEST_USER_ALICE);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod mock_credentials;
pub mod mock_transport;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use mock_credentials::*;
pub use mock_transport::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
