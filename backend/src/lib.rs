//! Account backend for the ArewaDeliver marketplace.
//!
//! The crate follows a ports-and-adapters layout. [`domain`] owns the account
//! model and the registration, login and password reset flows; [`outbound`]
//! provides storage, hashing and mail adapters; [`inbound`] exposes the flows
//! over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::RequestSpan;
