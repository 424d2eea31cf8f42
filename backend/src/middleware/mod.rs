//! Actix middleware shared by every route.

pub mod request_span;

pub use request_span::RequestSpan;
