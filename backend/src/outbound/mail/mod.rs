//! Mail delivery adapters.

mod tracing_mailer;

pub use tracing_mailer::TracingMailer;
