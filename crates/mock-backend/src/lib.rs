//! Mock backend implementations.
//!
//! Deterministic [`Backend`] implementations for exercising the turn
//! pipeline without any external provider:
//!
//! - [`StaticBackend`] - always answers with a fixed reply
//! - [`EchoBackend`] - answers with the newest user message
//! - [`FailingBackend`] - always fails with a chosen error
//!
//! [`Backend`]: backend_core::Backend

mod echo;
mod failing;
mod static_reply;

pub use echo::EchoBackend;
pub use failing::FailingBackend;
pub use static_reply::StaticBackend;
