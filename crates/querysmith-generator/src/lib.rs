//! # Querysmith Generator
//!
//! Client for an OpenAI-compatible chat-completions service that turns a
//! natural-language description into query parts.
//!
//! Request bodies and reply parsing come from `querysmith_core::generate`;
//! this crate adds the HTTP side: bearer authentication, per-call deadlines
//! and bounded retries with exponential backoff.
//!
//! ## Architecture
//!
//! - **Client** (`client`): Model listing and part generation
//! - **Retry** (`retry`): Backoff policy and failure classification
//! - **Transport** (`transport`): HTTP round trips, swappable for tests
//! - **Error** (`error`): Generator error types

pub mod client;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::{GeneratorClient, ModelInfo};
pub use error::{GeneratorError, Result};
pub use retry::RetryPolicy;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
