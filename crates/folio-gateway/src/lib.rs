//! Generation gateway for the Folio persona chat relay.
//!
//! [`client::GenerationClient`] is the seam between the relay and the
//! external text-generation service. The HTTP implementation talks to a
//! Gemini-style `generateContent` endpoint in both one-shot and
//! streaming form; the mock implementation serves canned replies for
//! tests.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GenerationClient, HttpGenerationClient, MockGenerationClient, TextStream};
pub use error::{GatewayError, Result};
