//! Core domain logic for the Folio persona chat relay.
//!
//! Everything here is synchronous and side-effect free: sanitization of
//! text crossing the relay boundary, validation of client-supplied
//! conversation history, persona prompt composition, and per-client
//! request rate limiting. The HTTP layer and the generation gateway live
//! in their own crates and call into this one.

pub mod config;
pub mod history;
pub mod persona;
pub mod prompt;
pub mod rate_limit;
pub mod sanitize;
