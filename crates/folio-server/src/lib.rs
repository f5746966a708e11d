//! HTTP relay between the chat page and the generation gateway.
//!
//! The server owns the request pipeline: parse and validate the chat
//! request, rate-limit by client address, compose the persona prompt,
//! then either stream fragments back as server-sent events or return a
//! single JSON reply.

pub mod config;
pub mod page;
pub mod relay;
pub mod routes;
pub mod state;

pub use config::RelayConfig;
pub use routes::router;
pub use state::AppState;
