//! Per-user conversation sessions for the routing engine.

pub mod session;
pub mod store;

pub use session::*;
pub use store::{InMemorySessionStore, SessionStore};

#[cfg(test)]
mod tests;
