//! Real-time collaborative note editing.
//!
//! The server side keeps an in-memory room registry (one room per note)
//! and fans WebSocket messages out to every other participant in the
//! room. The client side models the per-editor collaboration session,
//! the persisted session identity, and the remote caret overlay.
//!
//! Known limitation: content changes are full-document and
//! last-write-wins. Concurrent edits are not merged; whichever change
//! the server delivers last overwrites the others. See README.md.

pub mod client;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod ws;
