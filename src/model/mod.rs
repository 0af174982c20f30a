//! Typed entities mapped from raw backend payloads.
//!
//! Nothing here talks to the network. Each entity has a `pub(crate)`
//! `from_raw` constructor taking the raw `serde_json::Value` record the
//! server returned; entities are never constructible by callers, only
//! produced as mapping results, and their identity fields never change
//! after construction.

pub mod comment;
pub mod location;
pub mod map;
pub mod notification;
pub mod peek;
pub mod post;
pub mod target;
pub mod yak;
