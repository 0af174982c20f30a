#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

mod client;
mod config;
pub mod errors;
mod install;
mod model;
mod session;
mod util;

// --- PUBLIC API EXPORTS ---
// Transport
pub use client::{YakHttpClient, YakHttpClientBuilder};
// Configuration
pub use config::{Config, DeviceIdentity, CONTACT_REASONS};
// Session actor
pub use session::core::{Basecamp, Session};
// Entities
pub use model::comment::Comment;
pub use model::location::{Location, DEFAULT_ACCURACY};
pub use model::notification::{Notification, NotificationStatus};
pub use model::peek::PeekLocation;
pub use model::post::{PostInfo, PostKind, PostRef, YakKind};
pub use model::yak::{Picture, Yak};

// Identifier coercion
pub use model::target::{CommentRef, FeedSource, IntoCommentRef, IntoPeekId, IntoYakId};

// Error and result types
pub use errors::{BuildError, Error, Result};

// Re-exports
pub use reqwest::StatusCode;
