//! Unified error types for the `yakkit` crate.
//!
//! This module centralizes all failures that can occur while using the SDK and
//! provides a single top-level [`Error`] enum plus the convenient [`Result`] alias.
//! Errors from lower layers (`reqwest`, URL parsing, payload mapping) are grouped
//! into structured variants so callers can handle them precisely.

use thiserror::Error;

// --- Build-Time Error ---

/// Errors that can occur while building a [`YakHttpClient`](crate::YakHttpClient).
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// An endpoint URL in the configuration did not parse.
    #[error("Invalid endpoint URL in configuration: {0}")]
    Endpoint(#[from] url::ParseError),
}

// --- The Main Operational Error Enum ---

/// The crate's top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Request`] — HTTP transport/server/body-decoding issues
/// - [`Error::Map`] — a server payload could not be mapped into a typed entity
/// - [`Error::Registration`] — one of the two registration stages failed
/// - [`Error::Coercion`] — a target identifier could not be derived from the argument
/// - [`Error::NoBasecampSet`] — a basecamp-flagged operation was gated off
/// - [`Error::TooCloseToSchool`] — the location falls inside a restricted zone
///
/// Most lower-level errors automatically convert into this enum via `From`.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed (transport, server status, body decode).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// A server payload was missing or had a malformed field.
    #[error("Response mapping failed: {0}")]
    Map(#[from] MapError),

    /// Remote registration of a freshly generated identity failed.
    #[error("Registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// The caller's argument could not be coerced into a target identifier.
    #[error("Identifier coercion failed: {0}")]
    Coercion(#[from] CoercionError),

    /// URL parsing failed while preparing a request.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// A basecamp-flagged operation was attempted before a basecamp was set.
    ///
    /// Raised before any request is issued, so no traffic is sent against an
    /// undefined remote location.
    #[error("No basecamp set for this session")]
    NoBasecampSet,

    /// The requested location falls inside a restricted zone (school nearby);
    /// the backend refuses to serve a feed there.
    #[error("Location is too close to a school or otherwise restricted")]
    TooCloseToSchool,

    /// Building the client failed (reqwest or endpoint configuration).
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

// --- Payload Mapping Errors ---

/// A raw server payload could not be turned into a typed entity.
///
/// Every variant carries the original payload for diagnostics; the live
/// service returns different shapes for stub vs fully loaded records, so a
/// mapping failure is only meaningful together with what was actually sent.
#[derive(Debug, Error)]
pub enum MapError {
    /// A required field was absent from the record.
    #[error("response is missing required field `{field}`")]
    MissingField {
        /// Name of the absent field, as it appears on the wire.
        field: &'static str,
        /// The payload the field was probed in.
        raw: serde_json::Value,
    },

    /// A field was present but had an unusable type or value.
    #[error("field `{field}` is malformed: {reason}")]
    MalformedField {
        /// Name of the offending field, as it appears on the wire.
        field: &'static str,
        /// What was wrong with the value.
        reason: String,
        /// The payload the field was probed in.
        raw: serde_json::Value,
    },

    /// The response body as a whole was not the expected envelope.
    #[error("response body is not the expected shape: {reason}")]
    UnexpectedShape {
        /// What was wrong with the envelope.
        reason: String,
        /// The full response payload.
        raw: serde_json::Value,
    },
}

// --- Registration Errors ---

/// One of the stages of registering a freshly generated identity failed.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The install service did not return an installation object ID.
    #[error("install service did not create an installation: {message}")]
    Install {
        /// Server response body or a short description of the failure.
        message: String,
    },

    /// The install service did not confirm the user channel.
    #[error("install service did not confirm the user channel: {message}")]
    SaveUser {
        /// Server response body or a short description of the failure.
        message: String,
    },

    /// The main API rejected the new user ID.
    #[error("backend rejected the new user registration")]
    Backend,

    /// Appending the newly generated identity to the local log failed.
    #[error("failed to append identity to the local log: {0}")]
    IdentityLog(#[from] std::io::Error),
}

// --- Identifier Coercion Errors ---

/// A verb argument could not be resolved into the identifier(s) it needs.
///
/// Most coercions are closed out at compile time by the conversion traits
/// ([`IntoYakId`](crate::IntoYakId), [`IntoCommentRef`](crate::IntoCommentRef));
/// this covers the one case the type system cannot: a bare comment ID carries
/// no parent yak.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// A comment ID was supplied without the parent yak needed to resolve it.
    #[error("comment id `{comment_id}` given without its parent yak")]
    MissingParentYak {
        /// The orphaned comment ID.
        comment_id: String,
    },
}

// --- Consolidated Request Error ---

/// Transport and server-side HTTP errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-success status. Includes status and body message.
    #[error("Server responded with an error: {status} - {message}")]
    Server {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// Short description or the server response body captured for context.
        message: String,
    },

    /// The response body was not the expected success flag or JSON document.
    #[error("Body decode error: {message}")]
    DecodeBody {
        /// What the body looked like and what was expected instead.
        message: String,
    },
}

/// A specialized `Result` type for `yakkit` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

// Request Errors
impl_from_for_error!(reqwest::Error, Error::Request);

// Registration Errors
impl_from_for_error!(std::io::Error, Error::Registration);
