//! Identifier coercion for session verbs.
//!
//! Every verb accepts either a concrete entity or a raw string identifier
//! for its target, so callers can operate statefully (by object) or
//! statelessly (by ID) interchangeably. The conversions live in small
//! traits instead of runtime type inspection; what the type system cannot
//! close out — a bare comment ID carries no parent yak — fails with a
//! distinguished [`CoercionError`].

use crate::errors::CoercionError;
use crate::model::comment::Comment;
use crate::model::location::Location;
use crate::model::peek::PeekLocation;
use crate::model::yak::Yak;

// ============================================================================
// Yak targets
// ============================================================================

/// Anything that resolves to a yak's message ID: a [`Yak`], a [`Comment`]
/// (its parent yak), or a raw ID string.
pub trait IntoYakId {
    /// The message ID to issue requests against.
    fn into_yak_id(self) -> String;
}

impl IntoYakId for &Yak {
    fn into_yak_id(self) -> String {
        self.message_id().to_owned()
    }
}

impl IntoYakId for &Comment {
    fn into_yak_id(self) -> String {
        self.message_id().to_owned()
    }
}

impl IntoYakId for &str {
    fn into_yak_id(self) -> String {
        self.to_owned()
    }
}

impl IntoYakId for String {
    fn into_yak_id(self) -> String {
        self
    }
}

impl IntoYakId for &String {
    fn into_yak_id(self) -> String {
        self.clone()
    }
}

// ============================================================================
// Comment targets
// ============================================================================

/// A fully resolved comment target: the comment's own ID plus its parent
/// yak's message ID (the backend needs both for several operations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRef {
    pub(crate) comment_id: String,
    pub(crate) message_id: String,
}

impl CommentRef {
    /// Build a reference from explicit IDs.
    pub fn new(comment_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            comment_id: comment_id.into(),
            message_id: message_id.into(),
        }
    }

    /// The comment's own ID.
    pub fn comment_id(&self) -> &str {
        &self.comment_id
    }

    /// The parent yak's message ID.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }
}

/// Anything that resolves to a [`CommentRef`]: a [`Comment`] (carries both
/// IDs), a `(yak, comment_id)` pair, or an explicit [`CommentRef`].
///
/// A bare `&str` is deliberately *fallible*: a comment ID alone cannot name
/// its parent yak.
pub trait IntoCommentRef {
    /// Resolve into the pair of identifiers.
    fn into_comment_ref(self) -> Result<CommentRef, CoercionError>;
}

impl IntoCommentRef for &Comment {
    fn into_comment_ref(self) -> Result<CommentRef, CoercionError> {
        Ok(CommentRef::new(self.comment_id(), self.message_id()))
    }
}

impl IntoCommentRef for CommentRef {
    fn into_comment_ref(self) -> Result<CommentRef, CoercionError> {
        Ok(self)
    }
}

impl IntoCommentRef for &str {
    fn into_comment_ref(self) -> Result<CommentRef, CoercionError> {
        Err(CoercionError::MissingParentYak {
            comment_id: self.to_owned(),
        })
    }
}

impl<Y: IntoYakId, S: Into<String>> IntoCommentRef for (Y, S) {
    fn into_comment_ref(self) -> Result<CommentRef, CoercionError> {
        let (yak, comment_id) = self;
        Ok(CommentRef::new(comment_id, yak.into_yak_id()))
    }
}

// ============================================================================
// Peek targets
// ============================================================================

/// Anything that resolves to a peek location's ID.
pub trait IntoPeekId {
    /// The peek ID to issue requests against.
    fn into_peek_id(self) -> String;
}

impl IntoPeekId for &PeekLocation {
    fn into_peek_id(self) -> String {
        self.peek_id().to_owned()
    }
}

impl IntoPeekId for &str {
    fn into_peek_id(self) -> String {
        self.to_owned()
    }
}

impl IntoPeekId for String {
    fn into_peek_id(self) -> String {
        self
    }
}

// ============================================================================
// Feed sources
// ============================================================================

/// Where a remote feed is read from: an established peek location or an
/// arbitrary spot on the map. Explicit variant instead of runtime type
/// inspection; the two use different backend operations.
#[derive(Debug, Clone, Copy)]
pub enum FeedSource<'a> {
    /// An established peek location (by reference).
    Peek(&'a PeekLocation),
    /// Any coordinates.
    Spot(Location),
}

impl<'a> From<&'a PeekLocation> for FeedSource<'a> {
    fn from(peek: &'a PeekLocation) -> Self {
        Self::Peek(peek)
    }
}

impl From<Location> for FeedSource<'_> {
    fn from(location: Location) -> Self {
        Self::Spot(location)
    }
}
