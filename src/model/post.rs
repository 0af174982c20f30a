//! Shared shape and dispatch for postable content (yaks and comments).

use serde::Serialize;
use serde_json::Value;

use crate::errors::MapError;
use crate::model::comment::Comment;
use crate::model::map;
use crate::model::yak::Yak;
use crate::util::strip_backslashes;

/// Fields common to every postable record on the wire.
///
/// For a [`Yak`] the `message_id` is its own identity; for a [`Comment`] it
/// is the parent yak's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostInfo {
    pub(crate) delivery_id: i64,
    pub(crate) liked: i64,
    pub(crate) likes: i64,
    pub(crate) message_id: String,
    pub(crate) poster_id: String,
    pub(crate) time: String,
    pub(crate) reyaked: Option<String>,
}

impl PostInfo {
    pub(crate) fn from_raw(raw: &Value) -> Result<Self, MapError> {
        Ok(Self {
            delivery_id: map::required_int(raw, "deliveryID")?,
            liked: map::required_int(raw, "liked")?,
            likes: map::required_int(raw, "numberOfLikes")?,
            message_id: strip_backslashes(&map::required_str(raw, "messageID")?),
            poster_id: map::required_stringy(raw, "posterID")?,
            time: map::required_stringy(raw, "time")?,
            reyaked: map::optional_str(raw, "reyaked")?,
        })
    }

    /// Delivery batch this record arrived in.
    pub fn delivery_id(&self) -> i64 {
        self.delivery_id
    }

    /// This session's vote on the post: negative, zero, or positive.
    pub fn liked(&self) -> i64 {
        self.liked
    }

    /// Net vote count.
    pub fn likes(&self) -> i64 {
        self.likes
    }

    /// Message ID (the yak's own, or the parent yak's for a comment).
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Opaque poster identity (per-thread handle color, not the user ID).
    pub fn poster_id(&self) -> &str {
        &self.poster_id
    }

    /// Server-reported post time, as received.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Present when the post is a repost.
    pub fn reyaked(&self) -> Option<&str> {
        self.reyaked.as_deref()
    }
}

/// Wire discriminant for a yak's post type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YakKind {
    /// Plain text post.
    Normal,
    /// Official post from the operator.
    Official,
    /// Post with an attached picture.
    Picture,
    /// A type code this crate does not know about.
    Other(i64),
}

impl YakKind {
    pub(crate) fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Normal,
            1 => Self::Official,
            6 => Self::Picture,
            other => Self::Other(other),
        }
    }

    /// The raw wire code.
    pub fn code(self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Official => 1,
            Self::Picture => 6,
            Self::Other(code) => code,
        }
    }
}

/// Which kind of post a [`PostRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    /// A top-level post.
    Yak,
    /// A comment on a post.
    Comment,
}

/// Borrowed reference to either post kind, for verbs that act on both
/// (vote, report, delete).
///
/// Session verbs take `impl Into<PostRef>` so callers can pass `&Yak` or
/// `&Comment` directly:
///
/// ```no_run
/// # fn ex(session: &mut yakkit::Session, yak: &yakkit::Yak) -> yakkit::Result<()> {
/// session.upvote(yak, false)?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, Copy)]
pub enum PostRef<'a> {
    /// A top-level post.
    Yak(&'a Yak),
    /// A comment on a post.
    Comment(&'a Comment),
}

impl PostRef<'_> {
    /// The kind discriminant, for explicit dispatch.
    pub fn kind(&self) -> PostKind {
        match self {
            Self::Yak(_) => PostKind::Yak,
            Self::Comment(_) => PostKind::Comment,
        }
    }
}

impl<'a> From<&'a Yak> for PostRef<'a> {
    fn from(yak: &'a Yak) -> Self {
        Self::Yak(yak)
    }
}

impl<'a> From<&'a Comment> for PostRef<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self::Comment(comment)
    }
}
