//! A comment on a yak.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::errors::MapError;
use crate::model::map;
use crate::model::post::PostInfo;
use crate::util::strip_non_ascii;

/// A comment on a post. The shared [`PostInfo::message_id`](PostInfo::message_id)
/// names the *parent yak*; [`Self::comment_id`] is the comment's own identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub(crate) post: PostInfo,
    pub(crate) comment: String,
    pub(crate) comment_id: String,
    pub(crate) gmt: Option<f64>,
    pub(crate) back_id: Option<String>,
    pub(crate) overlay_id: Option<String>,
    pub(crate) text_style: Option<String>,
}

impl Comment {
    pub(crate) fn from_raw(raw: &Value) -> Result<Self, MapError> {
        Ok(Self {
            post: PostInfo::from_raw(raw)?,
            comment: map::required_str(raw, "comment")?,
            comment_id: map::required_stringy(raw, "commentID")?,
            gmt: map::optional_float(raw, "gmt")?,
            back_id: map::optional_str(raw, "backID")?,
            overlay_id: map::optional_str(raw, "overlayID")?,
            text_style: map::optional_str(raw, "textStyle")?,
        })
    }

    /// Shared post fields (votes, identity, timing).
    pub fn post(&self) -> &PostInfo {
        &self.post
    }

    /// The comment text.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The comment's own identity.
    pub fn comment_id(&self) -> &str {
        &self.comment_id
    }

    /// The parent yak's message ID.
    pub fn message_id(&self) -> &str {
        &self.post.message_id
    }

    /// This session's vote on the comment.
    pub fn liked(&self) -> i64 {
        self.post.liked
    }

    /// GMT offset of the poster; absent on stub records.
    pub fn gmt(&self) -> Option<f64> {
        self.gmt
    }

    /// Avatar background asset, when the poster picked one.
    pub fn back_id(&self) -> Option<&str> {
        self.back_id.as_deref()
    }

    /// Avatar overlay asset, when the poster picked one.
    pub fn overlay_id(&self) -> Option<&str> {
        self.overlay_id.as_deref()
    }

    /// Text styling hint, when present.
    pub fn text_style(&self) -> Option<&str> {
        self.text_style.as_deref()
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", strip_non_ascii(&self.comment), self.post.likes)
    }
}
