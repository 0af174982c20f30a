//! A top-level post ("yak").

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::errors::MapError;
use crate::model::location::Location;
use crate::model::map;
use crate::model::post::{PostInfo, YakKind};
use crate::util::strip_non_ascii;

/// Picture attachment, present on [`YakKind::Picture`] posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Picture {
    pub(crate) url: String,
    pub(crate) expand_in_feed: bool,
}

impl Picture {
    /// Where the image is served from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the client is expected to render the image inline.
    pub fn expand_in_feed(&self) -> bool {
        self.expand_in_feed
    }
}

/// A post on the feed.
///
/// A yak observed from the caller's side moves through three states, all
/// driven by re-fetching, never by local mutation:
///
/// 1. *stub* — just posted; the server returns a minimal record and
///    [`Self::loaded`] is `false`;
/// 2. *loaded* — a follow-up fetch populated the optional fields
///    ([`Self::gmt`], [`Self::read_only`], [`Self::score`]);
/// 3. *deleted* — a fetch for its ID returns nothing
///    ([`crate::Session::yak`] yields `None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yak {
    pub(crate) post: PostInfo,
    pub(crate) comment_count: i64,
    pub(crate) hide_pin: bool,
    pub(crate) loaded: bool,
    pub(crate) location: Location,
    pub(crate) message: String,
    pub(crate) kind: YakKind,
    pub(crate) gmt: Option<f64>,
    pub(crate) read_only: Option<bool>,
    pub(crate) score: Option<f64>,
    pub(crate) handle: Option<String>,
    pub(crate) picture: Option<Picture>,
}

impl Yak {
    pub(crate) fn from_raw(raw: &Value) -> Result<Self, MapError> {
        let post = PostInfo::from_raw(raw)?;
        let kind = YakKind::from_code(map::required_int(raw, "type")?);

        // Picture posts always carry their attachment fields; anything else
        // never does.
        let picture = if kind == YakKind::Picture {
            Some(Picture {
                url: map::required_str(raw, "url")?,
                expand_in_feed: map::required_flag(raw, "expandInFeed")?,
            })
        } else {
            None
        };

        // Fully loaded records carry an "R/"-prefixed ID; stubs use other
        // prefixes and omit the load-dependent fields below.
        let loaded = post.message_id.starts_with("R/");

        Ok(Self {
            comment_count: map::required_int(raw, "comments")?,
            hide_pin: map::required_flag(raw, "hidePin")?,
            loaded,
            location: Location::new(
                map::required_float(raw, "latitude")?,
                map::required_float(raw, "longitude")?,
            ),
            message: map::required_str(raw, "message")?,
            kind,
            gmt: map::optional_float(raw, "gmt")?,
            read_only: map::optional_flag(raw, "readOnly")?,
            score: map::optional_float(raw, "score")?,
            handle: map::optional_str(raw, "handle")?,
            picture,
            post,
        })
    }

    /// Shared post fields (votes, identity, timing).
    pub fn post(&self) -> &PostInfo {
        &self.post
    }

    /// The yak's message ID.
    pub fn message_id(&self) -> &str {
        &self.post.message_id
    }

    /// This session's vote on the yak.
    pub fn liked(&self) -> i64 {
        self.post.liked
    }

    /// Net vote count.
    pub fn likes(&self) -> i64 {
        self.post.likes
    }

    /// Number of comments at fetch time.
    pub fn comment_count(&self) -> i64 {
        self.comment_count
    }

    /// Whether the map pin is hidden for this post.
    pub fn hide_pin(&self) -> bool {
        self.hide_pin
    }

    /// `false` for a stub record; re-fetch to populate the optional fields.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Where the yak was posted.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The post text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Post type discriminant.
    pub fn kind(&self) -> YakKind {
        self.kind
    }

    /// GMT offset of the poster; absent on stub records.
    pub fn gmt(&self) -> Option<f64> {
        self.gmt
    }

    /// Whether commenting is closed; absent on stub records.
    pub fn read_only(&self) -> Option<bool> {
        self.read_only
    }

    /// Ranking score; absent on stub records.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Optional poster handle.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// Picture attachment, on [`YakKind::Picture`] posts only.
    pub fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }
}

impl fmt::Display for Yak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} upvotes)",
            strip_non_ascii(&self.message),
            self.post.likes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded_yak() -> Value {
        json!({
            "deliveryID": 1,
            "liked": 0,
            "numberOfLikes": 5,
            "messageID": "R/1111aaaa",
            "posterID": "p9",
            "time": "2015-05-01 09:30:00",
            "comments": 3,
            "hidePin": "0",
            "latitude": 40.44,
            "longitude": -79.99,
            "message": "first post",
            "type": 0,
            "gmt": -5.0,
            "readOnly": "0",
            "score": 8.5,
        })
    }

    #[test]
    fn loaded_record_maps_all_fields() {
        let yak = Yak::from_raw(&loaded_yak()).unwrap();
        assert!(yak.loaded());
        assert_eq!(yak.kind(), YakKind::Normal);
        assert_eq!(yak.score(), Some(8.5));
        assert_eq!(yak.read_only(), Some(false));
        assert_eq!(yak.location().latitude, 40.44);
        assert_eq!(yak.to_string(), "first post (5 upvotes)");
    }

    #[test]
    fn stub_record_maps_with_unknowns() {
        let mut raw = loaded_yak();
        let obj = raw.as_object_mut().unwrap();
        obj.insert("messageID".into(), json!("Y/2222bbbb"));
        obj.remove("gmt");
        obj.remove("readOnly");
        obj.remove("score");

        let yak = Yak::from_raw(&raw).unwrap();
        assert!(!yak.loaded());
        assert_eq!(yak.gmt(), None);
        assert_eq!(yak.read_only(), None);
        assert_eq!(yak.score(), None);
    }

    #[test]
    fn optional_fields_probe_independently() {
        // Only one of the load-dependent trio present: keep it, None the rest.
        let mut raw = loaded_yak();
        let obj = raw.as_object_mut().unwrap();
        obj.remove("gmt");
        obj.remove("readOnly");

        let yak = Yak::from_raw(&raw).unwrap();
        assert_eq!(yak.gmt(), None);
        assert_eq!(yak.score(), Some(8.5));
    }

    #[test]
    fn picture_post_requires_attachment_fields() {
        let mut raw = loaded_yak();
        raw.as_object_mut().unwrap().insert("type".into(), json!(6));
        assert!(matches!(
            Yak::from_raw(&raw),
            Err(MapError::MissingField { field: "url", .. })
        ));

        let obj = raw.as_object_mut().unwrap();
        obj.insert("url".into(), json!("https://img.example/1.jpg"));
        obj.insert("expandInFeed".into(), json!(1));
        let yak = Yak::from_raw(&raw).unwrap();
        assert_eq!(yak.kind(), YakKind::Picture);
        assert_eq!(yak.picture().unwrap().url(), "https://img.example/1.jpg");
    }

    #[test]
    fn mapping_is_idempotent() {
        let raw = loaded_yak();
        assert_eq!(Yak::from_raw(&raw).unwrap(), Yak::from_raw(&raw).unwrap());
    }
}
