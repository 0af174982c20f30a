//! Remote "peek" locations: named places whose feed can be viewed from
//! anywhere, with per-place capability flags.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::errors::MapError;
use crate::model::location::Location;
use crate::model::map;

/// A peek location. Carries a [`Location`] whose accuracy is derived from
/// the server's `delta` radius (scaled to meters).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeekLocation {
    pub(crate) location: Location,
    pub(crate) name: String,
    pub(crate) peek_id: String,
    pub(crate) can_reply: bool,
    pub(crate) can_report: bool,
    pub(crate) can_submit: bool,
    pub(crate) can_vote: bool,
    pub(crate) is_local: bool,
    pub(crate) inactive: bool,
    pub(crate) photos_enabled: bool,
    pub(crate) is_fictional: Option<bool>,
}

impl PeekLocation {
    pub(crate) fn from_raw(raw: &Value) -> Result<Self, MapError> {
        let latitude = map::required_float(raw, "latitude")?;
        let longitude = map::required_float(raw, "longitude")?;
        // The wire carries a degree radius; accuracy is meters.
        let accuracy = map::required_float(raw, "delta")? * 1e4;

        Ok(Self {
            location: Location::with_accuracy(latitude, longitude, accuracy),
            name: map::required_str(raw, "location")?,
            peek_id: map::required_stringy(raw, "peekID")?,
            can_reply: map::required_flag(raw, "canReply")?,
            can_report: map::required_flag(raw, "canReport")?,
            can_submit: map::required_flag(raw, "canSubmit")?,
            can_vote: map::required_flag(raw, "canVote")?,
            is_local: map::required_flag(raw, "isLocal")?,
            inactive: map::required_flag(raw, "inactive")?,
            photos_enabled: map::required_flag(raw, "photosEnabled")?,
            is_fictional: map::optional_flag(raw, "isFictional")?,
        })
    }

    /// The place's coordinates.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Human-readable place name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The peek location's identity.
    pub fn peek_id(&self) -> &str {
        &self.peek_id
    }

    /// Whether commenting is allowed from here.
    pub fn can_reply(&self) -> bool {
        self.can_reply
    }

    /// Whether reporting is allowed from here.
    pub fn can_report(&self) -> bool {
        self.can_report
    }

    /// Whether submitting posts for review is allowed.
    pub fn can_submit(&self) -> bool {
        self.can_submit
    }

    /// Whether voting is allowed from here.
    pub fn can_vote(&self) -> bool {
        self.can_vote
    }

    /// Whether the viewer is local to the place.
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Whether the place is currently inactive.
    pub fn inactive(&self) -> bool {
        self.inactive
    }

    /// Whether picture posts are enabled here.
    pub fn photos_enabled(&self) -> bool {
        self.photos_enabled
    }

    /// Whether the place is fictional; not all records carry this.
    pub fn is_fictional(&self) -> Option<bool> {
        self.is_fictional
    }
}

impl fmt::Display for PeekLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: Peek{}", self.name, self.location)
    }
}
