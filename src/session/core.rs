//! Session state and its reconciliation with the backend.
//!
//! A [`Session`] binds a user identity to a location and mirrors the two
//! pieces of account state the backend tracks for it: the yakarma score and
//! the basecamp (a saved "home" location feeds can be read from remotely).
//! The backend offers no read-your-writes guarantee, so the mirror is
//! reconciled by re-reading the authenticated feed — [`Session::refresh`] —
//! and every mutating verb performs that read before reporting its outcome.

use std::fs::OpenOptions;
use std::io::Write;

use serde_json::Value;
use uuid::Uuid;

use crate::client::YakHttpClient;
use crate::errors::{Error, MapError, RegistrationError, Result};
use crate::model::comment::Comment;
use crate::model::location::Location;
use crate::model::map;
use crate::model::notification::Notification;
use crate::model::peek::PeekLocation;
use crate::model::yak::Yak;
use crate::util::{check_http_status, json_body, success_flag};

/// A saved remote location the backend lets the account act from.
#[derive(Debug, Clone, PartialEq)]
pub struct Basecamp {
    pub(crate) name: String,
    pub(crate) location: Location,
}

impl Basecamp {
    /// Display name the basecamp was saved under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Saved coordinates.
    pub fn location(&self) -> Location {
        self.location
    }
}

/// An authenticated user identity at a location.
///
/// Construct one with [`Session::register`] (mints a fresh identity) or
/// [`Session::signin`] (adopts a previously registered user ID). All feed
/// reads and content verbs live here; the underlying [`YakHttpClient`] stays
/// stateless and shareable.
#[derive(Debug)]
pub struct Session {
    pub(crate) client: YakHttpClient,
    pub(crate) location: Location,
    pub(crate) user_id: String,
    pub(crate) yakarma: i64,
    pub(crate) basecamp_set: bool,
    pub(crate) basecamp: Option<Basecamp>,
}

impl Session {
    /// Mint a fresh identity and register it with the backend.
    ///
    /// Registration has up to three stages: the install-service handshake
    /// (skipped when the [`Config`](crate::Config) carries no install
    /// credentials), the main-API user registration, and an append to the
    /// local identity log when one is configured. The session then syncs
    /// its account state before returning.
    pub fn register(client: YakHttpClient, location: Location) -> Result<Self> {
        let user_id = generate_user_id();
        tracing::debug!(%user_id, "registering fresh identity");

        if client.config().has_install_credentials() {
            crate::install::register(&client, &user_id)?;
        }

        let mut session = Self {
            client,
            location,
            user_id,
            yakarma: 0,
            basecamp_set: false,
            basecamp: None,
        };
        session.register_backend()?;
        session.log_identity()?;
        session.refresh()?;
        Ok(session)
    }

    /// Adopt an already registered user ID and sync its account state.
    pub fn signin(
        client: YakHttpClient,
        location: Location,
        user_id: impl Into<String>,
    ) -> Result<Self> {
        let mut session = Self {
            client,
            location,
            user_id: user_id.into(),
            yakarma: 0,
            basecamp_set: false,
            basecamp: None,
        };
        session.refresh()?;
        Ok(session)
    }

    /// Re-read the authenticated feed and reconcile yakarma and basecamp
    /// state from it.
    ///
    /// This is the only way to observe one's own account state; the feed
    /// response is also what commits recent writes server-side, so the
    /// mutating verbs all call this before reporting their outcome.
    pub fn refresh(&mut self) -> Result<()> {
        let response = check_http_status(self.req_get_messages(self.location, true)?)?;
        let raw = json_body(response)?;

        // A restricted-zone sentinel surfaces here even though the feed
        // itself is discarded.
        self.yak_list(&raw)?;

        self.yakarma = map::required_int(&raw, "yakarma")?;
        self.basecamp_set = map::required_flag(&raw, "bcEligible")?;
        self.basecamp = match (
            map::optional_float(&raw, "bcLat")?,
            map::optional_float(&raw, "bcLong")?,
            map::optional_str(&raw, "bcName")?,
        ) {
            (Some(latitude), Some(longitude), Some(name)) => Some(Basecamp {
                name,
                location: Location::new(latitude, longitude),
            }),
            _ => None,
        };

        tracing::debug!(
            yakarma = self.yakarma,
            basecamp_set = self.basecamp_set,
            "session state refreshed"
        );
        Ok(())
    }

    /// The user ID this session acts as.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The session's own location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Move the session to new coordinates. Takes effect on the next request.
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Yakarma score as of the last [`Self::refresh`].
    pub fn yakarma(&self) -> i64 {
        self.yakarma
    }

    /// Whether the backend considers a basecamp established for this account.
    pub fn basecamp_set(&self) -> bool {
        self.basecamp_set
    }

    /// The saved basecamp, if the backend reported one.
    pub fn basecamp(&self) -> Option<&Basecamp> {
        self.basecamp.as_ref()
    }

    /// The transport client this session issues requests through.
    pub fn client(&self) -> &YakHttpClient {
        &self.client
    }

    // ------------------------------------------------------------------
    // Shared plumbing for the verbs
    // ------------------------------------------------------------------

    /// Gate for basecamp-flagged verbs: fail before any traffic is sent
    /// when no basecamp is established.
    pub(crate) fn ensure_basecamp(&self, basecamp: bool) -> Result<()> {
        if basecamp && !self.basecamp_set {
            tracing::warn!("basecamp-flagged operation attempted with no basecamp set");
            return Err(Error::NoBasecampSet);
        }
        Ok(())
    }

    /// The location an operation acts from: the saved basecamp when flagged,
    /// the session's own location otherwise.
    pub(crate) fn op_location(&self, basecamp: bool) -> Location {
        if basecamp {
            if let Some(saved) = &self.basecamp {
                return saved.location;
            }
        }
        self.location
    }

    fn register_backend(&self) -> Result<()> {
        let response = check_http_status(self.req_register_user()?)?;
        if !success_flag(&response.text()?)? {
            return Err(RegistrationError::Backend.into());
        }
        Ok(())
    }

    /// Identities are unrecoverable once dropped, so optionally append each
    /// fresh one to a local file.
    fn log_identity(&self) -> Result<()> {
        let Some(path) = &self.client.config().identity_log else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", self.user_id)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Envelope -> entity list mapping, with feed sentinels
    // ------------------------------------------------------------------

    /// Map a `{"messages": [...]}` envelope, honoring the two sentinel
    /// records the backend plants as the *first* feed entry: the no-content
    /// marker maps to an empty list, the restricted-zone marker to
    /// [`Error::TooCloseToSchool`]. Later entries are never inspected.
    pub(crate) fn yak_list(&self, raw: &Value) -> Result<Vec<Yak>> {
        let records = map::record_array(raw, "messages")?;
        let yaks = records
            .iter()
            .map(Yak::from_raw)
            .collect::<std::result::Result<Vec<_>, MapError>>()?;

        if let Some(first) = yaks.first() {
            let config = self.client.config();
            if first.message_id() == config.no_yaks_id {
                return Ok(Vec::new());
            }
            if first.message_id() == config.too_close_id {
                tracing::warn!("restricted-zone sentinel in feed");
                return Err(Error::TooCloseToSchool);
            }
        }
        Ok(yaks)
    }

    pub(crate) fn comment_list(&self, raw: &Value) -> Result<Vec<Comment>> {
        let records = map::record_array(raw, "comments")?;
        let comments = records
            .iter()
            .map(Comment::from_raw)
            .collect::<std::result::Result<Vec<_>, MapError>>()?;
        Ok(comments)
    }

    pub(crate) fn notification_list(&self, raw: &Value) -> Result<Vec<Notification>> {
        let records = map::record_array(raw, "data")?;
        let notifications = records
            .iter()
            .map(Notification::from_raw)
            .collect::<std::result::Result<Vec<_>, MapError>>()?;
        Ok(notifications)
    }

    /// Peek-location lists arrive under either `featuredLocations` or
    /// `otherLocations` on the same feed response.
    pub(crate) fn peek_list(&self, raw: &Value, field: &'static str) -> Result<Vec<PeekLocation>> {
        let records = map::record_array(raw, field)?;
        let peeks = records
            .iter()
            .map(PeekLocation::from_raw)
            .collect::<std::result::Result<Vec<_>, MapError>>()?;
        Ok(peeks)
    }
}

/// User IDs are minted client-side: an uppercase, dash-less UUID.
pub(crate) fn generate_user_id() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}
