//! The public operation surface of a [`Session`].
//!
//! The backend acknowledges most mutations with a bare `"1"` regardless of
//! whether the write took effect, so the verbs here report success from
//! *observed state*: a vote compares the self-vote marker before and after,
//! a delete checks the record is gone, a post fetches the committed record
//! back. Each mutation also triggers [`Session::refresh`] so yakarma and
//! basecamp state stay current.

use crate::errors::{MapError, Result};
use crate::model::comment::Comment;
use crate::model::location::Location;
use crate::model::notification::{Notification, NotificationStatus};
use crate::model::peek::PeekLocation;
use crate::model::post::PostRef;
use crate::model::target::{CommentRef, FeedSource, IntoCommentRef, IntoPeekId, IntoYakId};
use crate::model::yak::Yak;
use crate::session::core::Session;
use crate::util::{check_http_status, json_body, success_flag};

enum VoteDirection {
    Up,
    Down,
}

impl Session {
    // ------------------------------------------------------------------
    // Feed reads
    // ------------------------------------------------------------------

    /// Fetch a single yak by entity or ID. `None` if it no longer exists.
    ///
    /// Always returns a *fresh* instance; the argument is never mutated in
    /// place, so stale copies stay comparable against the reloaded state.
    pub fn yak(&self, yak: impl IntoYakId) -> Result<Option<Yak>> {
        let message_id = yak.into_yak_id();
        let response = check_http_status(self.req_get_message(&message_id)?)?;
        let raw = json_body(response)?;
        Ok(self.yak_list(&raw)?.into_iter().next())
    }

    /// The feed at `location` (the session's own when `None`), optionally
    /// through the basecamp.
    pub fn yaks(&self, location: Option<Location>, basecamp: bool) -> Result<Vec<Yak>> {
        self.ensure_basecamp(basecamp)?;
        let location = location.unwrap_or(self.location);
        let response = check_http_status(self.req_get_messages(location, basecamp)?)?;
        self.yak_list(&json_body(response)?)
    }

    /// The "hot" feed. A basecamp-flagged call always reads from the saved
    /// basecamp, even when `location` is given.
    pub fn top_yaks(&self, location: Option<Location>, basecamp: bool) -> Result<Vec<Yak>> {
        self.ensure_basecamp(basecamp)?;
        let location = if basecamp {
            self.op_location(true)
        } else {
            location.unwrap_or(self.location)
        };
        let response = check_http_status(self.req_hot(location, basecamp)?)?;
        self.yak_list(&json_body(response)?)
    }

    /// Read a remote feed: an established peek location or an arbitrary
    /// spot on the map.
    pub fn peek_yaks<'a>(&self, source: impl Into<FeedSource<'a>>) -> Result<Vec<Yak>> {
        let response = match source.into() {
            FeedSource::Peek(peek) => self.req_get_peek_messages(peek.peek_id())?,
            FeedSource::Spot(location) => self.req_yaks(location)?,
        };
        self.yak_list(&json_body(check_http_status(response)?)?)
    }

    /// Read an established peek location's feed by raw peek ID.
    pub fn peek_yaks_by_id(&self, peek: impl IntoPeekId) -> Result<Vec<Yak>> {
        let peek_id = peek.into_peek_id();
        let response = check_http_status(self.req_get_peek_messages(&peek_id)?)?;
        self.yak_list(&json_body(response)?)
    }

    /// Curated peek locations advertised on the local feed.
    pub fn featured_peek_locations(&self) -> Result<Vec<PeekLocation>> {
        let response = check_http_status(self.req_get_messages(self.location, false)?)?;
        self.peek_list(&json_body(response)?, "featuredLocations")
    }

    /// Non-curated peek locations advertised on the local feed.
    pub fn other_peek_locations(&self) -> Result<Vec<PeekLocation>> {
        let response = check_http_status(self.req_get_messages(self.location, false)?)?;
        self.peek_list(&json_body(response)?, "otherLocations")
    }

    /// Yaks this identity posted recently.
    pub fn my_recent_yaks(&self) -> Result<Vec<Yak>> {
        let response = check_http_status(self.req_my_recent_yaks()?)?;
        self.yak_list(&json_body(response)?)
    }

    /// Yaks this identity commented on recently.
    pub fn my_recent_replies(&self) -> Result<Vec<Yak>> {
        let response = check_http_status(self.req_my_recent_replies()?)?;
        self.yak_list(&json_body(response)?)
    }

    /// This identity's highest-scoring yaks.
    pub fn my_top_yaks(&self) -> Result<Vec<Yak>> {
        let response = check_http_status(self.req_my_tops()?)?;
        self.yak_list(&json_body(response)?)
    }

    /// The highest-scoring yaks in the session's area.
    pub fn area_top_yaks(&self) -> Result<Vec<Yak>> {
        let response = check_http_status(self.req_area_tops()?)?;
        self.yak_list(&json_body(response)?)
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// All comments on a yak, oldest first.
    pub fn comments(&self, yak: impl IntoYakId, basecamp: bool) -> Result<Vec<Comment>> {
        self.ensure_basecamp(basecamp)?;
        let message_id = yak.into_yak_id();
        let response = check_http_status(self.req_get_comments(&message_id, basecamp)?)?;
        self.comment_list(&json_body(response)?)
    }

    /// Fetch a single comment. `None` if it no longer exists.
    ///
    /// The target must carry its parent yak ([`Comment`], [`CommentRef`],
    /// or a `(yak, comment_id)` pair); a bare comment ID fails coercion.
    pub fn comment(&self, comment: impl IntoCommentRef, basecamp: bool) -> Result<Option<Comment>> {
        self.ensure_basecamp(basecamp)?;
        let target = comment.into_comment_ref()?;
        Ok(self
            .comments(target.message_id(), basecamp)?
            .into_iter()
            .find(|candidate| candidate.comment_id() == target.comment_id()))
    }

    // ------------------------------------------------------------------
    // Posting
    // ------------------------------------------------------------------

    /// Post a yak. Returns the committed record, or `None` when the backend
    /// declined the post or it never surfaced on the feed.
    ///
    /// The backend only commits the write when a feed read follows
    /// immediately, so one is issued before the result is inspected.
    pub fn post_yak(
        &mut self,
        message: &str,
        handle: Option<&str>,
        bypass_threat_popup: bool,
        basecamp: bool,
    ) -> Result<Option<Yak>> {
        self.ensure_basecamp(basecamp)?;
        let response =
            check_http_status(self.req_send_message(message, handle, bypass_threat_popup, basecamp)?)?;
        self.req_get_messages(self.location, basecamp)?;
        self.refresh()?;
        if !success_flag(&response.text()?)? {
            tracing::debug!("backend declined the yak");
            return Ok(None);
        }
        Ok(self.yaks(None, basecamp)?.into_iter().next())
    }

    /// Comment on a yak. Returns the committed record, or `None` when the
    /// backend declined it or it never surfaced on the thread.
    ///
    /// Same write-commit precondition as [`Self::post_yak`], against the
    /// comment thread instead of the feed.
    pub fn post_comment(
        &mut self,
        comment: &str,
        yak: impl IntoYakId,
        bypass_threat_popup: bool,
        basecamp: bool,
    ) -> Result<Option<Comment>> {
        self.ensure_basecamp(basecamp)?;
        let message_id = yak.into_yak_id();
        let response = check_http_status(self.req_post_comment(
            comment,
            &message_id,
            bypass_threat_popup,
            basecamp,
        )?)?;
        self.req_get_comments(&message_id, basecamp)?;
        self.refresh()?;
        if !success_flag(&response.text()?)? {
            tracing::debug!("backend declined the comment");
            return Ok(None);
        }
        Ok(self.comments(message_id.as_str(), basecamp)?.pop())
    }

    /// Submit a yak for review at a peek location. Fire-and-forget: the
    /// backend reports nothing about the review outcome.
    pub fn submit_peek_yak(
        &self,
        message: &str,
        peek: impl IntoPeekId,
        handle: Option<&str>,
        bypass_threat_popup: bool,
    ) -> Result<()> {
        let peek_id = peek.into_peek_id();
        check_http_status(self.req_submit_peek_message(
            message,
            &peek_id,
            handle,
            bypass_threat_popup,
        )?)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Votes
    // ------------------------------------------------------------------

    /// Upvote (or retract an upvote on) a yak or comment.
    ///
    /// Returns whether the self-vote state actually changed; a vanished
    /// target reports `false` rather than an error.
    pub fn upvote<'a>(&mut self, post: impl Into<PostRef<'a>>, basecamp: bool) -> Result<bool> {
        match post.into() {
            PostRef::Yak(yak) => self.upvote_yak(yak, basecamp),
            PostRef::Comment(comment) => self.upvote_comment(comment, basecamp),
        }
    }

    /// Downvote (or retract a downvote on) a yak or comment.
    pub fn downvote<'a>(&mut self, post: impl Into<PostRef<'a>>, basecamp: bool) -> Result<bool> {
        match post.into() {
            PostRef::Yak(yak) => self.downvote_yak(yak, basecamp),
            PostRef::Comment(comment) => self.downvote_comment(comment, basecamp),
        }
    }

    /// Upvote (or retract an upvote on) a yak by entity or ID.
    pub fn upvote_yak(&mut self, yak: impl IntoYakId, basecamp: bool) -> Result<bool> {
        self.vote_yak(yak.into_yak_id(), basecamp, VoteDirection::Up)
    }

    /// Downvote (or retract a downvote on) a yak by entity or ID.
    pub fn downvote_yak(&mut self, yak: impl IntoYakId, basecamp: bool) -> Result<bool> {
        self.vote_yak(yak.into_yak_id(), basecamp, VoteDirection::Down)
    }

    /// Upvote (or retract an upvote on) a comment.
    pub fn upvote_comment(&mut self, comment: impl IntoCommentRef, basecamp: bool) -> Result<bool> {
        let target = comment.into_comment_ref()?;
        self.vote_comment(target, basecamp, VoteDirection::Up)
    }

    /// Downvote (or retract a downvote on) a comment.
    pub fn downvote_comment(
        &mut self,
        comment: impl IntoCommentRef,
        basecamp: bool,
    ) -> Result<bool> {
        let target = comment.into_comment_ref()?;
        self.vote_comment(target, basecamp, VoteDirection::Down)
    }

    fn vote_yak(&mut self, message_id: String, basecamp: bool, direction: VoteDirection) -> Result<bool> {
        self.ensure_basecamp(basecamp)?;
        let Some(before) = self.yak(message_id.as_str())? else {
            return Ok(false);
        };
        let response = match direction {
            VoteDirection::Up => self.req_like_message(&message_id, basecamp)?,
            VoteDirection::Down => self.req_downvote_message(&message_id, basecamp)?,
        };
        check_http_status(response)?;
        self.refresh()?;
        let Some(after) = self.yak(message_id.as_str())? else {
            return Ok(false);
        };
        Ok(after.liked() != before.liked())
    }

    fn vote_comment(
        &mut self,
        target: CommentRef,
        basecamp: bool,
        direction: VoteDirection,
    ) -> Result<bool> {
        self.ensure_basecamp(basecamp)?;
        let Some(before) = self.comment(target.clone(), basecamp)? else {
            return Ok(false);
        };
        let response = match direction {
            VoteDirection::Up => self.req_like_comment(&target, basecamp)?,
            VoteDirection::Down => self.req_downvote_comment(&target, basecamp)?,
        };
        check_http_status(response)?;
        self.refresh()?;
        let Some(after) = self.comment(target, basecamp)? else {
            return Ok(false);
        };
        Ok(after.liked() != before.liked())
    }

    // ------------------------------------------------------------------
    // Reports and deletes
    // ------------------------------------------------------------------

    /// Report a yak or comment for one of the recognized reasons (see
    /// [`CONTACT_REASONS`](crate::CONTACT_REASONS) for the contact-form
    /// equivalents; report reasons are free-form).
    pub fn report<'a>(
        &self,
        post: impl Into<PostRef<'a>>,
        reason: &str,
        basecamp: bool,
    ) -> Result<()> {
        match post.into() {
            PostRef::Yak(yak) => self.report_yak(yak, reason, basecamp),
            PostRef::Comment(comment) => self.report_comment(comment, reason, basecamp),
        }
    }

    /// Report a yak by entity or ID.
    pub fn report_yak(&self, yak: impl IntoYakId, reason: &str, basecamp: bool) -> Result<()> {
        self.ensure_basecamp(basecamp)?;
        let message_id = yak.into_yak_id();
        check_http_status(self.req_report_message(&message_id, reason, basecamp)?)?;
        Ok(())
    }

    /// Report a comment.
    pub fn report_comment(
        &self,
        comment: impl IntoCommentRef,
        reason: &str,
        basecamp: bool,
    ) -> Result<()> {
        self.ensure_basecamp(basecamp)?;
        let target = comment.into_comment_ref()?;
        check_http_status(self.req_report_comment(&target, reason, basecamp)?)?;
        Ok(())
    }

    /// Delete an own yak or comment. Returns whether the record is actually
    /// gone afterwards; deleting someone else's post is acknowledged by the
    /// backend but takes no effect, which surfaces here as `false`.
    pub fn delete<'a>(&mut self, post: impl Into<PostRef<'a>>, basecamp: bool) -> Result<bool> {
        match post.into() {
            PostRef::Yak(yak) => self.delete_yak(yak, basecamp),
            PostRef::Comment(comment) => self.delete_comment(comment, basecamp),
        }
    }

    /// Delete an own yak by entity or ID.
    pub fn delete_yak(&mut self, yak: impl IntoYakId, basecamp: bool) -> Result<bool> {
        self.ensure_basecamp(basecamp)?;
        let message_id = yak.into_yak_id();
        check_http_status(self.req_delete_message(&message_id, basecamp)?)?;
        self.refresh()?;
        Ok(self.yak(message_id.as_str())?.is_none())
    }

    /// Delete an own comment.
    pub fn delete_comment(&mut self, comment: impl IntoCommentRef, basecamp: bool) -> Result<bool> {
        self.ensure_basecamp(basecamp)?;
        let target = comment.into_comment_ref()?;
        check_http_status(self.req_delete_comment(&target, basecamp)?)?;
        self.refresh()?;
        Ok(self.comment(target, basecamp)?.is_none())
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// All notifications for this identity.
    pub fn notifications(&self) -> Result<Vec<Notification>> {
        let response = check_http_status(self.req_notifications()?)?;
        self.notification_list(&json_body(response)?)
    }

    /// Mark a single notification with `status`. Returns whether the
    /// notification service reported a clean result.
    pub fn mark_notification(
        &self,
        notification: &Notification,
        status: NotificationStatus,
    ) -> Result<bool> {
        self.update_notifications(&[notification.notif_id().to_owned()], status)
    }

    /// Mark every notification with `status`.
    pub fn mark_all_notifications(&self, status: NotificationStatus) -> Result<bool> {
        let ids: Vec<String> = self
            .notifications()?
            .iter()
            .map(|notification| notification.notif_id().to_owned())
            .collect();
        self.update_notifications(&ids, status)
    }

    fn update_notifications(&self, ids: &[String], status: NotificationStatus) -> Result<bool> {
        let response = check_http_status(self.req_update_notifications(ids, status)?)?;
        let raw = json_body(response)?;
        // A clean result is an *empty* error object, not an absent one.
        match raw.get("error") {
            Some(serde_json::Value::Object(error)) => Ok(error.is_empty()),
            Some(_) => Ok(false),
            None => Err(MapError::UnexpectedShape {
                reason: "missing `error` envelope".into(),
                raw: raw.clone(),
            }
            .into()),
        }
    }

    // ------------------------------------------------------------------
    // Basecamp and misc
    // ------------------------------------------------------------------

    /// Save a basecamp at `location` (the session's own when `None`) under
    /// `name`. Returns the backend's acknowledgement; the session state is
    /// reconciled either way.
    pub fn set_basecamp(&mut self, name: &str, location: Option<Location>) -> Result<bool> {
        let location = location.unwrap_or(self.location);
        let response = check_http_status(self.req_save_basecamp(name, location)?)?;
        let raw = json_body(response)?;
        self.refresh()?;
        let saved = crate::model::map::required_flag(&raw, "saveBasecamp")?;
        if !saved {
            tracing::warn!("backend declined the basecamp save");
        }
        Ok(saved)
    }

    /// Send the operator a contact-form message. `category` is usually one
    /// of [`CONTACT_REASONS`](crate::CONTACT_REASONS).
    pub fn contact(&self, message: &str, category: &str, email: &str) -> Result<()> {
        check_http_status(self.req_contact(message, category, email)?)?;
        Ok(())
    }

    /// Record an app telemetry event (the official client sends
    /// `ApplicationDidBecomeActive` and friends).
    pub fn log_event(&self, event_type: &str) -> Result<()> {
        check_http_status(self.req_log_event(event_type)?)?;
        Ok(())
    }
}
