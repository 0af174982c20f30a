//! Raw request builders for every backend operation.
//!
//! Each method assembles exactly the parameter set its operation expects —
//! the backend's hash check is order- and content-sensitive, so these lists
//! are reproduced verbatim rather than factored into a common bundle — and
//! returns the unchecked [`Response`]. Status checking and payload mapping
//! belong to the verbs.

use reqwest::blocking::Response;
use serde_json::json;

use crate::errors::Result;
use crate::model::location::Location;
use crate::model::notification::NotificationStatus;
use crate::model::target::CommentRef;
use crate::session::core::{Session, generate_user_id};

fn p(key: &str, value: impl ToString) -> (String, String) {
    (key.to_owned(), value.to_string())
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

impl Session {
    fn token(&self) -> String {
        self.client.device_token()
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub(crate) fn req_register_user(&self) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("deviceID", generate_user_id()),
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "registerUser", params)
    }

    // ------------------------------------------------------------------
    // Feeds
    // ------------------------------------------------------------------

    pub(crate) fn req_get_message(&self, message_id: &str) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("messageID", message_id),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "getMessage", params)
    }

    pub(crate) fn req_get_messages(&self, location: Location, basecamp: bool) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("lat", location.latitude),
            p("long", location.longitude),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "getMessages", params)
    }

    pub(crate) fn req_get_peek_messages(&self, peek_id: &str) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
            p("peekID", peek_id),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client
            .signed_get(&self.client.main, "getPeekMessages", params)
    }

    pub(crate) fn req_yaks(&self, location: Location) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("lat", location.latitude),
            p("long", location.longitude),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "yaks", params)
    }

    pub(crate) fn req_hot(&self, location: Location, basecamp: bool) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("lat", location.latitude),
            p("long", location.longitude),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "hot", params)
    }

    pub(crate) fn req_my_recent_yaks(&self) -> Result<Response> {
        self.client
            .signed_get(&self.client.main, "getMyRecentYaks", self.self_feed_params())
    }

    pub(crate) fn req_my_recent_replies(&self) -> Result<Response> {
        self.client
            .signed_get(&self.client.main, "getMyRecentReplies", self.self_feed_params())
    }

    // The live service expects no token on this one operation.
    pub(crate) fn req_my_tops(&self) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "getMyTops", params)
    }

    pub(crate) fn req_area_tops(&self) -> Result<Response> {
        let params = vec![
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "getAreaTops", params)
    }

    fn self_feed_params(&self) -> Vec<(String, String)> {
        vec![
            p("accuracy", self.location.accuracy),
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ]
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub(crate) fn req_get_comments(&self, message_id: &str, basecamp: bool) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("messageID", message_id),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "getComments", params)
    }

    // ------------------------------------------------------------------
    // Votes
    // ------------------------------------------------------------------

    pub(crate) fn req_like_message(&self, message_id: &str, basecamp: bool) -> Result<Response> {
        self.client.signed_get(
            &self.client.main,
            "likeMessage",
            self.message_vote_params(message_id, basecamp),
        )
    }

    pub(crate) fn req_downvote_message(&self, message_id: &str, basecamp: bool) -> Result<Response> {
        self.client.signed_get(
            &self.client.main,
            "downvoteMessage",
            self.message_vote_params(message_id, basecamp),
        )
    }

    fn message_vote_params(&self, message_id: &str, basecamp: bool) -> Vec<(String, String)> {
        vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("messageID", message_id),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ]
    }

    pub(crate) fn req_like_comment(&self, comment: &CommentRef, basecamp: bool) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("commentID", comment.comment_id()),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "likeComment", params)
    }

    pub(crate) fn req_downvote_comment(
        &self,
        comment: &CommentRef,
        basecamp: bool,
    ) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("commentID", comment.comment_id()),
            p("messageID", comment.message_id()),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client
            .signed_get(&self.client.main, "downvoteComment", params)
    }

    // ------------------------------------------------------------------
    // Reports and deletes
    // ------------------------------------------------------------------

    pub(crate) fn req_report_message(
        &self,
        message_id: &str,
        reason: &str,
        basecamp: bool,
    ) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("messageID", message_id),
            p("reason", reason),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "reportMessage", params)
    }

    pub(crate) fn req_report_comment(
        &self,
        comment: &CommentRef,
        reason: &str,
        basecamp: bool,
    ) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("commentID", comment.comment_id()),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("messageID", comment.message_id()),
            p("reason", reason),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "reportComment", params)
    }

    pub(crate) fn req_delete_message(&self, message_id: &str, basecamp: bool) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("messageID", message_id),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "deleteMessage2", params)
    }

    pub(crate) fn req_delete_comment(&self, comment: &CommentRef, basecamp: bool) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("commentID", comment.comment_id()),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("messageID", comment.message_id()),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        self.client.signed_get(&self.client.main, "deleteComment", params)
    }

    // ------------------------------------------------------------------
    // Posting
    // ------------------------------------------------------------------

    pub(crate) fn req_send_message(
        &self,
        message: &str,
        handle: Option<&str>,
        bypass_threat_popup: bool,
        basecamp: bool,
    ) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("bc", flag(basecamp)),
            p("token", self.token()),
            p("userID", &self.user_id),
        ];
        let mut form = vec![
            p("bypassedThreatPopup", flag(bypass_threat_popup)),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("message", message),
        ];
        if let Some(handle) = handle {
            form.push(p("hndl", handle));
        }
        self.client
            .signed_post(&self.client.main, "sendMessage", params, form)
    }

    pub(crate) fn req_post_comment(
        &self,
        comment: &str,
        message_id: &str,
        bypass_threat_popup: bool,
        basecamp: bool,
    ) -> Result<Response> {
        let at = self.op_location(basecamp);
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("bc", flag(basecamp)),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        let form = vec![
            p("bypassedThreatPopup", flag(bypass_threat_popup)),
            p("comment", comment),
            p("lat", at.latitude),
            p("long", at.longitude),
            p("messageID", message_id),
        ];
        self.client
            .signed_post(&self.client.main, "postComment", params, form)
    }

    pub(crate) fn req_submit_peek_message(
        &self,
        message: &str,
        peek_id: &str,
        handle: Option<&str>,
        bypass_threat_popup: bool,
    ) -> Result<Response> {
        let params = vec![p("token", self.token()), p("userID", &self.user_id)];
        let mut form = vec![
            p("bypassedThreatPopup", flag(bypass_threat_popup)),
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
            p("message", message),
            p("peekID", peek_id),
        ];
        if let Some(handle) = handle {
            form.push(p("hndl", handle));
        }
        self.client
            .signed_post(&self.client.main, "submitPeekMessage", params, form)
    }

    // ------------------------------------------------------------------
    // Misc main-API operations
    // ------------------------------------------------------------------

    pub(crate) fn req_contact(
        &self,
        message: &str,
        category: &str,
        email: &str,
    ) -> Result<Response> {
        let params = vec![p("token", self.token()), p("userID", &self.user_id)];
        let form = vec![
            p("category", category),
            p("email", email),
            p("message", message),
        ];
        self.client
            .signed_post(&self.client.main, "contactUs", params, form)
    }

    pub(crate) fn req_log_event(&self, event_type: &str) -> Result<Response> {
        let params = vec![
            p("accuracy", self.location.accuracy),
            p("token", self.token()),
            p("userID", &self.user_id),
            p("userLat", self.location.latitude),
            p("userLong", self.location.longitude),
        ];
        let form = vec![
            p("eventType", event_type),
            p("lat", self.location.latitude),
            p("long", self.location.longitude),
        ];
        self.client
            .signed_post(&self.client.main, "logEvent", params, form)
    }

    // ------------------------------------------------------------------
    // Basecamp service
    // ------------------------------------------------------------------

    pub(crate) fn req_save_basecamp(&self, name: &str, location: Location) -> Result<Response> {
        let params = vec![p("token", self.token()), p("userID", &self.user_id)];
        let form = vec![
            p("bcLat", location.latitude),
            p("bcLong", location.longitude),
            p("bcName", name),
            p("bcPeekId", 0),
        ];
        self.client
            .signed_post(&self.client.basecamp, "saveBasecamp", params, form)
    }

    // ------------------------------------------------------------------
    // Notification service (unsigned)
    // ------------------------------------------------------------------

    pub(crate) fn req_notifications(&self) -> Result<Response> {
        let url = self
            .client
            .notify
            .join("getAllForUser/")?
            .join(&self.user_id)?;
        self.client.get(url)
    }

    pub(crate) fn req_update_notifications(
        &self,
        notification_ids: &[String],
        status: NotificationStatus,
    ) -> Result<Response> {
        let url = self.client.notify.join("updateBatch/")?;
        let body = json!({
            "notificationIDs": notification_ids,
            "status": status.as_str(),
            "userID": self.user_id,
        });
        self.client.post_json(url, &body)
    }
}
