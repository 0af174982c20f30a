//! End-to-end session flows against a mocked backend.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;

use httpmock::prelude::*;
use serde_json::{Value, json};

use yakkit::{Config, Error, Location, NotificationStatus, Session, YakHttpClient};

fn client_for(server: &MockServer) -> YakHttpClient {
    let mut builder = YakHttpClient::builder();
    builder.config(Config {
        main_url: server.url("/api/"),
        basecamp_url: server.url("/bc/"),
        notify_url: server.url("/notify/"),
        install_url: server.url("/parse/"),
        install_app_id: None,
        install_client_key: None,
        ..Config::default()
    });
    builder.build().unwrap()
}

fn here() -> Location {
    Location::new(40.0, -75.0)
}

fn yak_record(message_id: &str, message: &str, liked: i64) -> Value {
    json!({
        "deliveryID": 0,
        "liked": liked,
        "numberOfLikes": 7,
        "messageID": message_id,
        "posterID": "POSTER",
        "time": "2015-06-01 12:00:00",
        "type": 0,
        "comments": 2,
        "hidePin": 0,
        "latitude": 40.0,
        "longitude": -75.0,
        "message": message,
    })
}

fn comment_record(comment_id: &str, message_id: &str, text: &str, liked: i64) -> Value {
    json!({
        "deliveryID": 0,
        "liked": liked,
        "numberOfLikes": 3,
        "messageID": message_id,
        "posterID": "POSTER",
        "time": "2015-06-01 12:30:00",
        "comment": text,
        "commentID": comment_id,
    })
}

fn notification_record(notif_id: &str, status: &str) -> Value {
    json!({
        "body": "someone replied to your yak",
        "content": "R/abc",
        "count": 1,
        "created": "2015-05-01T10:00:00Z",
        "key": "reply:R/abc",
        "_id": notif_id,
        "priority": "5",
        "reason": "reply",
        "status": status,
        "subject": "New reply",
        "thingID": "R/abc",
        "thingType": "message",
        "updated": "2015-05-01T10:05:00Z",
    })
}

/// The authenticated (bc=1) feed response `refresh` reconciles from.
fn account_state(messages: Value) -> Value {
    json!({
        "messages": messages,
        "yakarma": 125,
        "bcEligible": 1,
        "bcLat": 41.5,
        "bcLong": -73.25,
        "bcName": "Home",
    })
}

/// Mock the bc=1 feed every `refresh` call hits.
fn mock_refresh(server: &MockServer) -> httpmock::Mock<'_> {
    let state = account_state(json!([]));
    server.mock(move |when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "1");
        then.status(200).json_body(state.clone());
    })
}

#[test]
fn signin_reconciles_account_state() {
    let server = MockServer::start();
    let refresh = mock_refresh(&server);

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();

    refresh.assert();
    assert_eq!(session.user_id(), "USER123");
    assert_eq!(session.yakarma(), 125);
    assert!(session.basecamp_set());
    let basecamp = session.basecamp().unwrap();
    assert_eq!(basecamp.name(), "Home");
    assert_eq!(basecamp.location().latitude, 41.5);
}

#[test]
fn signin_without_basecamp_leaves_it_unset() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "1");
        then.status(200)
            .json_body(json!({"messages": [], "yakarma": 80, "bcEligible": 0}));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();

    assert_eq!(session.yakarma(), 80);
    assert!(!session.basecamp_set());
    assert!(session.basecamp().is_none());
}

#[test]
fn local_feed_maps_records() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "0");
        then.status(200).json_body(json!({
            "messages": [
                yak_record("R/one", "first", 0),
                yak_record("R/two", "second", 1),
            ]
        }));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    let yaks = session.yaks(None, false).unwrap();

    assert_eq!(yaks.len(), 2);
    assert_eq!(yaks[0].message_id(), "R/one");
    assert_eq!(yaks[0].message(), "first");
    assert!(yaks[0].loaded());
    assert_eq!(yaks[1].liked(), 1);
}

#[test]
fn no_content_sentinel_gives_empty_feed() {
    let server = MockServer::start();
    mock_refresh(&server);
    let sentinel = Config::default().no_yaks_id;
    server.mock(move |when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "0");
        then.status(200).json_body(json!({
            "messages": [yak_record(&sentinel, "nothing here", 0)]
        }));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(session.yaks(None, false).unwrap().is_empty());
}

#[test]
fn restricted_zone_surfaces_as_an_error() {
    let server = MockServer::start();
    mock_refresh(&server);
    let sentinel = Config::default().too_close_id;
    server.mock(move |when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "0");
        then.status(200).json_body(json!({
            "messages": [yak_record(&sentinel, "school zone", 0)]
        }));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(matches!(
        session.yaks(None, false),
        Err(Error::TooCloseToSchool)
    ));
}

#[test]
fn basecamp_gate_blocks_before_any_request() {
    let server = MockServer::start();
    let bc_feed = server.mock(|when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "1");
        then.status(200)
            .json_body(json!({"messages": [], "yakarma": 80, "bcEligible": 0}));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(matches!(
        session.yaks(None, true),
        Err(Error::NoBasecampSet)
    ));

    // Only the signin refresh reached the backend.
    bc_feed.assert_hits(1);
}

#[test]
fn upvote_without_observed_change_reports_false() {
    let server = MockServer::start();
    mock_refresh(&server);
    let get_message = server.mock(|when, then| {
        when.method(GET).path("/api/getMessage");
        then.status(200)
            .json_body(json!({"messages": [yak_record("R/one", "first", 0)]}));
    });
    let like = server.mock(|when, then| {
        when.method(GET).path("/api/likeMessage");
        then.status(200).body("1");
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    // The mocked state never changes, so the vote must report failure even
    // though the backend acknowledged it.
    assert!(!session.upvote_yak("R/one", false).unwrap());

    like.assert_hits(1);
    get_message.assert_hits(2);
}

/// Minimal HTTP responder whose answers can depend on mutable state.
///
/// Vote verbs fetch the target twice within one call and report the `liked`
/// transition between the fetches, which a static mock cannot express.
/// `handler` maps the raw request head to a response body.
fn spawn_stateful_backend<F>(handler: F) -> String
where
    F: Fn(&str) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api/", listener.local_addr().unwrap());
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|end| end == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf).into_owned();
            let body = handler(&head);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    base
}

fn session_against(base: &str) -> Session {
    let mut builder = YakHttpClient::builder();
    builder.config(Config {
        main_url: base.to_owned(),
        basecamp_url: base.to_owned(),
        notify_url: base.to_owned(),
        install_url: base.to_owned(),
        install_app_id: None,
        install_client_key: None,
        ..Config::default()
    });
    Session::signin(builder.build().unwrap(), here(), "USER123").unwrap()
}

#[test]
fn vote_toggle_is_observed_through_liked_transitions() {
    // The backend flips the self-vote marker on every likeMessage, the way
    // the live service toggles a vote on and off.
    let liked = Arc::new(AtomicI64::new(0));
    let state = Arc::clone(&liked);
    let base = spawn_stateful_backend(move |head| {
        if head.starts_with("GET /api/getMessage?") {
            json!({"messages": [yak_record("R/one", "first", state.load(Ordering::SeqCst))]})
                .to_string()
        } else if head.starts_with("GET /api/likeMessage?") {
            state.fetch_xor(1, Ordering::SeqCst);
            "1".into()
        } else {
            json!({"messages": [], "yakarma": 100, "bcEligible": 0}).to_string()
        }
    });

    let mut session = session_against(&base);

    // First call: 0 -> 1 observed, reported as success.
    assert!(session.upvote_yak("R/one", false).unwrap());
    // Second call retracts the vote; also a transition, and the state is
    // back where it started.
    assert!(session.upvote_yak("R/one", false).unwrap());
    assert_eq!(liked.load(Ordering::SeqCst), 0);
}

#[test]
fn comment_vote_observes_the_liked_transition() {
    let liked = Arc::new(AtomicI64::new(0));
    let state = Arc::clone(&liked);
    let base = spawn_stateful_backend(move |head| {
        if head.starts_with("GET /api/getComments?") {
            json!({
                "comments": [comment_record("C/1", "R/parent", "hi", state.load(Ordering::SeqCst))]
            })
            .to_string()
        } else if head.starts_with("GET /api/likeComment?") {
            state.fetch_xor(1, Ordering::SeqCst);
            "1".into()
        } else {
            json!({"messages": [], "yakarma": 100, "bcEligible": 0}).to_string()
        }
    });

    let mut session = session_against(&base);
    assert!(session.upvote_comment(("R/parent", "C/1"), false).unwrap());
    assert_eq!(liked.load(Ordering::SeqCst), 1);
}

#[test]
fn comment_vote_without_observed_change_reports_false() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/getComments");
        then.status(200).json_body(json!({
            "comments": [comment_record("C/1", "R/parent", "hi", 0)]
        }));
    });
    let downvote = server.mock(|when, then| {
        when.method(GET)
            .path("/api/downvoteComment")
            .query_param("commentID", "C/1")
            .query_param("messageID", "R/parent");
        then.status(200).body("1");
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(!session.downvote_comment(("R/parent", "C/1"), false).unwrap());
    downvote.assert();
}

#[test]
fn vote_on_missing_yak_sends_no_vote_request() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/getMessage");
        then.status(200).json_body(json!({"messages": []}));
    });
    let like = server.mock(|when, then| {
        when.method(GET).path("/api/likeMessage");
        then.status(200).body("1");
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(!session.upvote_yak("R/gone", false).unwrap());
    like.assert_hits(0);
}

#[test]
fn delete_confirms_absence() {
    let server = MockServer::start();
    mock_refresh(&server);
    let delete = server.mock(|when, then| {
        when.method(GET).path("/api/deleteMessage2");
        then.status(200).body("1");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getMessage");
        then.status(200).json_body(json!({"messages": []}));
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(session.delete_yak("R/mine", false).unwrap());
    delete.assert();
}

#[test]
fn delete_of_a_surviving_yak_reports_false() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/deleteMessage2");
        then.status(200).body("1");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getMessage");
        then.status(200)
            .json_body(json!({"messages": [yak_record("R/other", "not mine", 0)]}));
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(!session.delete_yak("R/other", false).unwrap());
}

#[test]
fn post_yak_returns_the_committed_record() {
    let server = MockServer::start();
    mock_refresh(&server);
    let send = server.mock(|when, then| {
        when.method(POST).path("/api/sendMessage");
        then.status(200).body("1");
    });
    let feed = server.mock(|when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "0");
        then.status(200)
            .json_body(json!({"messages": [yak_record("R/new", "hello campus", 0)]}));
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    let posted = session
        .post_yak("hello campus", None, false, false)
        .unwrap()
        .unwrap();

    assert_eq!(posted.message(), "hello campus");
    assert_eq!(posted.message_id(), "R/new");
    send.assert();
    // Commit read plus the result fetch.
    feed.assert_hits(2);
}

#[test]
fn declined_post_maps_to_none() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/sendMessage");
        then.status(200).body("0");
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "0");
        then.status(200).json_body(json!({"messages": []}));
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(session.post_yak("nope", None, false, false).unwrap().is_none());
}

#[test]
fn post_comment_returns_the_latest_thread_entry() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/postComment");
        then.status(200).body("1");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/getComments");
        then.status(200).json_body(json!({
            "comments": [
                comment_record("C/1", "R/parent", "older", 0),
                comment_record("C/2", "R/parent", "fresh reply", 0),
            ]
        }));
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    let posted = session
        .post_comment("fresh reply", "R/parent", false, false)
        .unwrap()
        .unwrap();
    assert_eq!(posted.comment_id(), "C/2");
    assert_eq!(posted.comment(), "fresh reply");
}

#[test]
fn comment_lookup_needs_the_parent_yak() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/getComments");
        then.status(200).json_body(json!({
            "comments": [comment_record("C/1", "R/parent", "hi", 0)]
        }));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();

    let found = session.comment(("R/parent", "C/1"), false).unwrap();
    assert_eq!(found.unwrap().comment(), "hi");

    let missing = session.comment(("R/parent", "C/9"), false).unwrap();
    assert!(missing.is_none());

    // A bare comment ID cannot name its thread.
    assert!(matches!(
        session.comment("C/1", false),
        Err(Error::Coercion(_))
    ));
}

#[test]
fn peek_locations_come_from_the_local_feed() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/getMessages")
            .query_param("bc", "0");
        then.status(200).json_body(json!({
            "messages": [],
            "featuredLocations": [{
                "peekID": 42,
                "location": "State College",
                "latitude": 40.79,
                "longitude": -77.86,
                "delta": 0.02,
                "canReply": 1,
                "canReport": 0,
                "canSubmit": 1,
                "canVote": 1,
                "isLocal": 1,
                "inactive": 0,
                "photosEnabled": 0,
            }],
            "otherLocations": [],
        }));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();

    let featured = session.featured_peek_locations().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].name(), "State College");
    assert_eq!(featured[0].peek_id(), "42");
    assert!(session.other_peek_locations().unwrap().is_empty());
}

#[test]
fn peek_feed_reads_by_peek_id() {
    let server = MockServer::start();
    mock_refresh(&server);
    let peek_feed = server.mock(|when, then| {
        when.method(GET)
            .path("/api/getPeekMessages")
            .query_param("peekID", "42");
        then.status(200)
            .json_body(json!({"messages": [yak_record("R/peeked", "from afar", 0)]}));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    let yaks = session.peek_yaks_by_id("42").unwrap();
    assert_eq!(yaks.len(), 1);
    peek_feed.assert();
}

#[test]
fn set_basecamp_reports_the_acknowledgement() {
    let server = MockServer::start();
    let refresh = mock_refresh(&server);
    let save = server.mock(|when, then| {
        when.method(POST).path("/bc/saveBasecamp");
        then.status(200).json_body(json!({"saveBasecamp": 1}));
    });

    let mut session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    assert!(session.set_basecamp("Home", None).unwrap());

    save.assert();
    // Signin refresh plus the post-save reconciliation.
    refresh.assert_hits(2);
    assert_eq!(session.basecamp().unwrap().name(), "Home");
}

#[test]
fn notifications_list_and_mark() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET).path("/notify/getAllForUser/USER123");
        then.status(200).json_body(json!({
            "data": [
                notification_record("n-1", "unread"),
                notification_record("n-2", "read"),
            ]
        }));
    });
    let update = server.mock(|when, then| {
        when.method(POST).path("/notify/updateBatch/");
        then.status(200).json_body(json!({"error": {}}));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();

    let notifications = session.notifications().unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(!notifications[0].is_read());
    assert!(notifications[1].is_read());

    assert!(session
        .mark_all_notifications(NotificationStatus::Read)
        .unwrap());
    update.assert();
}

#[test]
fn notification_service_error_envelope_maps_to_false() {
    let server = MockServer::start();
    mock_refresh(&server);
    server.mock(|when, then| {
        when.method(GET).path("/notify/getAllForUser/USER123");
        then.status(200)
            .json_body(json!({"data": [notification_record("n-1", "unread")]}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/notify/updateBatch/");
        then.status(200)
            .json_body(json!({"error": {"code": 17, "message": "nope"}}));
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();
    let notifications = session.notifications().unwrap();
    assert!(!session
        .mark_notification(&notifications[0], NotificationStatus::Read)
        .unwrap());
}

#[test]
fn fire_and_forget_operations_hit_their_endpoints() {
    let server = MockServer::start();
    mock_refresh(&server);
    let report = server.mock(|when, then| {
        when.method(GET)
            .path("/api/reportMessage")
            .query_param("reason", "spam");
        then.status(200).body("1");
    });
    let contact = server.mock(|when, then| {
        when.method(POST).path("/api/contactUs");
        then.status(200).body("1");
    });
    let event = server.mock(|when, then| {
        when.method(POST).path("/api/logEvent");
        then.status(200).body("1");
    });
    let submit = server.mock(|when, then| {
        when.method(POST).path("/api/submitPeekMessage");
        then.status(200).body("1");
    });

    let session = Session::signin(client_for(&server), here(), "USER123").unwrap();

    session.report_yak("R/spam", "spam", false).unwrap();
    session
        .contact("my yakarma reset", "Other", "me@example.com")
        .unwrap();
    session.log_event("ApplicationDidBecomeActive").unwrap();
    session
        .submit_peek_yak("hello from afar", "42", None, false)
        .unwrap();

    report.assert();
    contact.assert();
    event.assert();
    submit.assert();
}

#[test]
fn server_errors_carry_status_and_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/getMessages");
        then.status(500).body("backend on fire");
    });

    let err = Session::signin(client_for(&server), here(), "USER123").unwrap_err();
    match err {
        Error::Request(request_error) => {
            let text = request_error.to_string();
            assert!(text.contains("500"), "unexpected error text: {text}");
            assert!(text.contains("backend on fire"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
