/// HTTP client tests against a local fake backend.
///
/// Each test starts a `tiny_http` server on an ephemeral port that plays the
/// parking backend's two admin endpoints, then drives `HttpSpotApi` (and a
/// panel built on it) over real sockets.
use std::sync::mpsc::{self, Receiver};
use std::thread;

use spotpanel::api::{HttpSpotApi, SpotApi, SpotId};
use spotpanel::config::schema::{ApiConfig, PanelSettings};
use spotpanel::panel::{PageHost, ShowOutcome, SpotDetailPanel};
use tiny_http::{Response, Server, StatusCode};

/// A request as seen by the fake backend.
#[derive(Debug)]
struct Seen {
    method: String,
    url: String,
    cookie: Option<String>,
}

/// Serve `expected` requests, answering each with `respond(method, url)`.
fn spawn_backend<F>(expected: usize, respond: F) -> (String, Receiver<Seen>)
where
    F: Fn(&str, &str) -> (u16, String) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("bind fake backend");
    let addr = server.server_addr().to_ip().expect("ip listener");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for _ in 0..expected {
            let Ok(request) = server.recv() else {
                return;
            };
            let method = request.method().to_string();
            let url = request.url().to_string();
            let cookie = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Cookie"))
                .map(|h| h.value.as_str().to_string());

            let (status, body) = respond(&method, &url);
            let _ = tx.send(Seen { method, url, cookie });
            let _ = request.respond(Response::from_string(body).with_status_code(StatusCode(status)));
        }
    });

    (format!("http://{addr}"), rx)
}

fn spot(id: &str) -> SpotId {
    SpotId::parse(id).unwrap()
}

struct AlwaysYes;

impl PageHost for AlwaysYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }

    fn notify(&self, message: &str) {
        panic!("unexpected notification: {message}");
    }

    fn reload(&self) {}
}

#[test]
fn fetch_details_hits_details_endpoint() {
    let (base, seen) = spawn_backend(1, |_, _| (200, r#"{"ok":true}"#.to_string()));
    let client = HttpSpotApi::new(&base);

    let reply = client.fetch_details(&spot("12")).unwrap();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, r#"{"ok":true}"#);

    let request = seen.recv().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/admin/spot-details/12");
}

#[test]
fn error_status_is_a_reply_not_an_error() {
    let (base, _seen) = spawn_backend(1, |_, _| (404, r#"{"error":"Spot not found"}"#.to_string()));
    let client = HttpSpotApi::new(&base);

    let reply = client.fetch_details(&spot("404")).unwrap();
    assert_eq!(reply.status, 404);
    assert!(!reply.is_success());
    assert_eq!(reply.body, r#"{"error":"Spot not found"}"#);
}

#[test]
fn delete_posts_to_delete_endpoint() {
    let (base, seen) = spawn_backend(1, |_, _| (200, String::new()));
    let client = HttpSpotApi::new(&base);

    let reply = client.delete_spot(&spot("7")).unwrap();
    assert!(reply.is_success());

    let request = seen.recv().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/admin/delete_spot/7");
}

#[test]
fn session_cookie_is_forwarded() {
    let (base, seen) = spawn_backend(1, |_, _| (200, "{}".to_string()));
    let client = HttpSpotApi::from_config(&ApiConfig {
        base_url: base,
        timeout_ms: 5_000,
        session_cookie: "session=admin-token".to_string(),
    });

    client.fetch_details(&spot("1")).unwrap();
    assert_eq!(seen.recv().unwrap().cookie.as_deref(), Some("session=admin-token"));
}

#[test]
fn unreachable_backend_is_an_error() {
    // Bind and immediately drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpSpotApi::new(&format!("http://127.0.0.1:{port}"));

    assert!(client.fetch_details(&spot("1")).is_err());
    assert!(client.delete_spot(&spot("1")).is_err());
}

#[test]
fn panel_over_http_renders_and_deletes() {
    let (base, seen) = spawn_backend(2, |method, url| match (method, url) {
        ("GET", "/admin/spot-details/3") => (
            200,
            r#"{"spot_id":3,"spot_status":"A","current_occupied":false,
                "current_booking_details":null,"future_bookings_details":[],
                "is_deletable":true}"#
                .to_string(),
        ),
        ("POST", "/admin/delete_spot/3") => (200, String::new()),
        _ => (404, r#"{"error":"not found"}"#.to_string()),
    });

    let p = SpotDetailPanel::new(HttpSpotApi::new(&base), &PanelSettings::default());
    assert_eq!(p.show_details(&spot("3")), ShowOutcome::Rendered);
    assert!(p.markup().contains("Available"));
    assert!(p.markup().contains("data-action=\"delete-spot\""));

    p.delete_spot(&spot("3"), &AlwaysYes);

    let urls: Vec<String> = seen.iter().take(2).map(|s| s.url).collect();
    assert_eq!(urls, vec!["/admin/spot-details/3", "/admin/delete_spot/3"]);
}
