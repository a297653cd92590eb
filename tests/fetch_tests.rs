//! Fetcher integration tests against a loopback HTTP server

mod common;

use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use appstow::progress::ProgressReporter;
use appstow::progress::SilentProgress;
use appstow::{AppstowError, FetchOptions, Fetcher};
use common::{Reply, TestEnv, TestServer};

fn fetcher() -> Fetcher {
    Fetcher::new(FetchOptions {
        connect_timeout: Duration::from_secs(5),
        read_timeout: Duration::from_secs(10),
    })
    .unwrap()
}

#[derive(Default)]
struct Recorder {
    received: Mutex<Vec<u64>>,
}

impl ProgressReporter for Recorder {
    fn download(&self, received: u64, _total: Option<u64>) {
        self.received.lock().unwrap().push(received);
    }
}

#[test]
fn test_download_body() {
    let env = TestEnv::new();
    let body = vec![7u8; 40_000];
    let server = TestServer::start(vec![("/a.jar", Reply::Body(body.clone()))]);
    let dest = env.root.join("a.jar");
    let recorder = Recorder::default();

    let written = fetcher()
        .download(&server.url("/a.jar"), &dest, &recorder)
        .unwrap();

    assert_eq!(written, 40_000);
    assert_eq!(fs::read(&dest).unwrap(), body);
    let received = recorder.received.lock().unwrap();
    assert_eq!(received.last().copied(), Some(40_000));
}

#[test]
fn test_default_scheme() {
    let env = TestEnv::new();
    let server = TestServer::start(vec![("/a.jar", Reply::Body(b"jar".to_vec()))]);
    let dest = env.root.join("a.jar");
    let location = format!("{}/a.jar", server.addr);

    fetcher().download(&location, &dest, &SilentProgress).unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"jar");
}

#[test]
fn test_follows_one_redirect() {
    let env = TestEnv::new();
    let server = TestServer::start(vec![
        ("/relative", Reply::Redirect("/a.jar".to_string())),
        ("/a.jar", Reply::Body(b"payload".to_vec())),
    ]);
    let absolute = server.url("/a.jar");
    let server2 = TestServer::start(vec![("/absolute", Reply::Redirect(absolute))]);

    let dest = env.root.join("one.jar");
    fetcher()
        .download(&server.url("/relative"), &dest, &SilentProgress)
        .unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"payload");

    let dest = env.root.join("two.jar");
    fetcher()
        .download(&server2.url("/absolute"), &dest, &SilentProgress)
        .unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"payload");
}

#[test]
fn test_second_redirect_fails() {
    let env = TestEnv::new();
    let server = TestServer::start(vec![
        ("/first", Reply::Redirect("/second".to_string())),
        ("/second", Reply::Redirect("/a.jar".to_string())),
        ("/a.jar", Reply::Body(b"payload".to_vec())),
    ]);

    let result = fetcher().download(&server.url("/first"), &env.root.join("a.jar"), &SilentProgress);
    match result {
        Err(AppstowError::FetchFailed { reason, .. }) => {
            assert!(reason.contains("too many redirects"));
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
}

#[test]
fn test_error_status_fails() {
    let env = TestEnv::new();
    let server = TestServer::start(vec![("/broken", Reply::Status(500))]);

    for path in ["/missing", "/broken"] {
        let result = fetcher().download(&server.url(path), &env.root.join("a.jar"), &SilentProgress);
        assert!(matches!(result, Err(AppstowError::FetchFailed { .. })));
    }
}

#[test]
fn test_truncated_body_fails() {
    let env = TestEnv::new();
    let server = TestServer::start(vec![("/a.jar", Reply::Truncated(b"partial".to_vec()))]);

    let result = fetcher().download(&server.url("/a.jar"), &env.root.join("a.jar"), &SilentProgress);
    assert!(matches!(result, Err(AppstowError::FetchFailed { .. })));
}

#[test]
fn test_connection_refused_fails() {
    let env = TestEnv::new();
    // Bind then drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let result = fetcher().download(
        &format!("http://127.0.0.1:{port}/a.jar"),
        &env.root.join("a.jar"),
        &SilentProgress,
    );
    assert!(matches!(result, Err(AppstowError::FetchFailed { .. })));
}

#[test]
fn test_download_to_writer() {
    let server = TestServer::start(vec![("/a.jar", Reply::Body(b"payload".to_vec()))]);
    let mut sink = Vec::new();

    let written = fetcher()
        .download_to(&server.url("/a.jar"), &mut sink, &SilentProgress)
        .unwrap();
    assert_eq!(written, 7);
    assert_eq!(sink, b"payload");
}
