//! HTTP-level tests for the content extraction tool.
//!
//! Each test spins up a one-shot HTTP server on a loopback socket so the
//! tool exercises its real reqwest code path without touching the network.

#![cfg(feature = "toolkit")]
#![allow(clippy::unwrap_used, clippy::panic)]

use kumo::tool::Tool;
use kumo::tools::{ExtractContentArgs, ExtractContentTool, FetchResult};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve a single canned HTTP response, then shut down.
async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;

        let response = format!(
            "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
    });

    format!("http://{addr}/")
}

#[tokio::test]
async fn extracts_text_from_served_html() {
    let url = one_shot_server(
        "HTTP/1.1 200 OK",
        "<html><head><title>T</title><script>var x;</script></head>\
         <body><h1>Hello</h1><p>from the server</p></body></html>",
    )
    .await;

    let result = ExtractContentTool::new()
        .call(ExtractContentArgs {
            url,
            max_length: 3000,
        })
        .await
        .unwrap();

    match result {
        FetchResult::Success { text } => {
            assert!(text.contains("Hello"));
            assert!(text.contains("from the server"));
            assert!(!text.contains("var x"));
        }
        FetchResult::Failure { message } => panic!("expected success, got: {message}"),
    }
}

#[tokio::test]
async fn truncates_long_pages() {
    let url = one_shot_server(
        "HTTP/1.1 200 OK",
        "<body>aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa</body>",
    )
    .await;

    let result = ExtractContentTool::new()
        .call(ExtractContentArgs {
            url,
            max_length: 10,
        })
        .await
        .unwrap();

    match result {
        FetchResult::Success { text } => assert_eq!(text, "aaaaaaaaaa..."),
        FetchResult::Failure { message } => panic!("expected success, got: {message}"),
    }
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let url = one_shot_server("HTTP/1.1 500 Internal Server Error", "boom").await;

    let result = ExtractContentTool::new()
        .call(ExtractContentArgs {
            url,
            max_length: 3000,
        })
        .await
        .unwrap();

    match result {
        FetchResult::Failure { message } => {
            assert!(message.starts_with("Request error:"), "got: {message}");
            assert!(message.contains("500"), "got: {message}");
        }
        FetchResult::Success { .. } => panic!("expected failure for HTTP 500"),
    }
}

#[tokio::test]
async fn connection_refused_is_reported_as_request_error() {
    // Bind then drop the listener so the port is very likely unused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = ExtractContentTool::new()
        .with_timeout(2)
        .call(ExtractContentArgs {
            url: format!("http://{addr}/"),
            max_length: 3000,
        })
        .await
        .unwrap();

    match result {
        FetchResult::Failure { message } => {
            assert!(message.starts_with("Request error:"), "got: {message}");
        }
        FetchResult::Success { .. } => panic!("expected failure for refused connection"),
    }
}
