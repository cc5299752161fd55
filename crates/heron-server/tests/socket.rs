//! Socket-level tests over a real TCP listener.

use std::net::SocketAddr;

use heron_core::{handler_fn, Request, Response, ResponseExt};
use heron_server::{Server, ServerError, REQUEST_ID_HEADER};
use http::{Method, StatusCode};
use http_body_util::BodyExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = Server::builder()
        .route(
            Method::GET,
            "/home",
            handler_fn(|_ctx, _req| async { Response::text(StatusCode::OK, "Welcome") }),
        )
        .route(
            Method::POST,
            "/echo",
            handler_fn(|_ctx, req: Request| async move {
                let body = req.into_body().collect().await.unwrap().to_bytes();
                Response::text(StatusCode::OK, &String::from_utf8_lossy(&body))
            }),
        )
        .build();

    tokio::spawn(server.serve(listener));
    addr
}

async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

#[tokio::test]
async fn test_get_over_socket() {
    let addr = spawn_server().await;
    let response = roundtrip(
        addr,
        "GET /home HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains(REQUEST_ID_HEADER));
    assert!(response.ends_with("Welcome"));
}

#[tokio::test]
async fn test_body_is_collected_before_dispatch() {
    let addr = spawn_server().await;
    let response = roundtrip(
        addr,
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\
         Connection: close\r\n\r\nhello",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("hello"));
}

#[tokio::test]
async fn test_routing_misses_over_socket() {
    let addr = spawn_server().await;

    let not_found = roundtrip(
        addr,
        "GET /nowhere HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(not_found.starts_with("HTTP/1.1 404 Not Found"), "{not_found}");

    let not_allowed = roundtrip(
        addr,
        "DELETE /home HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(
        not_allowed.starts_with("HTTP/1.1 405 Method Not Allowed"),
        "{not_allowed}"
    );
    assert!(not_allowed.to_ascii_lowercase().contains("allow: get"));
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = occupied.local_addr().unwrap();

    let err = Server::builder()
        .addr(addr.to_string())
        .build()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, ServerError::Bind { .. }));
}
