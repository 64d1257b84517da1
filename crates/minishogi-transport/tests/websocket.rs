//! Integration tests for the WebSocket transport: frame round-trips, clean
//! close, and the health fallback for plain HTTP requests.

use futures_util::{SinkExt, StreamExt};
use minishogi_transport::{Connection, Transport, WebSocketTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_tungstenite::tungstenite::Message;

async fn bind() -> (WebSocketTransport, String) {
    let transport = WebSocketTransport::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = transport
        .local_addr()
        .expect("should have local addr")
        .to_string();
    (transport, addr)
}

#[tokio::test]
async fn test_text_frame_round_trip() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        let frame = conn.recv().await.expect("recv").expect("frame");
        assert_eq!(frame, "hello relay");
        conn.send("hello client").await.expect("send");
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connect");
    ws.send(Message::Text("hello relay".into()))
        .await
        .expect("send");

    let reply = ws.next().await.unwrap().expect("recv");
    assert_eq!(reply.into_text().expect("text").as_str(), "hello client");

    server.await.unwrap();
}

#[tokio::test]
async fn test_binary_json_frame_is_accepted_as_text() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        conn.recv().await.expect("recv").expect("frame")
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connect");
    ws.send(Message::Binary(br#"{"type":"reset"}"#.to_vec().into()))
        .await
        .expect("send");

    assert_eq!(server.await.unwrap(), r#"{"type":"reset"}"#);
}

#[tokio::test]
async fn test_clean_close_yields_none() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        conn.recv().await.expect("recv should not error")
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connect");
    ws.close(None).await.expect("close");

    assert_eq!(server.await.unwrap(), None);
}

#[tokio::test]
async fn test_connections_get_distinct_ids() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move {
        let first = transport.accept().await.expect("accept first");
        let second = transport.accept().await.expect("accept second");
        (first.id(), second.id())
    });

    let (_ws1, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connect first");
    let (_ws2, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connect second");

    let (a, b) = server.await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_plain_http_request_gets_health_response() {
    let (transport, addr) = bind().await;
    let mut transport = transport.with_health_body("relay up");

    // The probe is served inside accept(); the accept future itself keeps
    // waiting for a real game client and is dropped at end of test.
    tokio::spawn(async move {
        let _ = transport.accept().await;
    });

    let mut stream = tokio::net::TcpStream::connect(&addr)
        .await
        .expect("connect");
    stream
        .write_all(b"GET / HTTP/1.1\r\nhost: localhost\r\n\r\n")
        .await
        .expect("write request");

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.expect("read");
    let response = String::from_utf8(response).expect("utf8");

    assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
    assert!(response.ends_with("relay up"), "got: {response}");
}

#[tokio::test]
async fn test_websocket_still_accepted_after_health_probe() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move {
        // The probe is swallowed by the accept loop; the returned
        // connection must be the real client.
        let conn = transport.accept().await.expect("accept");
        conn.recv().await.expect("recv").expect("frame")
    });

    let mut probe = tokio::net::TcpStream::connect(&addr)
        .await
        .expect("probe connect");
    probe
        .write_all(b"GET / HTTP/1.1\r\nhost: localhost\r\n\r\n")
        .await
        .expect("probe write");
    let mut response = Vec::new();
    probe.read_to_end(&mut response).await.expect("probe read");

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("connect");
    ws.send(Message::Text("after probe".into()))
        .await
        .expect("send");

    assert_eq!(server.await.unwrap(), "after probe");
}
