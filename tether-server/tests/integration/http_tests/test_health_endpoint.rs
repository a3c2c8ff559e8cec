use tether_server::{RelayServerConfig, serve_on};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::integration::init_tracing;

#[tokio::test]
async fn test_health_endpoint() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    let config = RelayServerConfig {
        bind_addr: addr,
        ..Default::default()
    };
    tokio::spawn(async move { serve_on(listener, &config).await });

    let mut stream = TcpStream::connect(addr).await.expect("connect failed");
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write failed");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read failed");

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("ok"), "{response}");
}
