// src/fetch/http.rs

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::NetworkError;

/// GET `url` and return the whole body. Any non-2xx status is an error.
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, NetworkError> {
    let transport = |source| NetworkError::Transport {
        url: url.to_string(),
        source,
    };

    let resp = client.get(url.as_str()).send().await.map_err(transport)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await.map_err(transport)?;
    debug!(url = %url, bytes = bytes.len(), "downloaded");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single request on localhost with `head` followed by `body`.
    async fn serve_once(head: &'static str, body: &'static [u8]) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let response = format!("{}content-length: {}\r\nconnection: close\r\n\r\n", head, body.len());
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.write_all(body).await.unwrap();
            sock.shutdown().await.unwrap();
        });
        Url::parse(&format!("http://{}/data.xlsx", addr)).unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let url = serve_once("HTTP/1.1 200 OK\r\n", b"PK\x03\x04payload").await;
        let bytes = fetch_bytes(&Client::new(), &url).await.unwrap();
        assert_eq!(bytes, b"PK\x03\x04payload");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\n", b"").await;
        let err = fetch_bytes(&Client::new(), &url).await.unwrap_err();
        match err {
            NetworkError::Status { status, url: u } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(u, url.to_string());
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        // bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let url = Url::parse(&format!("http://{}/data.xlsx", addr)).unwrap();
        let err = fetch_bytes(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, NetworkError::Transport { .. }), "got {err:?}");
    }
}
