//! Connection establishment.

use anyhow::{Context, Result};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Resolves `host` and connects to the first address that accepts.
///
/// The returned stream is non-blocking; reads go through readiness plus
/// `try_read`, so a drained socket surfaces as `WouldBlock`.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let stream = TcpStream::connect((host, port))
        .await
        .with_context(|| format!("failed to connect to {host}:{port}"))?;

    if let Err(error) = stream.set_nodelay(true) {
        debug!(?error, "could not disable Nagle's algorithm");
    }

    info!(%host, port, "connected");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_a_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        let stream = connect("127.0.0.1", port).await.expect("connect");
        let (_, peer) = listener.accept().await.expect("accept");
        assert_eq!(stream.local_addr().expect("local addr"), peer);
    }

    #[tokio::test]
    async fn refused_connection_names_the_address() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let err = connect("127.0.0.1", port).await.expect_err("nothing listens");
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }
}
