//! Minimal HTTP/1.1 server the default batch is aimed at.
//!
//! Only the request line matters: `GET /` answers right away, `GET /sleep`
//! answers after a configurable delay, everything else is a 404. Every
//! connection gets its own task, so a slow `/sleep` never holds up the rest.

use crate::utils::error::Result;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const HELLO_PAGE: &str = include_str!("../../static/hello.html");
pub const NOT_FOUND_PAGE: &str = include_str!("../../static/404.html");

/// Most bytes read from a client before the request line and headers are cut off.
pub const MAX_HEAD_BYTES: u64 = 8 * 1024;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

const STATUS_OK: &str = "HTTP/1.1 200 OK";
const STATUS_NOT_FOUND: &str = "HTTP/1.1 404 NOT FOUND";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Hello,
    SlowHello,
    NotFound,
}

pub fn route(request_line: &str) -> Route {
    match request_line {
        "GET / HTTP/1.1" => Route::Hello,
        "GET /sleep HTTP/1.1" => Route::SlowHello,
        _ => Route::NotFound,
    }
}

pub fn render_response(status_line: &str, contents: &str) -> String {
    format!(
        "{}\r\nContent-Type: text/html; charset=UTF-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        contents.len(),
        contents
    )
}

#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    sleep: Duration,
    read_timeout: Duration,
}

/// Source of incoming connections for the accept loop.
#[async_trait]
trait Acceptor: Send {
    async fn next_connection(&mut self) -> std::io::Result<(TcpStream, SocketAddr)>;
}

#[async_trait]
impl Acceptor for TcpListener {
    async fn next_connection(&mut self) -> std::io::Result<(TcpStream, SocketAddr)> {
        self.accept().await
    }
}

pub struct TargetServer {
    listener: TcpListener,
    settings: ConnectionSettings,
}

impl TargetServer {
    pub async fn bind(addr: SocketAddr, sleep: Duration) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            settings: ConnectionSettings {
                sleep,
                read_timeout: DEFAULT_READ_TIMEOUT,
            },
        })
    }

    /// How long a client may take to send its request line and headers.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.settings.read_timeout = read_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    pub async fn serve(self) -> Result<()> {
        tracing::info!("Listening on http://{}", self.local_addr()?);
        accept_loop(self.listener, self.settings).await;
        Ok(())
    }
}

async fn accept_loop<A: Acceptor>(mut acceptor: A, settings: ConnectionSettings) {
    loop {
        let (stream, peer) = match acceptor.next_connection().await {
            Ok(connection) => connection,
            Err(e) => {
                // EMFILE、ECONNABORTED 等錯誤只影響這一次 accept
                tracing::warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, settings).await {
                tracing::warn!("Connection from {} failed: {}", peer, e);
            }
        });
    }
}

/// Reads the request line, then drains headers up to the blank line.
async fn read_head<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // 讀掉剩餘的標頭，避免關閉連線時客戶端收到 RST
    let mut header = String::new();
    loop {
        header.clear();
        let n = reader.read_line(&mut header).await?;
        if n == 0 || header.trim_end().is_empty() {
            break;
        }
    }

    Ok(request_line.trim_end().to_string())
}

async fn handle_connection(mut stream: TcpStream, settings: ConnectionSettings) -> Result<()> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half.take(MAX_HEAD_BYTES));

    let request_line = tokio::time::timeout(settings.read_timeout, read_head(&mut reader))
        .await
        .map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "timed out reading request head",
            )
        })??;

    let (status_line, contents) = match route(&request_line) {
        Route::Hello => (STATUS_OK, HELLO_PAGE),
        Route::SlowHello => {
            tokio::time::sleep(settings.sleep).await;
            (STATUS_OK, HELLO_PAGE)
        }
        Route::NotFound => (STATUS_NOT_FOUND, NOT_FOUND_PAGE),
    };

    tracing::info!(
        "{} -> {} (Content-Length: {})",
        request_line,
        status_line,
        contents.len()
    );

    let response = render_response(status_line, contents);
    write_half.write_all(response.as_bytes()).await?;
    write_half.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route() {
        assert_eq!(route("GET / HTTP/1.1"), Route::Hello);
        assert_eq!(route("GET /sleep HTTP/1.1"), Route::SlowHello);
        assert_eq!(route("GET /notfound HTTP/1.1"), Route::NotFound);
        assert_eq!(route("GET /temp HTTP/1.1"), Route::NotFound);
        assert_eq!(route("POST / HTTP/1.1"), Route::NotFound);
        assert_eq!(route(""), Route::NotFound);
    }

    #[test]
    fn test_render_response_content_length_matches_body() {
        let response = render_response(STATUS_OK, HELLO_PAGE);
        let (head, body) = response.split_once("\r\n\r\n").unwrap();

        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains(&format!("Content-Length: {}", HELLO_PAGE.len())));
        assert_eq!(body, HELLO_PAGE);
    }

    #[tokio::test]
    async fn test_serves_raw_request() {
        let server = TargetServer::bind("127.0.0.1:0".parse().unwrap(), Duration::ZERO)
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let handle = tokio::spawn(server.serve());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /missing HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with(STATUS_NOT_FOUND));
        assert!(response.ends_with(NOT_FOUND_PAGE));
        handle.abort();
    }

    /// Fails a few times before handing out real connections.
    struct FlakyAcceptor {
        failures: usize,
        listener: TcpListener,
    }

    #[async_trait]
    impl Acceptor for FlakyAcceptor {
        async fn next_connection(&mut self) -> std::io::Result<(TcpStream, SocketAddr)> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "connection aborted",
                ));
            }
            self.listener.next_connection().await
        }
    }

    #[tokio::test]
    async fn test_accept_errors_do_not_stop_the_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let acceptor = FlakyAcceptor {
            failures: 3,
            listener,
        };
        let settings = ConnectionSettings {
            sleep: Duration::ZERO,
            read_timeout: DEFAULT_READ_TIMEOUT,
        };
        let handle = tokio::spawn(accept_loop(acceptor, settings));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        tokio::time::timeout(
            Duration::from_secs(5),
            stream.read_to_string(&mut response),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(response.starts_with(STATUS_OK));
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_oversized_request_line_is_cut_off() {
        let server = TargetServer::bind("127.0.0.1:0".parse().unwrap(), Duration::ZERO)
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let handle = tokio::spawn(server.serve());

        // 沒有換行的請求行：讀滿上限後就當作 404 處理
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let garbage = vec![b'a'; MAX_HEAD_BYTES as usize];
        stream.write_all(&garbage).await.unwrap();

        let mut response = String::new();
        tokio::time::timeout(
            Duration::from_secs(5),
            stream.read_to_string(&mut response),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(response.starts_with(STATUS_NOT_FOUND));
        handle.abort();
    }

    #[tokio::test]
    async fn test_idle_client_is_dropped_after_read_timeout() {
        let server = TargetServer::bind("127.0.0.1:0".parse().unwrap(), Duration::ZERO)
            .await
            .unwrap()
            .with_read_timeout(Duration::from_millis(200));
        let addr = server.local_addr().unwrap();
        let handle = tokio::spawn(server.serve());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1").await.unwrap();

        let mut response = String::new();
        let read = tokio::time::timeout(
            Duration::from_secs(5),
            stream.read_to_string(&mut response),
        )
        .await
        .expect("idle connection was kept open");

        assert!(read.is_err() || response.is_empty());
        handle.abort();
    }
}
