//! A listener that reads each HTTP request and closes the connection
//! without writing a response.
//!
//! Every physical request attempt is recorded, so a test can check how
//! many times a client (or anything beneath it) actually hit a route.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

type Attempts = Arc<Mutex<Vec<Attempt>>>;

/// One request line received before hanging up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub method: String,
    /// Request target as sent, query string included.
    pub target: String,
}

impl Attempt {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or(&self.target)
    }
}

pub struct FaultServer {
    addr: SocketAddr,
    attempts: Attempts,
    task: JoinHandle<()>,
}

impl FaultServer {
    /// Bind to an ephemeral port on loopback and start hanging up on
    /// every connection. Must be called from within a tokio runtime.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let attempts = Attempts::default();
        let task = tokio::spawn(accept_loop(listener, Arc::clone(&attempts)));
        Ok(Self {
            addr,
            attempts,
            task,
        })
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of attempts whose path (query ignored) equals `path`.
    pub fn attempts_for(&self, path: &str) -> usize {
        self.attempts().iter().filter(|a| a.path() == path).count()
    }
}

impl Drop for FaultServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn accept_loop(listener: TcpListener, attempts: Attempts) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::debug!(%peer, "fault server accepted connection");
                tokio::spawn(hang_up(stream, Arc::clone(&attempts)));
            }
            Err(e) => tracing::warn!(error = %e, "fault server accept failed"),
        }
    }
}

/// Read the request head, record it, then drop the socket.
async fn hang_up(stream: TcpStream, attempts: Attempts) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    match reader.read_line(&mut request_line).await {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    let mut header = String::new();
    loop {
        header.clear();
        match reader.read_line(&mut header).await {
            Ok(0) | Err(_) => break,
            Ok(_) if header.trim_end().is_empty() => break,
            Ok(_) => {}
        }
    }

    let mut parts = request_line.split_whitespace();
    let attempt = Attempt {
        method: parts.next().unwrap_or_default().to_string(),
        target: parts.next().unwrap_or_default().to_string(),
    };
    tracing::debug!(
        method = %attempt.method,
        target = %attempt.target,
        "closing connection without a response"
    );
    attempts
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(attempt);
}
