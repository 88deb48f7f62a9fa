//! Shared utilities for integration testing.
//!
//! The mock target is a raw TCP server so tests control the exact status
//! line and headers and can inspect the bytes the forwarder sent.

#![allow(dead_code)]

use axum::{routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use rcgen::{Certificate, CertificateParams, SanType};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use request_forwarder::config::ForwardingConfig;
use request_forwarder::forward::Forwarder;

/// A request as received by the mock target.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Scripted answer of the mock target.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    hang: bool,
}

impl Reply {
    pub fn new(status: u16, reason: &str) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            hang: false,
        }
    }

    pub fn ok() -> Self {
        Self::new(200, "OK")
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    pub fn json(self, body: &str) -> Self {
        self.header("Content-Type", "application/json").body(body)
    }

    pub fn text(self, body: &str) -> Self {
        self.header("Content-Type", "text/plain").body(body)
    }

    /// Accept the request but never answer.
    pub fn hang() -> Self {
        Self {
            hang: true,
            ..Self::ok()
        }
    }
}

/// Handle to a running mock target.
pub struct MockTarget {
    pub addr: SocketAddr,
    pub requests: mpsc::UnboundedReceiver<CapturedRequest>,
    pub connections: Arc<AtomicUsize>,
}

impl MockTarget {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Next captured request, failing the test if none arrives.
    pub async fn next_request(&mut self) -> CapturedRequest {
        tokio::time::timeout(Duration::from_secs(5), self.requests.recv())
            .await
            .expect("target saw no request")
            .expect("target stopped")
    }
}

/// Start a mock target that answers every request with `respond(request)`.
pub async fn start_target<F>(respond: F) -> MockTarget
where
    F: Fn(&CapturedRequest) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let tx = tx.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let _ = serve_connection(socket, tx, respond.as_ref()).await;
            });
        }
    });

    MockTarget {
        addr,
        requests: rx,
        connections,
    }
}

async fn serve_connection<F>(
    mut socket: TcpStream,
    tx: mpsc::UnboundedSender<CapturedRequest>,
    respond: &F,
) -> std::io::Result<()>
where
    F: Fn(&CapturedRequest) -> Reply,
{
    let Some(request) = read_request(&mut socket).await? else {
        return Ok(());
    };
    let reply = respond(&request);
    let _ = tx.send(request);

    if reply.hang {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        return Ok(());
    }

    let mut head = format!("HTTP/1.1 {} {}\r\n", reply.status, reply.reason);
    for (name, value) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        reply.body.len()
    ));

    socket.write_all(head.as_bytes()).await?;
    socket.write_all(&reply.body).await?;
    socket.shutdown().await
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<Option<CapturedRequest>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split(' ');
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Ok(Some(CapturedRequest {
        method,
        path,
        headers,
        body,
    }))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Self-signed certificate and key for `localhost` and `127.0.0.1`, as PEM.
pub fn self_signed_pem() -> (Vec<u8>, Vec<u8>) {
    let mut params = CertificateParams::new(vec!["localhost".to_string()]);
    params
        .subject_alt_names
        .push(SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    let cert = Certificate::from_params(params).unwrap();

    let cert_pem = cert.serialize_pem().unwrap().into_bytes();
    let key_pem = cert.serialize_private_key_pem().into_bytes();
    (cert_pem, key_pem)
}

/// HTTPS target behind a self-signed certificate. `GET /` answers
/// `secure hello`.
pub async fn start_tls_target() -> SocketAddr {
    let (cert_pem, key_pem) = self_signed_pem();
    let tls = RustlsConfig::from_pem(cert_pem, key_pem).await.unwrap();
    let app = Router::new().route("/", get(|| async { "secure hello" }));

    let handle = axum_server::Handle::new();
    let server = axum_server::bind_rustls(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)), tls)
        .handle(handle.clone());
    tokio::spawn(async move {
        let _ = server.serve(app.into_make_service()).await;
    });

    handle.listening().await.expect("TLS target failed to bind")
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Forwarding settings that never route through a system proxy.
pub fn forwarding_config() -> ForwardingConfig {
    ForwardingConfig {
        system_proxy: false,
        ..ForwardingConfig::default()
    }
}

pub fn forwarder() -> Forwarder {
    Forwarder::new(&forwarding_config()).unwrap()
}
