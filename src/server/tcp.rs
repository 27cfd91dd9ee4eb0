//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y atiende cada una en su propio thread: lee un request
//! completo (respetando `Content-Length`), lo enruta, escribe la respuesta
//! y cierra.

use crate::config::Config;
use crate::http::request::{content_length, find_header_end};
use crate::http::{Method, Request, Response, StatusCode};
use crate::jobs::{handlers as job_handlers, JobManager};
use crate::metrics::MetricsCollector;
use crate::router::{Router, UNMATCHED_ROUTE};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tamaño máximo de headers
const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Tamaño máximo de body (1 MiB)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Tiempo máximo esperando datos del cliente
const READ_TIMEOUT: Duration = Duration::from_secs(10);

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Resultado de leer un request del socket
enum RawRequest {
    /// El cliente cerró sin enviar nada
    Empty,
    /// Headers o body por encima del límite
    TooLarge,
    Complete(Vec<u8>),
}

/// Campos del request que se registran en el log
struct RequestSummary {
    method: &'static str,
    path: String,
    version: String,
    user_agent: String,
}

impl Default for RequestSummary {
    fn default() -> Self {
        Self {
            method: "-",
            path: "-".to_string(),
            version: "-".to_string(),
            user_agent: "-".to_string(),
        }
    }
}

impl From<&Request> for RequestSummary {
    fn from(request: &Request) -> Self {
        Self {
            method: request.method().as_str(),
            path: request.path().to_string(),
            version: request.version().to_string(),
            user_agent: request.header("user-agent").unwrap_or("-").to_string(),
        }
    }
}

/// Servidor HTTP/1.0 de la cola de jobs
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    metrics: MetricsCollector,
}

impl Server {
    /// Hace bind en la dirección configurada
    pub fn bind(config: &Config, job_manager: Arc<JobManager>) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address())?;
        Ok(Self::with_listener(listener, job_manager))
    }

    /// Crea el servidor sobre un listener ya abierto (ej: puerto 0 en tests)
    pub fn with_listener(listener: TcpListener, job_manager: Arc<JobManager>) -> Self {
        let metrics = MetricsCollector::new();
        let router = Self::build_router(job_manager, metrics.clone());

        Self {
            listener,
            router: Arc::new(router),
            metrics,
        }
    }

    /// Registra los endpoints de la cola y de observabilidad
    fn build_router(job_manager: Arc<JobManager>, metrics: MetricsCollector) -> Router {
        let mut router = Router::new();

        let manager = Arc::clone(&job_manager);
        router.register(Method::POST, "/enqueue", move |req: &Request| {
            job_handlers::enqueue_handler(req, &manager)
        });

        let manager = Arc::clone(&job_manager);
        router.register(Method::GET, "/result", move |req: &Request| {
            job_handlers::result_handler(req, &manager)
        });

        let manager = job_manager;
        router.register(Method::GET, "/stats", move |req: &Request| {
            job_handlers::stats_handler(req, &manager)
        });

        router.register(Method::GET, "/metrics", move |_req: &Request| {
            Response::json(&metrics.snapshot())
        });

        router
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept; cada conexión en su propio thread
    ///
    /// Sólo retorna si el listener falla.
    pub fn run(self) -> io::Result<()> {
        tracing::info!(address = %self.local_addr()?, "job queue listening");

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            let router = Arc::clone(&self.router);
            let metrics = self.metrics.clone();
            metrics.connection_opened();

            thread::spawn(move || {
                if let Err(e) = handle_connection(stream, &router, &metrics) {
                    tracing::warn!(error = %e, "connection error");
                }
                metrics.connection_closed();
            });
        }

        Ok(())
    }

    /// Ejecuta `run` en un thread aparte y retorna la dirección de escucha
    pub fn spawn(self) -> io::Result<SocketAddr> {
        let addr = self.local_addr()?;
        thread::Builder::new()
            .name("http-accept".to_string())
            .spawn(move || {
                if let Err(e) = self.run() {
                    tracing::error!(error = %e, "accept loop terminated");
                }
            })?;
        Ok(addr)
    }
}

/// Atiende un único request en la conexión
fn handle_connection(
    mut stream: TcpStream,
    router: &Router,
    metrics: &MetricsCollector,
) -> io::Result<()> {
    let start = Instant::now();
    let request_id = format!("{:016x}", NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed));

    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let (mut response, route, summary) = match read_request(&mut stream)? {
        RawRequest::Empty => {
            tracing::trace!(request_id = %request_id, "connection closed without data");
            return Ok(());
        }
        RawRequest::TooLarge => (
            Response::error(StatusCode::PayloadTooLarge, "request too large"),
            UNMATCHED_ROUTE.to_string(),
            RequestSummary::default(),
        ),
        RawRequest::Complete(bytes) => match Request::parse(&bytes) {
            Ok(request) => {
                let (response, route) = router.route(&request);
                (response, route.to_string(), RequestSummary::from(&request))
            }
            Err(e) => {
                tracing::debug!(request_id = %request_id, error = %e, "parse error");
                (
                    Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)),
                    UNMATCHED_ROUTE.to_string(),
                    RequestSummary::default(),
                )
            }
        },
    };

    response.add_header("Server", "job-queue/0.1");
    response.add_header("Connection", "close");
    response.add_header("X-Request-Id", &request_id);

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;

    let latency = start.elapsed();
    let status = response.status();
    metrics.record_request(&route, status.as_u16(), latency);

    tracing::info!(
        request_id = %request_id,
        method = summary.method,
        path = %summary.path,
        version = %summary.version,
        user_agent = %summary.user_agent,
        status = status.as_u16(),
        latency_ms = latency.as_secs_f64() * 1000.0,
        "request handled"
    );

    Ok(())
}

/// Lee headers y, si hay `Content-Length`, el body completo
fn read_request(stream: &mut TcpStream) -> io::Result<RawRequest> {
    let mut buffer = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];

    // 1. Headers
    let header_end = loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            if buffer.is_empty() {
                return Ok(RawRequest::Empty);
            }
            // El cliente cerró a mitad: que el parser decida
            return Ok(RawRequest::Complete(buffer));
        }
        buffer.extend_from_slice(&chunk[..n]);

        if let Some(end) = find_header_end(&buffer) {
            break end;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Ok(RawRequest::TooLarge);
        }
    };

    // 2. Body
    let body_len = match content_length(&buffer[..header_end]) {
        Some(len) => len,
        // HTTP/1.0 sin Content-Length: el body termina cuando el cliente cierra
        None if carries_body(&buffer) => return read_until_eof(stream, buffer, header_end),
        None => 0,
    };
    if body_len > MAX_BODY_BYTES {
        return Ok(RawRequest::TooLarge);
    }

    let total = header_end + 4 + body_len;
    while buffer.len() < total {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    Ok(RawRequest::Complete(buffer))
}

/// Métodos cuyo request puede traer body
fn carries_body(buffer: &[u8]) -> bool {
    buffer.starts_with(b"POST ") || buffer.starts_with(b"PUT ")
}

/// Lee el body hasta EOF, con el mismo límite de tamaño
fn read_until_eof(
    stream: &mut TcpStream,
    mut buffer: Vec<u8>,
    header_end: usize,
) -> io::Result<RawRequest> {
    let limit = header_end + 4 + MAX_BODY_BYTES;
    let mut chunk = [0u8; 8192];

    loop {
        if buffer.len() > limit {
            return Ok(RawRequest::TooLarge);
        }
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Ok(RawRequest::Complete(buffer));
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobManagerConfig;
    use std::net::Shutdown;

    fn test_router() -> Router {
        let manager = Arc::new(JobManager::new(JobManagerConfig::default()).unwrap());
        Server::build_router(manager, MetricsCollector::new())
    }

    /// Envía `raw` por una conexión real y retorna la respuesta como texto
    fn roundtrip(raw: &[u8]) -> (String, MetricsCollector) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = test_router();
        let metrics = MetricsCollector::new();

        let server = {
            let metrics = metrics.clone();
            thread::spawn(move || {
                let (stream, _) = listener.accept().unwrap();
                handle_connection(stream, &router, &metrics).unwrap();
            })
        };

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        server.join().unwrap();

        (String::from_utf8_lossy(&buf).into_owned(), metrics)
    }

    #[test]
    fn test_enqueue_over_socket() {
        let body = r#"{"Data":"hello"}"#;
        let raw = format!(
            "POST /enqueue HTTP/1.0\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let (text, metrics) = roundtrip(raw.as_bytes());

        assert!(text.starts_with("HTTP/1.0 200 OK"));
        assert!(text.contains("X-Request-Id:"));
        assert!(text.contains("Connection: close"));
        assert!(text.ends_with(r#"{"id":1,"data":"hello"}"#));
        assert_eq!(metrics.snapshot().requests_per_path["/enqueue"], 1);
    }

    #[test]
    fn test_result_not_ready_over_socket() {
        let (text, _) = roundtrip(b"GET /result?id=5 HTTP/1.0\r\n\r\n");
        assert!(text.starts_with("HTTP/1.0 202 Accepted"));
        assert!(text.contains("not ready"));
    }

    #[test]
    fn test_unknown_route() {
        let (text, _) = roundtrip(b"GET /nope HTTP/1.0\r\n\r\n");
        assert!(text.contains("404 Not Found"));
    }

    #[test]
    fn test_parse_error() {
        let (text, metrics) = roundtrip(b"\x00\x01\x02\x03garbage");
        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid:"));
        assert_eq!(metrics.snapshot().status_codes[&400], 1);
    }

    #[test]
    fn test_body_too_large() {
        let raw = format!(
            "POST /enqueue HTTP/1.0\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let (text, _) = roundtrip(raw.as_bytes());
        assert!(text.contains("413 Payload Too Large"));
    }

    #[test]
    fn test_peer_closed_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = test_router();
        let metrics = MetricsCollector::new();

        let server = {
            let metrics = metrics.clone();
            thread::spawn(move || {
                let (stream, _) = listener.accept().unwrap();
                handle_connection(stream, &router, &metrics).unwrap();
            })
        };

        drop(TcpStream::connect(addr).unwrap());
        server.join().unwrap();

        assert_eq!(metrics.snapshot().total_requests, 0);
    }

    #[test]
    fn test_body_split_across_writes() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = test_router();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &router, &MetricsCollector::new()).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client
            .write_all(b"POST /enqueue HTTP/1.0\r\nContent-Length: 14\r\n\r\n")
            .unwrap();
        client.flush().unwrap();
        thread::sleep(Duration::from_millis(50));
        client.write_all(br#"{"Data":"ab"}"#).unwrap();
        client.write_all(b" ").unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        server.join().unwrap();

        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.0 200 OK"), "got: {}", text);
        assert!(text.contains(r#""data":"ab""#));
    }

    #[test]
    fn test_unknown_paths_share_one_metrics_key() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = test_router();
        let metrics = MetricsCollector::new();
        let total = 300;

        let server = {
            let metrics = metrics.clone();
            thread::spawn(move || {
                for _ in 0..total {
                    let (stream, _) = listener.accept().unwrap();
                    handle_connection(stream, &router, &metrics).unwrap();
                }
            })
        };

        for i in 0..total {
            let mut client = TcpStream::connect(addr).unwrap();
            client
                .write_all(format!("GET /junk-{} HTTP/1.0\r\n\r\n", i).as_bytes())
                .unwrap();
            let mut buf = Vec::new();
            client.read_to_end(&mut buf).unwrap();
        }
        server.join().unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, total as u64);
        assert_eq!(snapshot.requests_per_path.len(), 1);
        assert_eq!(snapshot.requests_per_path[UNMATCHED_ROUTE], total as u64);
    }

    #[test]
    fn test_invalid_requests_use_unmatched_key() {
        let (_, metrics) = roundtrip(b"\x00\x01\x02\x03garbage");
        let snapshot = metrics.snapshot();
        let keys: Vec<&str> = snapshot.requests_per_path.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![UNMATCHED_ROUTE]);
    }

    #[test]
    fn test_post_without_content_length_reads_until_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = test_router();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &router, &MetricsCollector::new()).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"POST /enqueue HTTP/1.0\r\n\r\n").unwrap();
        client.flush().unwrap();
        thread::sleep(Duration::from_millis(50));
        client.write_all(br#"{"Data":"late"}"#).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        server.join().unwrap();

        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.0 200 OK"), "got: {}", text);
        assert!(text.contains(r#""data":"late""#));
    }
}
