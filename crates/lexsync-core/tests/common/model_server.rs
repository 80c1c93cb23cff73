//! Minimal HTTP/1.1 server for refresh tests.
//!
//! Serves a single model body. HEAD answers with `Last-Modified`/`ETag`
//! when configured; GET answers with the body or a configured error status.
//! Method hit counters let tests assert that conditional refreshes skip
//! body retrievals.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub struct ServerState {
    pub body: Vec<u8>,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    /// Status for GET responses; non-200 serves `error_body` as the message.
    pub get_status: u32,
    pub error_body: Vec<u8>,
    /// Artificial delay before answering, to hold a refresh cycle open.
    pub delay: Duration,
}

pub struct ModelServer {
    pub url: String,
    state: Arc<Mutex<ServerState>>,
    head_hits: Arc<AtomicU32>,
    get_hits: Arc<AtomicU32>,
}

impl ModelServer {
    pub fn head_hits(&self) -> u32 {
        self.head_hits.load(Ordering::SeqCst)
    }

    pub fn get_hits(&self) -> u32 {
        self.get_hits.load(Ordering::SeqCst)
    }

    pub fn set_body(&self, body: Vec<u8>) {
        self.state.lock().unwrap().body = body;
    }

    pub fn set_metadata(&self, last_modified: Option<&str>, etag: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state.last_modified = last_modified.map(str::to_string);
        state.etag = etag.map(str::to_string);
    }

    pub fn set_get_status(&self, status: u32, error_body: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.get_status = status;
        state.error_body = error_body.to_vec();
    }

    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = delay;
    }
}

/// Starts a server in a background thread serving `body` with the given
/// freshness metadata. The server runs until the process exits.
pub fn start(body: Vec<u8>, last_modified: Option<&str>, etag: Option<&str>) -> ModelServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(ServerState {
        body,
        last_modified: last_modified.map(str::to_string),
        etag: etag.map(str::to_string),
        get_status: 200,
        error_body: Vec::new(),
        delay: Duration::ZERO,
    }));
    let head_hits = Arc::new(AtomicU32::new(0));
    let get_hits = Arc::new(AtomicU32::new(0));

    {
        let state = Arc::clone(&state);
        let head_hits = Arc::clone(&head_hits);
        let get_hits = Arc::clone(&get_hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&state);
                let head_hits = Arc::clone(&head_hits);
                let get_hits = Arc::clone(&get_hits);
                thread::spawn(move || handle(stream, &state, &head_hits, &get_hits));
            }
        });
    }

    ModelServer {
        url: format!("http://127.0.0.1:{}/model.bin", port),
        state,
        head_hits,
        get_hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    state: &Mutex<ServerState>,
    head_hits: &AtomicU32,
    get_hits: &AtomicU32,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let method = request.split_whitespace().next().unwrap_or("");

    let (body, last_modified, etag, get_status, error_body, delay) = {
        let s = state.lock().unwrap();
        (
            s.body.clone(),
            s.last_modified.clone(),
            s.etag.clone(),
            s.get_status,
            s.error_body.clone(),
            s.delay,
        )
    };
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let mut freshness = String::new();
    if let Some(lm) = &last_modified {
        freshness.push_str(&format!("Last-Modified: {}\r\n", lm));
    }
    if let Some(tag) = &etag {
        freshness.push_str(&format!("ETag: \"{}\"\r\n", tag));
    }

    if method.eq_ignore_ascii_case("HEAD") {
        head_hits.fetch_add(1, Ordering::SeqCst);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n",
            body.len(),
            freshness
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        get_hits.fetch_add(1, Ordering::SeqCst);
        if get_status != 200 {
            let response = format!(
                "HTTP/1.1 {} Error\r\nContent-Length: {}\r\n\r\n",
                get_status,
                error_body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(&error_body);
            return;
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n",
            body.len(),
            freshness
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(&body);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
}
