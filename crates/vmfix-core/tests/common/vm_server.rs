//! Minimal HTTP/1.1 server imitating the VictoriaMetrics endpoints the client uses.
//!
//! Keeps series in memory. Imports and deletes become visible to reads only
//! after `visibility_lag` read requests, to exercise the polling loops.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone)]
struct Stored {
    labels: Labels,
    values: Vec<serde_json::Value>,
    timestamps: Vec<i64>,
}

enum PendingWrite {
    Import(Vec<Stored>),
    Delete(Vec<String>),
}

#[derive(Default)]
struct State {
    visible: Vec<Stored>,
    /// (reads remaining before it applies, write)
    pending: Vec<(u32, PendingWrite)>,
    requests: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VmServerOptions {
    /// Number of reads after a write before it shows up (0 = immediately).
    pub visibility_lag: u32,
    /// Expected `Authorization` header value; requests without it get 401.
    pub required_auth: Option<String>,
}

#[derive(Clone)]
pub struct VmServer {
    pub url: String,
    state: Arc<Mutex<State>>,
}

impl VmServer {
    /// Request lines seen so far, e.g. `GET /prometheus/api/v1/series?...`.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of visible series.
    pub fn visible_series(&self) -> usize {
        self.state.lock().unwrap().visible.len()
    }
}

pub fn start(opts: VmServerOptions) -> VmServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(State::default()));
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &state, &opts));
        }
    });
    VmServer {
        url: format!("http://127.0.0.1:{}", port),
        state,
    }
}

struct Request {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    auth: Option<String>,
    body: Vec<u8>,
    line: String,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let line = lines.next()?.to_string();
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut content_length = 0usize;
    let mut auth = None;
    for l in lines {
        if let Some((name, value)) = l.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            if name.eq_ignore_ascii_case("authorization") {
                auth = Some(value.trim().to_string());
            }
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (
            p.to_string(),
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect(),
        ),
        None => (target.clone(), Vec::new()),
    };
    Some(Request {
        method,
        path,
        query,
        auth,
        body,
        line,
    })
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn handle(mut stream: TcpStream, state: &Mutex<State>, opts: &VmServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let mut st = state.lock().unwrap();
    st.requests.push(req.line.clone());

    if let Some(expected) = &opts.required_auth {
        if req.auth.as_deref() != Some(expected.as_str()) {
            respond(&mut stream, "401 Unauthorized", "Unauthorized");
            return;
        }
    }

    let matches: Vec<String> = req
        .query
        .iter()
        .filter(|(k, _)| k == "match[]")
        .map(|(_, v)| v.clone())
        .collect();

    match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/v1/import") => {
            let text = String::from_utf8_lossy(&req.body);
            let mut parsed = Vec::new();
            for l in text.lines().filter(|l| !l.trim().is_empty()) {
                match parse_line(l) {
                    Some(s) => parsed.push(s),
                    None => {
                        respond(&mut stream, "400 Bad Request", "cannot parse line");
                        return;
                    }
                }
            }
            let lag = opts.visibility_lag;
            schedule(&mut st, lag, PendingWrite::Import(parsed));
            respond(&mut stream, "204 No Content", "");
        }
        ("POST", "/api/v1/admin/tsdb/delete_series") => {
            if matches.is_empty() {
                respond(&mut stream, "400 Bad Request", "missing match[]");
                return;
            }
            let lag = opts.visibility_lag;
            schedule(&mut st, lag, PendingWrite::Delete(matches));
            respond(&mut stream, "204 No Content", "");
        }
        ("GET", "/prometheus/api/v1/series") => {
            advance(&mut st);
            let data: Vec<&Labels> = st
                .visible
                .iter()
                .filter(|s| matches.iter().any(|m| selector_matches(m, &s.labels)))
                .map(|s| &s.labels)
                .collect();
            let body = serde_json::json!({ "status": "success", "data": data });
            respond(&mut stream, "200 OK", &body.to_string());
        }
        ("GET", "/prometheus/api/v1/query_range") => {
            advance(&mut st);
            let query = req
                .query
                .iter()
                .find(|(k, _)| k == "query")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            let result: Vec<serde_json::Value> = st
                .visible
                .iter()
                .filter(|s| selector_matches(&query, &s.labels))
                .map(|s| {
                    let values: Vec<serde_json::Value> = s
                        .timestamps
                        .iter()
                        .zip(&s.values)
                        .map(|(t, v)| serde_json::json!([*t as f64 / 1000.0, v.to_string()]))
                        .collect();
                    serde_json::json!({ "metric": s.labels, "values": values })
                })
                .collect();
            let body = serde_json::json!({
                "status": "success",
                "data": { "resultType": "matrix", "result": result }
            });
            respond(&mut stream, "200 OK", &body.to_string());
        }
        ("GET", "/api/v1/export") => {
            advance(&mut st);
            let mut body = String::new();
            for s in st
                .visible
                .iter()
                .filter(|s| matches.iter().any(|m| selector_matches(m, &s.labels)))
            {
                let line = serde_json::json!({
                    "metric": s.labels,
                    "values": s.values,
                    "timestamps": s.timestamps,
                });
                body.push_str(&line.to_string());
                body.push('\n');
            }
            respond(&mut stream, "200 OK", &body);
        }
        _ => respond(&mut stream, "404 Not Found", "not found"),
    }
}

fn parse_line(line: &str) -> Option<Stored> {
    let v: serde_json::Value = serde_json::from_str(line).ok()?;
    let labels: Labels = serde_json::from_value(v.get("metric")?.clone()).ok()?;
    let values = v.get("values")?.as_array()?.clone();
    let timestamps = v
        .get("timestamps")?
        .as_array()?
        .iter()
        .map(|t| t.as_i64())
        .collect::<Option<Vec<_>>>()?;
    if values.len() != timestamps.len() || !labels.contains_key("__name__") {
        return None;
    }
    Some(Stored {
        labels,
        values,
        timestamps,
    })
}

fn schedule(st: &mut State, lag: u32, write: PendingWrite) {
    if lag == 0 {
        apply(st, write);
    } else {
        st.pending.push((lag, write));
    }
}

/// Count one read against every pending write and apply the ones now due.
fn advance(st: &mut State) {
    let mut due = Vec::new();
    let mut still = Vec::new();
    for (remaining, write) in st.pending.drain(..) {
        if remaining <= 1 {
            due.push(write);
        } else {
            still.push((remaining - 1, write));
        }
    }
    st.pending = still;
    for write in due {
        apply(st, write);
    }
}

fn apply(st: &mut State, write: PendingWrite) {
    match write {
        PendingWrite::Import(series) => {
            for s in series {
                // Same label set: samples are appended to the existing series.
                if let Some(existing) = st.visible.iter_mut().find(|e| e.labels == s.labels) {
                    existing.values.extend(s.values);
                    existing.timestamps.extend(s.timestamps);
                } else {
                    st.visible.push(s);
                }
            }
        }
        PendingWrite::Delete(selectors) => st
            .visible
            .retain(|s| !selectors.iter().any(|m| selector_matches(m, &s.labels))),
    }
}

/// Match `name{k="v", ...}` with exact label equality only.
fn selector_matches(selector: &str, labels: &Labels) -> bool {
    let selector = selector.trim();
    let (name, rest) = match selector.split_once('{') {
        Some((n, r)) => (n.trim(), r.trim_end_matches('}')),
        None => (selector, ""),
    };
    if !name.is_empty() && labels.get("__name__").map(String::as_str) != Some(name) {
        return false;
    }
    rest.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .all(|pair| match pair.split_once('=') {
            Some((k, v)) => labels.get(k.trim()).map(String::as_str) == Some(v.trim().trim_matches('"')),
            None => false,
        })
}
