#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use chainboard_signing_adapters::AdapterConfig;
use serde_json::Value;
use tiny_http::{Method, Response, Server, StatusCode};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Value,
}

pub type Calls = Arc<Mutex<Vec<Recorded>>>;

/// Serves `handler` on an ephemeral port until the test process exits.
pub fn spawn_mock_server<F>(handler: F) -> (String, Calls)
where
    F: Fn(&Method, &str, &Value) -> (u16, Value) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);

    thread::spawn(move || loop {
        let mut req = match server.recv() {
            Ok(r) => r,
            Err(_) => break,
        };
        let method = req.method().clone();
        let path = req.url().to_owned();
        let mut raw = String::new();
        let _ = req.as_reader().read_to_string(&mut raw);
        let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
        if let Ok(mut g) = recorded.lock() {
            g.push(Recorded {
                method: method.to_string(),
                path: path.clone(),
                body: body.clone(),
            });
        }

        let (code, payload) = handler(&method, &path, &body);
        let response =
            Response::from_string(payload.to_string()).with_status_code(StatusCode(code));
        let _ = req.respond(response);
    });

    (addr, calls)
}

pub fn config_for(rest_url: Option<String>, wallet_bridge_url: Option<String>) -> AdapterConfig {
    AdapterConfig {
        rest_url,
        wallet_bridge_url,
        http_timeout_ms: 5_000,
        broadcast_timeout_ms: 5_000,
        poll_interval_ms: 10,
        ..AdapterConfig::default()
    }
}
