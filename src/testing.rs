//! Helpers shared by the in-module tests.

use crate::app::build_router;
use crate::config::Config;
use crate::state::AppState;
use crate::store::StoreClient;
use axum::{Router, body::Body, http::Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

fn config_for(host: &str, port: u16) -> Config {
    Config {
        redis_host: host.to_string(),
        redis_port: port,
        redis_password: String::new(),
        redis_connect_timeout: Duration::from_millis(500),
        redis_heartbeat: None,
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
    }
}

/// Points at a local port nothing listens on
pub fn unreachable_config() -> Config {
    config_for("127.0.0.1", 1)
}

/// A local port that was free a moment ago and is now closed
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

pub fn setup_test_app(config: Config) -> (Router, StoreClient) {
    let store = StoreClient::from_config(&config).expect("Failed to create store client");
    let state = AppState {
        store: store.clone(),
        config: Arc::new(config),
    };
    (build_router(state), store)
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

type Data = Arc<Mutex<HashMap<String, String>>>;
type CommandLog = Arc<Mutex<Vec<Vec<String>>>>;

/// In-memory RESP server answering PING, SET, GET and INCR
///
/// Every received command is recorded. The listener stops when the handle is
/// dropped.
pub struct FakeRedis {
    port: u16,
    commands: CommandLog,
    accept_task: JoinHandle<()>,
}

impl FakeRedis {
    pub async fn start() -> Self {
        Self::start_on(0).await
    }

    pub async fn start_on(port: u16) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind fake Redis");
        let port = listener.local_addr().expect("local addr").port();

        let data: Data = Arc::default();
        let commands: CommandLog = Arc::default();
        let accept_task = tokio::spawn(accept_loop(listener, data, Arc::clone(&commands)));

        Self {
            port,
            commands,
            accept_task,
        }
    }

    pub fn config(&self) -> Config {
        config_for("127.0.0.1", self.port)
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }
}

impl Drop for FakeRedis {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn accept_loop(listener: TcpListener, data: Data, commands: CommandLog) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(serve_connection(stream, Arc::clone(&data), Arc::clone(&commands)));
    }
}

async fn serve_connection(stream: TcpStream, data: Data, commands: CommandLog) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    while let Ok(Some(parts)) = read_command(&mut reader).await {
        let reply = respond(&parts, &data);
        commands.lock().unwrap().push(parts);
        if writer.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
    }
}

fn protocol_error(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

/// Reads one `*N` array of bulk strings; `None` on a clean EOF.
async fn read_command<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<Option<Vec<String>>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let count: usize = line
        .trim_end()
        .strip_prefix('*')
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| protocol_error("expected array header"))?;

    let mut parts = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await?;
        let len: usize = line
            .trim_end()
            .strip_prefix('$')
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| protocol_error("expected bulk string header"))?;

        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await?;
        buf.truncate(len);
        parts.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(Some(parts))
}

fn respond(parts: &[String], data: &Data) -> String {
    let Some(name) = parts.first() else {
        return "-ERR empty command\r\n".to_string();
    };
    let mut data = data.lock().unwrap();

    match (name.to_ascii_uppercase().as_str(), parts.len()) {
        ("PING", 1) => "+PONG\r\n".to_string(),
        ("SET", 3) => {
            data.insert(parts[1].clone(), parts[2].clone());
            "+OK\r\n".to_string()
        }
        ("GET", 2) => match data.get(&parts[1]) {
            Some(value) => format!("${}\r\n{}\r\n", value.len(), value),
            None => "$-1\r\n".to_string(),
        },
        ("INCR", 2) => {
            let current = data.get(&parts[1]).map(|v| v.parse::<i64>()).unwrap_or(Ok(0));
            match current {
                Ok(n) => {
                    data.insert(parts[1].clone(), (n + 1).to_string());
                    format!(":{}\r\n", n + 1)
                }
                Err(_) => "-ERR value is not an integer or out of range\r\n".to_string(),
            }
        }
        // Connection setup chatter from the client library
        ("CLIENT", _) | ("SELECT", _) => "+OK\r\n".to_string(),
        (other, _) => format!("-ERR unknown command '{}'\r\n", other),
    }
}
