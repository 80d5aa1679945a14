//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pool_bootstrap::jcli::{CommandOutput, CommandRunner, JcliError, JcliResult};
use pool_bootstrap::Settings;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const FAUCET_SK: &str = "ed25519e_sk1faucet";
pub const BLOCK0_HASH: &str = "adbdd5ede31637f6c9bad5c271eec0bc3d0cb9efb86a5b913bb55cba549d0770";

/// Settings pointing the workflows at `workdir`, with fees 1 + 2 + 3.
#[allow(dead_code)]
pub fn settings(workdir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.genesis.block0_hash = BLOCK0_HASH.to_string();
    settings.faucet.secret_key = FAUCET_SK.to_string();
    settings.fees.constant = 1;
    settings.fees.coefficient = 2;
    settings.fees.certificate = 3;
    settings.output.workdir = workdir.to_path_buf();
    settings
}

/// Scripted stand-in for the external client.
///
/// Records every invocation, answers each subcommand with plausible
/// output and touches the files the real client would.
#[derive(Default)]
pub struct FakeJcli {
    pub calls: Mutex<Vec<Vec<String>>>,
    /// Contents of secret files at the time they were handed over.
    pub secrets_seen: Mutex<Vec<String>>,
    /// Subcommand (e.g. "seal") that exits with the given status.
    pub fail_on: Option<(&'static str, i32)>,
    /// Raw stdout for `rest v0 message logs`.
    pub fragment_logs: Option<String>,
}

#[allow(dead_code)]
impl FakeJcli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(subcommand: &'static str, code: i32) -> Self {
        Self {
            fail_on: Some((subcommand, code)),
            ..Self::default()
        }
    }

    /// The first two words of each invocation.
    pub fn subcommands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|argv| argv.iter().take(2).cloned().collect::<Vec<_>>().join(" "))
            .collect()
    }

    pub fn find(&self, first: &str, second: &str) -> Option<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|argv| argv.len() >= 2 && argv[0] == first && argv[1] == second)
            .cloned()
    }

    fn staging_arg(args: &[String]) -> Option<PathBuf> {
        args.iter()
            .position(|a| a == "--staging")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
    }

    fn record_secret(&self, path: &str) {
        let contents = fs::read_to_string(path).unwrap_or_default();
        self.secrets_seen.lock().unwrap().push(contents);
    }
}

#[async_trait]
impl CommandRunner for FakeJcli {
    async fn run(
        &self,
        _program: &Path,
        args: &[String],
        stdin: Option<&str>,
    ) -> JcliResult<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        let words: Vec<&str> = args.iter().map(String::as_str).collect();
        if let Some((subcommand, code)) = self.fail_on {
            if words.iter().take(4).any(|w| *w == subcommand) {
                return Err(JcliError::Failed {
                    command: format!("jcli {}", words[..2].join(" ")),
                    code,
                    stderr: format!("{} failed", subcommand),
                });
            }
        }

        let stdout = match words.as_slice() {
            ["key", "generate", key_type] => {
                format!("{}_sk1generated", key_type.trim_start_matches("--type="))
            }
            ["key", "to-public"] => stdin.unwrap_or_default().trim().replace("_sk", "_pk"),
            ["address", "account", ..] => "ca1faucetaddress".to_string(),
            ["rest", "v0", "account", "get", ..] => {
                "---\ncounter: 5\ndelegation:\n  pools: []\nvalue: 1000\n".to_string()
            }
            ["rest", "v0", "message", "post", ..] => "fragment01".to_string(),
            ["rest", "v0", "message", "logs", ..] => self
                .fragment_logs
                .clone()
                .unwrap_or_else(|| "[]".to_string()),
            ["certificate", "new", ..] => "signedcert1registration".to_string(),
            ["certificate", "get-stake-pool-id", _] => "pool00ff".to_string(),
            ["transaction", "new", ..] => {
                if let Some(staging) = Self::staging_arg(args) {
                    fs::write(staging, "staged").unwrap();
                }
                String::new()
            }
            ["transaction", "data-for-witness", ..] => "txid00".to_string(),
            ["transaction", "make-witness", .., output, secret] => {
                self.record_secret(secret);
                fs::write(output, "witness").unwrap();
                String::new()
            }
            ["transaction", "auth", "--key", key, ..] => {
                self.record_secret(key);
                String::new()
            }
            ["transaction", "to-message", ..] => "0a0b0c".to_string(),
            ["transaction", ..] => String::new(),
            other => panic!("unexpected invocation: {:?}", other),
        };

        Ok(CommandOutput {
            stdout: format!("{}\n", stdout),
            stderr: String::new(),
        })
    }
}

/// A request received by the mock node.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// Start a mock node answering `"METHOD /path"` keys with `(status, body)`,
/// returning its address and the requests it saw.
#[allow(dead_code)]
pub async fn start_mock_node(
    routes: HashMap<String, (u16, String)>,
) -> (SocketAddr, Arc<Mutex<Vec<Recorded>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);

    let recorder = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let routes = routes.clone();
                    let recorder = recorder.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let key = format!("{} {}", request.method, request.path);
                        let (status, body) = routes
                            .get(&key)
                            .cloned()
                            .unwrap_or((404, "not found".to_string()));
                        recorder.lock().unwrap().push(request);

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<Recorded> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Recorded { method, path, body })
}
