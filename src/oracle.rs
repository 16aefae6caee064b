//! Translation oracle boundary.
//!
//! The pipeline only sees [`TranslationOracle`]: one request in, one
//! [`TranslationOutcome`] out. [`CommandOracle`] is the production
//! implementation, running an external CLI per request with a bounded wait.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use thiserror::Error;

use crate::pipeline::TranslationRequest;
use crate::textutil::unwrap_oracle_output;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    pub model: String,
    pub system_prompt: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslationOutcome {
    Success(String),
    Failure(OracleFailure),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OracleFailure {
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
    #[error("empty or null output")]
    EmptyOrNullOutput,
    #[error("invocation error: {0}")]
    InvocationError(String),
}

pub trait TranslationOracle: Sync {
    fn translate(&self, request: &TranslationRequest, model: &ModelConfig) -> TranslationOutcome;
}

/// Runs `<program> [args..] -p --model <model> --append-system-prompt <prompt>`
/// with the rendered request on stdin and the translation on stdout.
#[derive(Clone, Debug)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Leading arguments placed before the oracle flags.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn probe(&self) -> anyhow::Result<String> {
        let out = Command::new(&self.program)
            .args(&self.args)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("{} command not found", self.program))?;
        if !out.status.success() {
            return Err(anyhow!(
                "{} --version exited with {}",
                self.program,
                out.status
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    fn invoke(&self, message: String, model: &ModelConfig) -> TranslationOutcome {
        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .arg("-p")
            .arg("--model")
            .arg(&model.model)
            .arg("--append-system-prompt")
            .arg(&model.system_prompt)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => {
                return TranslationOutcome::Failure(OracleFailure::InvocationError(format!(
                    "spawn {}: {e}",
                    self.program
                )))
            }
        };

        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || {
                // The child may exit without reading everything; a broken pipe is not our failure.
                let _ = stdin.write_all(message.as_bytes());
            })
        });
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match wait_with_timeout(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                return TranslationOutcome::Failure(OracleFailure::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
            Err(e) => {
                return TranslationOutcome::Failure(OracleFailure::InvocationError(format!(
                    "wait {}: {e}",
                    self.program
                )))
            }
        };

        if let Some(w) = writer {
            let _ = w.join();
        }
        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);

        if !status.success() {
            return TranslationOutcome::Failure(OracleFailure::NonZeroExit {
                code: status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }
        match unwrap_oracle_output(&stdout) {
            Some(text) => TranslationOutcome::Success(text),
            None => TranslationOutcome::Failure(OracleFailure::EmptyOrNullOutput),
        }
    }
}

impl TranslationOracle for CommandOracle {
    fn translate(&self, request: &TranslationRequest, model: &ModelConfig) -> TranslationOutcome {
        match request.to_message() {
            Ok(message) => self.invoke(message, model),
            Err(e) => TranslationOutcome::Failure(OracleFailure::InvocationError(format!("{e:#}"))),
        }
    }
}

fn spawn_reader(mut pipe: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// `Ok(None)` means the timeout elapsed and the child was killed.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
