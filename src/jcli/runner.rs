//! Spawning the external client.
//!
//! # Responsibilities
//! - Start one child process per invocation, feeding optional stdin
//! - Capture stdout/stderr and map the exit status to an error
//!
//! # Design Decisions
//! - No timeout: a hung invocation blocks the run, as a shell script would
//! - Secrets only ever travel through stdin or files, never argv, so
//!   arguments are safe to log

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::jcli::types::{JcliError, JcliResult};

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can execute the external client.
///
/// The production implementation spawns processes; tests substitute a
/// scripted runner.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<&str>,
    ) -> JcliResult<CommandOutput>;
}

#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<&str>,
    ) -> JcliResult<CommandOutput> {
        (**self).run(program, args, stdin).await
    }
}

/// Runs the client as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<&str>,
    ) -> JcliResult<CommandOutput> {
        let command = describe(program, args);
        tracing::debug!(command = %command, args = ?args, "Invoking external client");

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| JcliError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        if let Some(input) = stdin {
            let io_error = |source| JcliError::Io {
                command: command.clone(),
                source,
            };
            let mut child_stdin = child.stdin.take().ok_or_else(|| {
                io_error(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "stdin unavailable",
                ))
            })?;
            let mut written = child_stdin.write_all(input.as_bytes()).await;
            if written.is_ok() && !input.ends_with('\n') {
                written = child_stdin.write_all(b"\n").await;
            }
            match written {
                // the client exited without reading; its status says why
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                other => other.map_err(io_error)?,
            }
            // closing stdin lets the client see end of input
            drop(child_stdin);
        }

        let output = child.wait_with_output().await.map_err(|source| JcliError::Io {
            command: command.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        match output.status.code() {
            Some(0) => Ok(CommandOutput { stdout, stderr }),
            Some(code) => Err(JcliError::Failed {
                command,
                code,
                stderr,
            }),
            None => Err(JcliError::Killed { command }),
        }
    }
}

/// Short human-readable name of an invocation: the program followed by its
/// leading subcommand words.
pub fn describe(program: &Path, args: &[String]) -> String {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());
    let subcommands = args
        .iter()
        .take_while(|arg| !arg.starts_with('-'))
        .take(3);
    std::iter::once(name)
        .chain(subcommands.cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_describe() {
        let program = Path::new("/usr/local/bin/jcli");
        assert_eq!(
            describe(program, &args(&["transaction", "new", "--staging", "s"])),
            "jcli transaction new"
        );
        assert_eq!(
            describe(program, &args(&["rest", "v0", "account", "get", "ca1"])),
            "jcli rest v0 account"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_pipes_stdin() {
        let output = ProcessRunner
            .run(Path::new("cat"), &[], Some("ed25519_pk1abc"))
            .await
            .unwrap();
        assert_eq!(output.stdout, "ed25519_pk1abc\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_propagates_exit_code() {
        let err = ProcessRunner
            .run(Path::new("sh"), &args(&["-c", "echo boom >&2; exit 3"]), None)
            .await
            .unwrap_err();
        match err {
            JcliError::Failed { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_wins_over_unread_stdin() {
        let input = "x".repeat(1 << 20);
        let err = ProcessRunner
            .run(Path::new("sh"), &args(&["-c", "exit 5"]), Some(&input))
            .await
            .unwrap_err();
        assert!(matches!(err, JcliError::Failed { code: 5, .. }), "{err}");
    }

    #[tokio::test]
    async fn test_process_runner_missing_binary() {
        let err = ProcessRunner
            .run(Path::new("/nonexistent/jcli"), &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, JcliError::Spawn { .. }));
    }
}
