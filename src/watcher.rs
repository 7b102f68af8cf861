//! watcher.rs
//!
//! Сборочный вотчер: запускает команды сборки по очереди и следит за их выводом.
//!
//! Оба потока (stdout и stderr) читаются построчно и пробрасываются наружу.
//! Как только в любой строке встречается строка успеха, дочерний процесс
//! убивается и вотчер завершается успешно, оставшиеся команды не запускаются.

use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::config::WatcherConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    SuccessMessageFound { command: String },
    SuccessMessageNotFound,
}

impl WatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WatchOutcome::SuccessMessageFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed ({status})")]
    CommandFailed { command: String, status: ExitStatus },
    #[error("i/o error while watching `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone)]
pub struct BuildWatcher {
    success_message: String,
    commands: Vec<String>,
}

impl BuildWatcher {
    pub fn new(success_message: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            success_message: success_message.into(),
            commands,
        }
    }

    pub fn from_config(config: &WatcherConfig) -> Self {
        Self::new(config.success_message.clone(), config.commands.clone())
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub async fn run(&self) -> Result<WatchOutcome, WatcherError> {
        info!("🚀 Starting build with message watcher");
        info!("📡 Watching for message: {:?}", self.success_message);

        for command in &self.commands {
            info!("⚡ Running: {}", command);
            if self.run_command(command).await? {
                info!("🎉 Success message detected in `{}`", command);
                return Ok(WatchOutcome::SuccessMessageFound {
                    command: command.clone(),
                });
            }
            info!("✅ Command completed: {}", command);
        }

        warn!("❌ Build completed but success message not found");
        Ok(WatchOutcome::SuccessMessageNotFound)
    }

    /// Возвращает `true`, если строка успеха встретилась в выводе команды.
    async fn run_command(&self, command: &str) -> Result<bool, WatcherError> {
        let io_err = |source: io::Error| WatcherError::Io {
            command: command.to_string(),
            source,
        };

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // своя группа процессов, чтобы при остановке убить и все, что запустил sh
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| WatcherError::Spawn {
            command: command.to_string(),
            source,
        })?;
        let mut group = ProcessGroup::of(&child);

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                return Err(io_err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "child output was not captured",
                )))
            }
        };
        let mut out = BufReader::new(stdout);
        let mut err = BufReader::new(stderr);
        let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
        let (mut out_open, mut err_open) = (true, true);

        while out_open || err_open {
            let (stream, line) = tokio::select! {
                line = read_line_lossy(&mut out, &mut out_buf), if out_open => (Stream::Stdout, line.map_err(io_err)?),
                line = read_line_lossy(&mut err, &mut err_buf), if err_open => (Stream::Stderr, line.map_err(io_err)?),
            };

            let Some(line) = line else {
                match stream {
                    Stream::Stdout => out_open = false,
                    Stream::Stderr => err_open = false,
                }
                continue;
            };

            match stream {
                Stream::Stdout => println!("{}", line),
                Stream::Stderr => eprintln!("{}", line),
            }

            if line.contains(&self.success_message) {
                info!("🛑 Force stopping `{}` (success)", command);
                group.kill();
                if let Err(e) = child.kill().await {
                    // процесс мог уже завершиться сам
                    warn!("Could not kill `{}`: {}", command, e);
                }
                return Ok(true);
            }
        }

        let status = child.wait().await.map_err(io_err)?;
        group.release();
        if status.success() {
            Ok(false)
        } else {
            Err(WatcherError::CommandFailed {
                command: command.to_string(),
                status,
            })
        }
    }
}

/// Читает строку до `\n`, невалидный UTF-8 заменяется на U+FFFD.
///
/// Недочитанные байты остаются в `buf`, поэтому вызов безопасно отменять в `select!`.
async fn read_line_lossy<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    let n = reader.read_until(b'\n', buf).await?;
    if n == 0 && buf.is_empty() {
        return Ok(None);
    }
    let bytes: &[u8] = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
    let line = String::from_utf8_lossy(bytes).trim_end_matches('\r').to_string();
    buf.clear();
    Ok(Some(line))
}

/// Группа процессов запущенной команды. Убивается целиком при успехе или
/// при сбросе (прерывание), после штатного завершения команды - отпускается.
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn of(child: &Child) -> Self {
        Self {
            pgid: if cfg!(unix) { child.id() } else { None },
        }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            let result = std::process::Command::new("kill")
                .arg("-KILL")
                .arg("--")
                .arg(format!("-{}", pgid))
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if let Err(e) = result {
                warn!("Could not kill process group {}: {}", pgid, e);
            }
        }
    }

    fn release(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}
