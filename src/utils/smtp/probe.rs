//! Drives one SMTP conversation over a TCP socket.

use super::protocol::{
    transition, ProbeState, ReplyAccumulator, SmtpCommand, Transition, MAX_REPLY_LINES,
    MAX_REPLY_LINE_LEN,
};
use super::result::SmtpResult;
use super::MailboxProbe;
use crate::core::config::Config;
use crate::core::models::ReasonCode;
use std::io;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Probes mailboxes by talking SMTP to port 25 (configurable) of an MX host.
#[derive(Debug, Clone)]
pub struct SmtpProber {
    port: u16,
    timeout: Duration,
    identity: String,
    sender: String,
}

impl SmtpProber {
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.smtp_port,
            timeout: config.smtp_timeout,
            identity: config.helo_identity.clone(),
            sender: config.smtp_sender_email.clone(),
        }
    }

    async fn converse(&self, email: &str, mx_host: &str) -> SmtpResult {
        let stream = match TcpStream::connect((mx_host, self.port)).await {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(target: "smtp_probe", "Connect to {}:{} failed: {}", mx_host, self.port, e);
                return SmtpResult::failed(classify_io_error(&e), e.to_string());
            }
        };
        let mut stream = BufReader::new(stream);
        let mut state = ProbeState::Greeting;
        let mut acc = ReplyAccumulator::new();
        let mut buf = Vec::with_capacity(512);

        loop {
            buf.clear();
            // Cap plus CRLF; a full buffer with no newline means the line ran over.
            let limit = MAX_REPLY_LINE_LEN as u64 + 2;
            let read = match (&mut stream).take(limit).read_until(b'\n', &mut buf).await {
                Ok(n) => n,
                Err(e) => return SmtpResult::failed(classify_io_error(&e), e.to_string()),
            };
            if read == 0 {
                tracing::debug!(
                    target: "smtp_probe",
                    "{} closed the connection in state {:?}",
                    mx_host,
                    state
                );
                let partial = acc.partial();
                let response = if partial.is_empty() {
                    "Connection closed".to_string()
                } else {
                    partial
                };
                return SmtpResult::failed(ReasonCode::ConnectionError, response);
            }

            if buf.len() as u64 >= limit && buf.last() != Some(&b'\n') {
                tracing::debug!(target: "smtp_probe", "{} sent an overlong reply line", mx_host);
                return SmtpResult::failed(
                    ReasonCode::SmtpError,
                    format!("Reply line exceeds {} bytes", MAX_REPLY_LINE_LEN),
                );
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\r', '\n']);
            let reply = match acc.push_line(line) {
                Ok(Some(reply)) => reply,
                Ok(None) => continue,
                Err(_) => {
                    tracing::debug!(target: "smtp_probe", "{} sent an overlong multi-line reply", mx_host);
                    return SmtpResult::failed(
                        ReasonCode::SmtpError,
                        format!("Reply exceeds {} lines", MAX_REPLY_LINES),
                    );
                }
            };
            tracing::debug!(target: "smtp_probe", "{} <- {} ({:?})", mx_host, reply.code, state);

            match transition(state, reply.code) {
                Transition::Send { command, next } => {
                    let wire = command.render(&self.identity, &self.sender, email);
                    tracing::debug!(target: "smtp_probe", "{} -> {}", mx_host, wire.trim_end());
                    if let Err(e) = stream.get_mut().write_all(wire.as_bytes()).await {
                        return SmtpResult::failed(classify_io_error(&e), e.to_string());
                    }
                    state = next;
                }
                Transition::Finish {
                    valid,
                    reason,
                    quit,
                } => {
                    if quit {
                        let wire = SmtpCommand::Quit.render(&self.identity, &self.sender, email);
                        // Outcome is already decided; a failed QUIT changes nothing.
                        let _ = stream.get_mut().write_all(wire.as_bytes()).await;
                    }
                    return if valid {
                        SmtpResult::accepted(reply.text)
                    } else {
                        SmtpResult::failed(reason, reply.text)
                    };
                }
            }
        }
    }
}

impl MailboxProbe for SmtpProber {
    async fn probe(&self, email: &str, mx_host: &str) -> SmtpResult {
        let start = Instant::now();
        // Dropping the conversation future on timeout drops (and closes) the socket.
        let result = match timeout(self.timeout, self.converse(email, mx_host)).await {
            Ok(result) => result,
            Err(_) => SmtpResult::failed(ReasonCode::Timeout, "Connection timeout"),
        };
        tracing::debug!(
            target: "smtp_probe",
            "Probe of {} via {} finished in {:.2?}: {}",
            email,
            mx_host,
            start.elapsed(),
            result.reason
        );
        result
    }
}

/// Maps a socket error onto the reason taxonomy.
pub(crate) fn classify_io_error(err: &io::Error) -> ReasonCode {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ReasonCode::ConnectionError,
        io::ErrorKind::TimedOut => ReasonCode::Timeout,
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => ReasonCode::Blocked,
        _ => {
            let msg = err.to_string().to_lowercase();
            if msg.contains("refused") {
                ReasonCode::ConnectionError
            } else if msg.contains("timed out") || msg.contains("timeout") {
                ReasonCode::Timeout
            } else if msg.contains("reset") {
                ReasonCode::Blocked
            } else {
                ReasonCode::ConnectionError
            }
        }
    }
}
