//! The probe's SMTP state machine and reply framing.
//!
//! Pure and socket-free: [`transition`] maps (state, reply code) to the next
//! command or a terminal outcome, and [`ReplyAccumulator`] assembles
//! multi-line replies.

use crate::core::models::ReasonCode;

/// Where the conversation stands: which command's reply we are waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Greeting,
    EhloSent,
    HeloSent,
    MailSent,
    RcptSent,
}

/// Commands the probe ever sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpCommand {
    Ehlo,
    Helo,
    MailFrom,
    RcptTo,
    Quit,
}

impl SmtpCommand {
    /// Wire form, CRLF-terminated.
    pub fn render(&self, identity: &str, sender: &str, target: &str) -> String {
        match self {
            SmtpCommand::Ehlo => format!("EHLO {}\r\n", identity),
            SmtpCommand::Helo => format!("HELO {}\r\n", identity),
            SmtpCommand::MailFrom => format!("MAIL FROM:<{}>\r\n", sender),
            SmtpCommand::RcptTo => format!("RCPT TO:<{}>\r\n", target),
            SmtpCommand::Quit => "QUIT\r\n".to_string(),
        }
    }
}

/// What to do after a complete reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Send {
        command: SmtpCommand,
        next: ProbeState,
    },
    Finish {
        valid: bool,
        reason: ReasonCode,
        /// Send `QUIT` before closing.
        quit: bool,
    },
}

fn fail(reason: ReasonCode) -> Transition {
    Transition::Finish {
        valid: false,
        reason,
        quit: false,
    }
}

fn fail_after_rcpt(reason: ReasonCode) -> Transition {
    Transition::Finish {
        valid: false,
        reason,
        quit: true,
    }
}

/// The transition table.
pub fn transition(state: ProbeState, code: u16) -> Transition {
    use ProbeState::*;

    match (state, code) {
        (Greeting, 220) => Transition::Send {
            command: SmtpCommand::Ehlo,
            next: EhloSent,
        },
        (Greeting, 421 | 450) => fail(ReasonCode::RateLimited),
        (Greeting, _) => fail(ReasonCode::SmtpError),

        (EhloSent, 250) => Transition::Send {
            command: SmtpCommand::MailFrom,
            next: MailSent,
        },
        (EhloSent, 421) => fail(ReasonCode::RateLimited),
        (EhloSent, _) => Transition::Send {
            command: SmtpCommand::Helo,
            next: HeloSent,
        },

        (HeloSent, 250) => Transition::Send {
            command: SmtpCommand::MailFrom,
            next: MailSent,
        },
        (HeloSent, _) => fail(ReasonCode::SmtpError),

        (MailSent, 250) => Transition::Send {
            command: SmtpCommand::RcptTo,
            next: RcptSent,
        },
        (MailSent, 421 | 450) => fail(ReasonCode::RateLimited),
        (MailSent, 550 | 553) => fail(ReasonCode::Blocked),
        (MailSent, _) => fail(ReasonCode::SmtpError),

        (RcptSent, 250 | 251) => Transition::Finish {
            valid: true,
            reason: ReasonCode::MailboxExists,
            quit: true,
        },
        (RcptSent, 550..=554) => fail_after_rcpt(ReasonCode::MailboxNotFound),
        (RcptSent, 450..=452) => fail_after_rcpt(ReasonCode::Greylisted),
        (RcptSent, 421) => fail_after_rcpt(ReasonCode::RateLimited),
        (RcptSent, 503) => fail_after_rcpt(ReasonCode::SmtpError),
        (RcptSent, _) => fail_after_rcpt(ReasonCode::UnknownError),
    }
}

/// A complete server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// `0` when the final line does not start with three digits.
    pub code: u16,
    pub text: String,
}

/// Longest reply line accepted, in bytes, excluding the line ending.
pub const MAX_REPLY_LINE_LEN: usize = 1024;
/// Most lines one multi-line reply may span.
pub const MAX_REPLY_LINES: usize = 64;

/// The server sent more continuation lines than [`MAX_REPLY_LINES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTooLong;

/// Buffers continuation lines (`250-...`) until the final line of a reply arrives.
#[derive(Debug, Default)]
pub struct ReplyAccumulator {
    lines: Vec<String>,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line (without CRLF). Returns the reply once it is complete.
    pub fn push_line(&mut self, line: &str) -> Result<Option<Reply>, ReplyTooLong> {
        self.lines.push(line.to_string());
        if is_continuation(line) {
            if self.lines.len() >= MAX_REPLY_LINES {
                return Err(ReplyTooLong);
            }
            return Ok(None);
        }

        let code = line
            .get(..3)
            .filter(|c| c.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        let text = std::mem::take(&mut self.lines).join("\n");
        Ok(Some(Reply { code, text }))
    }

    /// Whatever has been received for an unfinished reply.
    pub fn partial(&self) -> String {
        self.lines.join("\n")
    }
}

fn is_continuation(line: &str) -> bool {
    line.as_bytes().get(3) == Some(&b'-')
}
