//! IRC line parsing and formatting.
//!
//! Inbound lines are scanned without copying: every field of [`Message`] is a
//! slice of the original line, which stays intact for the transcript. Only
//! the shapes this client reacts to are recognised; anything else is ignored.

use std::fmt;

pub const LINE_ENDINGS: &[char] = &['\n', '\r'];

/// Result of parsing one complete line from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// A keep-alive; the whole line, to be echoed back as `PONG`.
    Ping(&'a str),
    Message(Message<'a>),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    pub nickname: &'a str,
    pub command: &'a str,
    /// Channel (sigil included) or target nickname.
    pub channel: Option<&'a str>,
    pub trailing: Option<&'a str>,
}

/// What the client does with a parsed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Welcome,
    Quit {
        nickname: &'a str,
    },
    Join {
        nickname: &'a str,
    },
    Direct {
        nickname: &'a str,
        text: &'a str,
    },
    Foreign {
        nickname: &'a str,
        channel: &'a str,
        text: &'a str,
    },
    Channel {
        nickname: &'a str,
        text: &'a str,
    },
    Other,
}

/// Splits a line the way `strtok` walks a string: leading delimiters are
/// skipped, a token runs up to the next delimiter, and that single delimiter
/// is consumed.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn next(&mut self, delims: &[char]) -> Option<&'a str> {
        let start = self.rest.trim_start_matches(delims);
        if start.is_empty() {
            self.rest = start;
            return None;
        }

        match start.find(delims) {
            Some(at) => {
                let delim_len = start[at..].chars().next().map_or(0, char::len_utf8);
                self.rest = &start[at + delim_len..];
                Some(&start[..at])
            }
            None => {
                self.rest = "";
                Some(start)
            }
        }
    }
}

pub fn parse(line: &str) -> Inbound<'_> {
    if line.starts_with("PING") {
        return Inbound::Ping(line);
    }
    if !line.starts_with(':') {
        return Inbound::Ignored;
    }

    let mut tokens = Tokens::new(line);
    let Some(prefix) = tokens.next(&[' ']) else {
        return Inbound::Ignored;
    };
    let head = tokens.next(&[':']);
    let trailing = tokens.next(&['\r']);

    let Some(nickname) = Tokens::new(&prefix[1..]).next(&['!']) else {
        return Inbound::Ignored;
    };
    let Some(head) = head else {
        return Inbound::Ignored;
    };

    let mut head = Tokens::new(head);
    let Some(command) = head.next(&['#', '&', ' ']) else {
        return Inbound::Ignored;
    };
    let channel = head.next(&[' ']);

    Inbound::Message(Message {
        nickname,
        command,
        channel,
        trailing,
    })
}

impl<'a> Message<'a> {
    /// Decides how to present this message to a user called `own_nick` who
    /// is sitting in `channel`.
    ///
    /// A private message must name `own_nick` exactly; a channel message is
    /// considered foreign when its target does not contain `channel`.
    pub fn classify(&self, own_nick: &str, channel: &str) -> Event<'a> {
        let nickname = self.nickname;
        let text = self.trailing.unwrap_or("");

        if self.command.starts_with("001") {
            Event::Welcome
        } else if self.command.starts_with("QUIT") {
            Event::Quit { nickname }
        } else if self.command.starts_with("JOIN") {
            Event::Join { nickname }
        } else if self.command.starts_with("PRIVMSG") {
            match self.channel {
                Some(target) if target == own_nick => Event::Direct { nickname, text },
                Some(target) if !target.contains(channel) => Event::Foreign {
                    nickname,
                    channel: target,
                    text,
                },
                _ => Event::Channel { nickname, text },
            }
        } else {
            Event::Other
        }
    }
}

/// A line the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Pass(String),
    Nick(String),
    User { user: String, real: String },
    /// Sent verbatim.
    Raw(String),
    /// Joins the configured channel; the `#` is added here.
    JoinChannel(String),
    Join(String),
    Part(String),
    Names(String),
    Privmsg { target: String, text: String },
    Quit(Option<String>),
    /// Reply to a `PING` line, carrying everything after the `PING` verb.
    Pong(String),
}

impl Outbound {
    /// Builds the reply to a raw `PING` line, keeping its arguments intact.
    pub fn pong(ping: &str) -> Self {
        let rest = ping.strip_prefix("PING").unwrap_or(ping);
        Outbound::Pong(rest.trim_end_matches(LINE_ENDINGS).to_string())
    }

    /// Wire form, terminator included.
    pub fn encode(&self) -> String {
        format!("{self}\r\n")
    }
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Pass(pass) => write!(f, "PASS {pass}"),
            Outbound::Nick(nick) => write!(f, "NICK {nick}"),
            Outbound::User { user, real } => write!(f, "USER {user} - - :{real}"),
            Outbound::Raw(raw) => f.write_str(raw),
            Outbound::JoinChannel(channel) => write!(f, "JOIN #{channel}"),
            Outbound::Join(channel) => write!(f, "JOIN {channel}"),
            Outbound::Part(channel) => write!(f, "PART {channel}"),
            Outbound::Names(channel) => write!(f, "NAMES #{channel}"),
            Outbound::Privmsg { target, text } => write!(f, "PRIVMSG {target} :{text}"),
            Outbound::Quit(None) => f.write_str("QUIT"),
            Outbound::Quit(Some(reason)) => write!(f, "QUIT :{reason}"),
            Outbound::Pong(rest) => write!(f, "PONG{rest}"),
        }
    }
}
