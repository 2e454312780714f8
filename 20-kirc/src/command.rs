//! Interpretation of what the user types.
//!
//! A line is either a slash command with a one-letter discriminator
//! (`/j #rust`) or plain text for the current channel. Commands that need an
//! argument and do not get one are sent as plain text instead.

use crate::message::{LINE_ENDINGS, Outbound};

const NICKSERV: &str = "nickserv";

/// Turns one line of user input into the line to send, if any.
///
/// `channel` is the configured channel name without its `#`.
pub fn interpret(input: &str, channel: &str) -> Option<Outbound> {
    let line = input.trim_end_matches(LINE_ENDINGS);
    if line.is_empty() {
        return None;
    }

    Some(parse_command(line, channel).unwrap_or_else(|| Outbound::Privmsg {
        target: format!("#{channel}"),
        text: line.to_string(),
    }))
}

fn parse_command(line: &str, channel: &str) -> Option<Outbound> {
    let rest = line.strip_prefix('/')?;
    let mut chars = rest.chars();
    let letter = chars.next()?;
    let after = chars.as_str();
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return None;
    }
    let arg = after.trim_start();

    let required = || (!arg.is_empty()).then(|| arg.to_string());

    match letter {
        'x' => required().map(Outbound::Raw),
        'q' => Some(Outbound::Quit(None)),
        'Q' => required().map(|reason| Outbound::Quit(Some(reason))),
        'j' => required().map(Outbound::Join),
        'p' => required().map(Outbound::Part),
        'n' => Some(Outbound::Names(channel.to_string())),
        'M' => required().map(|text| Outbound::Privmsg {
            target: NICKSERV.to_string(),
            text,
        }),
        'm' => {
            let (target, text) = arg.split_once(char::is_whitespace)?;
            let text = text.trim_start();
            if text.is_empty() {
                return None;
            }
            Some(Outbound::Privmsg {
                target: target.to_string(),
                text: text.to_string(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(input: &str) -> Option<String> {
        interpret(input, "kirc").map(|out| out.encode())
    }

    #[test]
    fn plain_text_goes_to_the_channel() {
        assert_eq!(
            wire("hello world\r\n").as_deref(),
            Some("PRIVMSG #kirc :hello world\r\n")
        );
        assert_eq!(
            wire("no newline").as_deref(),
            Some("PRIVMSG #kirc :no newline\r\n")
        );
    }

    #[test]
    fn empty_lines_send_nothing() {
        assert_eq!(wire("\n"), None);
        assert_eq!(wire("\r\n"), None);
    }

    #[test]
    fn channel_commands() {
        assert_eq!(wire("/j #general\r\n").as_deref(), Some("JOIN #general\r\n"));
        assert_eq!(wire("/p #general\n").as_deref(), Some("PART #general\r\n"));
        assert_eq!(wire("/n\n").as_deref(), Some("NAMES #kirc\r\n"));
    }

    #[test]
    fn quit_with_and_without_reason() {
        assert_eq!(wire("/q\n").as_deref(), Some("QUIT\r\n"));
        assert_eq!(wire("/q ignored words\n").as_deref(), Some("QUIT\r\n"));
        assert_eq!(
            wire("/Q off to bed\n").as_deref(),
            Some("QUIT :off to bed\r\n")
        );
    }

    #[test]
    fn private_messages() {
        assert_eq!(
            wire("/m alice  are you there?\n").as_deref(),
            Some("PRIVMSG alice :are you there?\r\n")
        );
        assert_eq!(
            wire("/M identify hunter2\n").as_deref(),
            Some("PRIVMSG nickserv :identify hunter2\r\n")
        );
    }

    #[test]
    fn raw_passthrough_is_verbatim() {
        assert_eq!(
            wire("/x MODE #kirc +t\n").as_deref(),
            Some("MODE #kirc +t\r\n")
        );
    }

    #[test]
    fn incomplete_or_unknown_commands_are_chat_text() {
        assert_eq!(wire("/j\n").as_deref(), Some("PRIVMSG #kirc :/j\r\n"));
        assert_eq!(
            wire("/m alice\n").as_deref(),
            Some("PRIVMSG #kirc :/m alice\r\n")
        );
        assert_eq!(
            wire("/join #rust\n").as_deref(),
            Some("PRIVMSG #kirc :/join #rust\r\n")
        );
        assert_eq!(wire("/z what\n").as_deref(), Some("PRIVMSG #kirc :/z what\r\n"));
        assert_eq!(wire("/\n").as_deref(), Some("PRIVMSG #kirc :/\r\n"));
    }
}
