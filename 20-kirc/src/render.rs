//! Terminal presentation: coloured event lines and gutter-aware wrapping.

use crate::message::Event;

const RESET: &str = "\x1b[0m";
const BLUE: &str = "\x1b[34;1m";
const GREEN: &str = "\x1b[32;1m";
const YELLOW: &str = "\x1b[33;1m";
const HIGHLIGHT: &str = "\x1b[43;1m";

/// Column geometry of the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Width of the message column.
    pub columns: usize,
    /// Width of the nickname gutter on the left.
    pub gutter: usize,
}

impl Layout {
    pub fn total_width(&self) -> usize {
        self.columns + self.gutter
    }

    /// Formats an event as a single unwrapped line, or `None` when the event
    /// has no visible representation.
    pub fn format_event(&self, event: &Event<'_>) -> Option<String> {
        let g = self.gutter;
        let arrow_pad = " ".repeat(g.saturating_sub(3));

        let line = match *event {
            Event::Quit { nickname } => format!("{arrow_pad}<-- {BLUE}{nickname}{RESET}"),
            Event::Join { nickname } => format!("{arrow_pad}--> {GREEN}{nickname}{RESET}"),
            Event::Direct { nickname, text } => {
                let (pad, nick) = self.gutter_nick(nickname);
                format!("{pad}{HIGHLIGHT}{nick}{RESET} {text}")
            }
            Event::Foreign {
                nickname,
                channel,
                text,
            } => {
                let (pad, nick) = self.gutter_nick(nickname);
                format!("{pad}{YELLOW}{nick}{RESET} [{channel}] {text}")
            }
            Event::Channel { nickname, text } => {
                let (pad, nick) = self.gutter_nick(nickname);
                format!("{pad}{YELLOW}{nick}{RESET} {text}")
            }
            Event::Welcome | Event::Other => return None,
        };
        Some(line)
    }

    /// Right-aligns `nickname` in the gutter, cutting it to the gutter width.
    fn gutter_nick<'a>(&self, nickname: &'a str) -> (String, &'a str) {
        let nick = match nickname.char_indices().nth(self.gutter) {
            Some((cut, _)) => &nickname[..cut],
            None => nickname,
        };
        let pad = " ".repeat(self.gutter - nick.chars().count());
        (pad, nick)
    }

    /// Re-flows `text` so that no line runs past the total width.
    ///
    /// Leading whitespace is copied through untouched and sets the gutter
    /// column of the first line. Words are separated by single spaces and
    /// each one is followed by a space, including the last. A word that does
    /// not fit moves to a fresh line indented by `gutter + 1` spaces; a word
    /// wider than the whole line is still printed in one piece.
    pub fn wrap(&self, text: &str) -> String {
        let body = text.trim_start();
        let lead = &text[..text.len() - body.len()];

        let mut out = String::with_capacity(text.len() + 16);
        out.push_str(lead);

        let mut space_left = (self.total_width() + 1).saturating_sub(lead.chars().count());
        for word in body.split(' ').filter(|word| !word.is_empty()) {
            let width = word.chars().count();
            if width + 1 > space_left {
                out.push('\n');
                out.extend(std::iter::repeat_n(' ', self.gutter + 1));
                space_left = self.columns.saturating_sub(self.gutter + 1 + width);
            } else {
                space_left -= width + 1;
            }
            out.push_str(word);
            out.push(' ');
        }

        out.push('\n');
        out
    }
}
