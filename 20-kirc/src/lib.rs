//! A small terminal IRC client.
//!
//! One server, one channel, no TLS. The whole client runs on a single thread:
//! a `tokio::select!` loop waits for either a line on standard input or
//! readable data on the socket and handles whichever arrives first.
//!
//! - [`cli`] parses the command line into an immutable [`cli::Config`].
//! - [`transport`] resolves the server and opens the TCP connection.
//! - [`frame`] reassembles `CR LF` terminated lines from arbitrary reads.
//! - [`message`] parses server lines, classifies them, and formats outgoing
//!   lines.
//! - [`command`] turns user input into outgoing lines.
//! - [`render`] colours events and wraps them around a nickname gutter.
//! - [`transcript`] appends the session to an optional log file.
//! - [`client`] ties everything together in the event loop.
//!
//! Unit tests live next to each module; `tests/` drives complete sessions
//! against a scripted server and exercises the binary.

pub mod cli;
pub mod client;
pub mod command;
pub mod frame;
pub mod message;
pub mod render;
pub mod transcript;
pub mod transport;
