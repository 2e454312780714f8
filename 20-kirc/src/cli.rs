use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::render::Layout;

/// Tiny IRC client: one server, one channel, plain terminal output.
#[derive(Parser, Debug, Clone)]
#[command(name = "kirc", author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct ClientArgs {
    /// IRC server hostname.
    #[arg(short = 's', long = "server", default_value = "irc.libera.chat")]
    pub host: String,

    /// IRC server port.
    #[arg(short, long, default_value_t = 6667)]
    pub port: u16,

    /// Channel to join, without the leading '#'.
    #[arg(short, long, default_value = "kirc")]
    pub channel: String,

    /// Nickname to register with.
    #[arg(short, long)]
    pub nick: String,

    /// Real name sent at registration. Defaults to the nickname.
    #[arg(short, long = "real-name")]
    pub real: Option<String>,

    /// User name sent at registration. Defaults to the nickname.
    #[arg(short, long)]
    pub user: Option<String>,

    /// Server password.
    #[arg(short = 'k', long = "password")]
    pub pass: Option<String>,

    /// Raw command sent right after registration.
    #[arg(short = 'x', long = "init")]
    pub init: Option<String>,

    /// Width of the nickname gutter.
    #[arg(short = 'w', long = "gutter", default_value_t = 10)]
    pub gutter: usize,

    /// Width of the message column.
    #[arg(short = 'W', long = "columns", default_value_t = 80)]
    pub columns: usize,

    /// Append raw traffic and rendered lines to this file.
    #[arg(short = 'o', long = "log")]
    pub log: Option<PathBuf>,

    /// Echo the raw IRC stream.
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

/// Session settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub channel: String,
    pub nick: String,
    pub user: String,
    pub real: String,
    pub pass: Option<String>,
    pub init: Option<String>,
    pub layout: Layout,
    pub log: Option<PathBuf>,
    pub verbose: bool,
}

impl From<ClientArgs> for Config {
    fn from(args: ClientArgs) -> Self {
        let user = args.user.unwrap_or_else(|| args.nick.clone());
        let real = args.real.unwrap_or_else(|| args.nick.clone());
        Self {
            host: args.host,
            port: args.port,
            channel: args.channel,
            nick: args.nick,
            user,
            real,
            pass: args.pass,
            init: args.init,
            layout: Layout {
                columns: args.columns,
                gutter: args.gutter,
            },
            log: args.log,
            verbose: args.verbose,
        }
    }
}
