use anyhow::{Context, Result};
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    select,
};
use tracing::{debug, info};

use crate::{
    cli::Config,
    command,
    frame::{FrameBuffer, ReadOutcome},
    message::{self, Event, Inbound, LINE_ENDINGS, Outbound},
    transcript::Transcript,
    transport,
};

/// Why a session ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The server closed the connection, usually after a `QUIT`.
    ServerClosed,
    /// Standard input reached end of file; a `QUIT` was sent.
    InputClosed,
}

pub async fn run(config: &Config) -> Result<Exit> {
    let stream = transport::connect(&config.host, config.port).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    run_session(config, stream, stdin, tokio::io::stdout()).await
}

/// Registers on `stream` and then serves the user and the server until one of
/// them goes away.
pub async fn run_session<I, W>(
    config: &Config,
    stream: TcpStream,
    input: I,
    terminal: W,
) -> Result<Exit>
where
    I: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (reader, writer) = stream.into_split();
    let mut session = Session::new(config, writer, terminal);

    session.register().await?;
    session.run_client_loop(&reader, &mut input.lines()).await
}

struct Session<'a, W> {
    config: &'a Config,
    writer: OwnedWriteHalf,
    terminal: W,
    frames: FrameBuffer,
    transcript: Option<Transcript>,
}

impl<'a, W> Session<'a, W>
where
    W: AsyncWrite + Unpin,
{
    fn new(config: &'a Config, writer: OwnedWriteHalf, terminal: W) -> Self {
        Self {
            config,
            writer,
            terminal,
            frames: FrameBuffer::new(),
            transcript: config.log.as_ref().map(Transcript::new),
        }
    }

    async fn register(&mut self) -> Result<()> {
        let config = self.config;
        if let Some(pass) = &config.pass {
            self.send(&Outbound::Pass(pass.clone())).await?;
        }
        self.send(&Outbound::Nick(config.nick.clone())).await?;
        self.send(&Outbound::User {
            user: config.user.clone(),
            real: config.real.clone(),
        })
        .await?;
        if let Some(init) = &config.init {
            self.send(&Outbound::Raw(init.clone())).await?;
        }
        Ok(())
    }

    async fn run_client_loop<I>(
        &mut self,
        reader: &OwnedReadHalf,
        input: &mut Lines<I>,
    ) -> Result<Exit>
    where
        I: AsyncBufRead + Unpin,
    {
        loop {
            select! {
                line = input.next_line() => {
                    if !self.handle_stdin_input(line).await? {
                        info!("standard input closed");
                        return Ok(Exit::InputClosed);
                    }
                }
                ready = reader.readable() => {
                    ready.context("failed to wait for server data")?;
                    if !self.handle_server_data(reader).await? {
                        self.write_terminal("*** connection closed\n").await?;
                        return Ok(Exit::ServerClosed);
                    }
                }
            }
        }
    }

    /// Returns `false` once standard input is exhausted.
    async fn handle_stdin_input(&mut self, line: io::Result<Option<String>>) -> Result<bool> {
        let Some(line) = line.context("failed to read standard input")? else {
            self.send(&Outbound::Quit(None)).await?;
            return Ok(false);
        };

        if let Some(outbound) = command::interpret(&line, &self.config.channel) {
            self.send(&outbound).await?;
        }
        Ok(true)
    }

    /// Drains the socket and handles every complete line. Returns `false`
    /// when the server closed the connection.
    async fn handle_server_data(&mut self, reader: &OwnedReadHalf) -> Result<bool> {
        let mut lines = Vec::new();
        let outcome = self
            .frames
            .append(
                |buf| reader.try_read(buf),
                |line| lines.push(String::from_utf8_lossy(line).into_owned()),
            )
            .context("failed to read from server")?;

        for line in &lines {
            self.handle_server_message(line).await?;
        }

        Ok(outcome == ReadOutcome::WouldBlock)
    }

    async fn handle_server_message(&mut self, line: &str) -> Result<()> {
        if self.config.verbose {
            self.write_terminal(&format!(">> {}\n", line.trim_end_matches(LINE_ENDINGS)))
                .await?;
        }

        let message = match message::parse(line) {
            Inbound::Ping(ping) => return self.send(&Outbound::pong(ping)).await,
            Inbound::Ignored => return Ok(()),
            Inbound::Message(message) => message,
        };

        let event = message.classify(&self.config.nick, &self.config.channel);
        if event == Event::Welcome {
            return self
                .send(&Outbound::JoinChannel(self.config.channel.clone()))
                .await;
        }

        if let Some(text) = self.config.layout.format_event(&event) {
            self.render(&text).await?;
        }
        Ok(())
    }

    /// Logs an outgoing line and writes it to the server.
    async fn send(&mut self, message: &Outbound) -> Result<()> {
        let line = message.encode();
        debug!(line = %message, "sending");

        if self.config.verbose {
            self.write_terminal(&format!("<< {message}\n")).await?;
        }
        if let Some(transcript) = &self.transcript {
            transcript.append(&line).await;
        }

        self.writer
            .write_all(line.as_bytes())
            .await
            .context("failed to write to server")
    }

    async fn render(&mut self, text: &str) -> Result<()> {
        if let Some(transcript) = &self.transcript {
            transcript.append(text).await;
        }
        let wrapped = self.config.layout.wrap(text);
        self.write_terminal(&wrapped).await
    }

    async fn write_terminal(&mut self, text: &str) -> Result<()> {
        self.terminal
            .write_all(text.as_bytes())
            .await
            .context("failed to write to terminal")?;
        self.terminal
            .flush()
            .await
            .context("failed to flush terminal")
    }
}
