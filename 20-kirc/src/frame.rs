//! Incremental `CR LF` framing over a fixed-capacity buffer.
//!
//! The server delivers lines over a stream with no length prefix, so bytes are
//! accumulated here until a terminator shows up. One read may carry several
//! complete lines plus the start of the next one; everything after the last
//! terminator stays in the buffer for the next read.

use std::io;

use tracing::warn;

/// Maximum length of a protocol line, terminator included.
pub const MSG_MAX: usize = 512;

/// What a single drain of the socket ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The socket has no more data for now.
    WouldBlock,
    /// The peer performed an orderly shutdown.
    Closed,
}

#[derive(Debug)]
pub struct FrameBuffer {
    buf: Box<[u8; MSG_MAX]>,
    end: usize,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: Box::new([0; MSG_MAX]),
            end: 0,
        }
    }

    /// Bytes buffered but not yet part of a complete line.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.end]
    }

    pub fn len(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Reads from `read` until it reports would-block or end of stream,
    /// handing every complete line to `on_line` in arrival order.
    ///
    /// `read` follows the non-blocking convention: `Ok(0)` means the peer
    /// closed, `Err` with [`io::ErrorKind::WouldBlock`] means no data yet.
    /// Any other error is returned as-is.
    pub fn append<R, F>(&mut self, mut read: R, mut on_line: F) -> io::Result<ReadOutcome>
    where
        R: FnMut(&mut [u8]) -> io::Result<usize>,
        F: FnMut(&[u8]),
    {
        loop {
            match read(&mut self.buf[self.end..]) {
                Ok(0) => return Ok(ReadOutcome::Closed),
                Ok(n) => self.commit(n, &mut on_line),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(ReadOutcome::WouldBlock);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Copies `bytes` into the buffer, emitting complete lines as they form.
    ///
    /// Input larger than the free space is fed in several steps, exactly as
    /// if it had arrived in several reads.
    pub fn extend<F>(&mut self, mut bytes: &[u8], mut on_line: F)
    where
        F: FnMut(&[u8]),
    {
        while !bytes.is_empty() {
            let n = bytes.len().min(MSG_MAX - self.end);
            self.buf[self.end..self.end + n].copy_from_slice(&bytes[..n]);
            bytes = &bytes[n..];
            self.commit(n, &mut on_line);
        }
    }

    /// Accounts for `n` freshly written bytes at `end` and scans only that
    /// region for terminators.
    fn commit<F>(&mut self, n: usize, on_line: &mut F)
    where
        F: FnMut(&[u8]),
    {
        debug_assert!(self.end + n <= MSG_MAX);

        // A CR left over from the previous read still pairs with an LF here.
        let mut i = self.end.max(1);
        self.end += n;

        while i < self.end {
            if self.buf[i - 1] == b'\r' && self.buf[i] == b'\n' {
                on_line(&self.buf[..=i]);
                self.buf.copy_within(i + 1..self.end, 0);
                self.end -= i + 1;
                i = 1;
            } else {
                i += 1;
            }
        }

        if self.end == MSG_MAX {
            warn!(
                capacity = MSG_MAX,
                "discarding unterminated line that filled the receive buffer"
            );
            self.end = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(frames: &mut FrameBuffer, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        frames.extend(bytes, |line| {
            lines.push(String::from_utf8_lossy(line).into_owned());
        });
        lines
    }

    #[test]
    fn keeps_partial_line_until_terminated() {
        let mut frames = FrameBuffer::new();
        assert!(collect(&mut frames, b"PING :ser").is_empty());
        assert_eq!(frames.pending(), b"PING :ser");

        let lines = collect(&mut frames, b"ver123\r\n");
        assert_eq!(lines, vec!["PING :server123\r\n"]);
        assert!(frames.is_empty());
    }

    #[test]
    fn emits_every_line_of_a_single_read_in_order() {
        let mut frames = FrameBuffer::new();
        let lines = collect(&mut frames, b":a JOIN #k\r\n:b QUIT :bye\r\n:c");
        assert_eq!(lines, vec![":a JOIN #k\r\n", ":b QUIT :bye\r\n"]);
        assert_eq!(frames.pending(), b":c");
    }

    #[test]
    fn terminator_split_across_reads() {
        let mut frames = FrameBuffer::new();
        assert!(collect(&mut frames, b"PING :x\r").is_empty());
        assert_eq!(collect(&mut frames, b"\n"), vec!["PING :x\r\n"]);
    }

    #[test]
    fn bare_lf_is_not_a_terminator() {
        let mut frames = FrameBuffer::new();
        assert_eq!(collect(&mut frames, b"one\ntwo\r\n"), vec!["one\ntwo\r\n"]);
        assert!(frames.is_empty());
    }

    #[test]
    fn line_boundaries_do_not_depend_on_fragmentation() {
        let stream: &[u8] =
            b":alice!~a@h PRIVMSG #kirc :hello\r\nPING :srv\r\n\r\n:bob!~b@h JOIN #kirc\r\ntail";

        let mut whole = FrameBuffer::new();
        let expected = collect(&mut whole, stream);
        assert_eq!(expected.len(), 4);

        for size in 1..=stream.len() {
            let mut frames = FrameBuffer::new();
            let mut lines = Vec::new();
            for chunk in stream.chunks(size) {
                lines.extend(collect(&mut frames, chunk));
            }
            assert_eq!(lines, expected, "chunk size {size}");
            assert_eq!(frames.pending(), b"tail", "chunk size {size}");
        }
    }

    #[test]
    fn full_buffer_without_terminator_is_discarded() {
        let mut frames = FrameBuffer::new();
        let junk = vec![b'a'; MSG_MAX];
        assert!(collect(&mut frames, &junk).is_empty());
        assert!(frames.is_empty());

        let lines = collect(&mut frames, b"PING :fresh\r\n");
        assert_eq!(lines, vec!["PING :fresh\r\n"]);
    }

    #[test]
    fn line_of_exactly_capacity_is_still_delivered() {
        let mut frames = FrameBuffer::new();
        let mut line = vec![b'x'; MSG_MAX - 2];
        line.extend_from_slice(b"\r\n");
        let lines = collect(&mut frames, &line);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), MSG_MAX);
        assert!(frames.is_empty());
    }

    #[test]
    fn append_stops_on_would_block_and_reports_close() {
        let mut frames = FrameBuffer::new();
        let mut reads: Vec<io::Result<&[u8]>> = vec![
            Ok(&b"PING :a\r\nPI"[..]),
            Ok(&b"NG :b\r\n"[..]),
            Err(io::ErrorKind::WouldBlock.into()),
        ];
        reads.reverse();

        let mut lines = Vec::new();
        let outcome = frames
            .append(
                |buf| {
                    let chunk = reads.pop().expect("read called after would-block")?;
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                },
                |line| lines.push(line.to_vec()),
            )
            .expect("append");

        assert_eq!(outcome, ReadOutcome::WouldBlock);
        assert_eq!(lines, vec![b"PING :a\r\n".to_vec(), b"PING :b\r\n".to_vec()]);

        let outcome = frames.append(|_| Ok(0), |_| {}).expect("append");
        assert_eq!(outcome, ReadOutcome::Closed);
    }

    #[test]
    fn append_propagates_real_errors() {
        let mut frames = FrameBuffer::new();
        let err = frames
            .append(
                |_| Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                |_| {},
            )
            .expect_err("reset must surface");
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
