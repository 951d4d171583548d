//! Wire format of the status stream.
//!
//! ```text
//! frame := "data: " json "\n\n"
//! ```
//!
//! A blank line ends a frame whether lines end in `\n` or `\r\n`.
//!
//! The decoder works on raw bytes so a network read may end anywhere: inside
//! a frame, inside the delimiter, or inside a multi-byte character.

use log::debug;

use crate::types::StatusUpdate;

pub const FRAME_PREFIX: &str = "data: ";
pub const FRAME_DELIMITER: &str = "\n\n";

pub fn encode_frame(update: &StatusUpdate) -> String {
    format!(
        "{FRAME_PREFIX}{}{FRAME_DELIMITER}",
        serde_json::to_string(update).unwrap_or_default()
    )
}

/// Decodes every complete frame in `buffer`.
///
/// Returns the updates in order and the unconsumed tail, which starts at the
/// first byte after the last delimiter.
pub fn decode_frames(buffer: &[u8]) -> (Vec<StatusUpdate>, &[u8]) {
    let mut updates = Vec::new();
    let mut rest = buffer;

    while let Some((end, delimiter_len)) = find_boundary(rest) {
        if let Some(update) = parse_frame(&rest[..end]) {
            updates.push(update);
        }
        rest = &rest[end + delimiter_len..];
    }

    (updates, rest)
}

/// Position and length of the first blank-line boundary: `\n\n` or
/// `\n\r\n`. A `\r` before the first `\n` stays with the frame.
fn find_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    buffer.iter().enumerate().find_map(|(i, &b)| {
        if b != b'\n' {
            return None;
        }
        match &buffer[i + 1..] {
            [b'\n', ..] => Some((i, 2)),
            [b'\r', b'\n', ..] => Some((i, 3)),
            _ => None,
        }
    })
}

fn parse_frame(frame: &[u8]) -> Option<StatusUpdate> {
    let text = match std::str::from_utf8(frame) {
        Ok(text) => text,
        Err(e) => {
            debug!("Skipping frame with invalid UTF-8: {e}");
            return None;
        }
    };

    let payload = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(|line| line.strip_prefix(FRAME_PREFIX))
        .collect::<Vec<_>>();

    if payload.is_empty() {
        if !text.trim().is_empty() {
            debug!("Skipping frame without a data line: {text:?}");
        }
        return None;
    }

    let json = payload.join("\n");
    match serde_json::from_str::<StatusUpdate>(&json) {
        Ok(update) => Some(update),
        Err(e) => {
            debug!("Skipping malformed frame {json:?}: {e}");
            None
        }
    }
}

/// Incremental decoder fed with whatever the transport hands over.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<StatusUpdate> {
        self.buffer.extend_from_slice(chunk);
        let (updates, rest) = decode_frames(&self.buffer);
        let consumed = self.buffer.len() - rest.len();
        self.buffer.drain(..consumed);
        updates
    }

    /// Bytes received but not yet terminated by a delimiter.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Flushes a trailing frame the server closed without a delimiter.
    pub fn finish(self) -> Option<StatusUpdate> {
        parse_frame(&self.buffer)
    }
}
