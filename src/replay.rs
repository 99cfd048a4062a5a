//! Captured MIDI streams as text: one message per line, bytes in hex.
//!
//! ```text
//! # sustain down, then middle C
//! b0 40 7f
//! 90 3c 64
//! 90 3c 00
//! ```

use crate::dispatch::{Dispatcher, KeyIntent};
use crate::index::CompiledLayout;
use crate::sink::{deliver, KeySink};
use std::io::BufRead;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadLine {
    pub line: usize,
    pub text: String,
}

/// Parses one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(raw: &str) -> Result<Option<Vec<u8>>, String> {
    let content = match raw.split_once('#') {
        Some((before, _)) => before,
        None => raw,
    };
    let content = content.trim();
    if content.is_empty() {
        return Ok(None);
    }

    content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|tok| {
            let tok = tok.trim_start_matches("0x").trim_start_matches("0X");
            u8::from_str_radix(tok, 16).map_err(|_| format!("'{}' is not a hex byte", tok))
        })
        .collect::<Result<Vec<u8>, String>>()
        .map(Some)
}

/// Parses every line, keeping the good messages in order and reporting the rest.
pub fn parse_messages<R: BufRead>(reader: R) -> (Vec<Vec<u8>>, Vec<BadLine>) {
    let mut messages = Vec::new();
    let mut bad = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let text = match line {
            Ok(t) => t,
            Err(e) => {
                warn!("line {}: could not read: {}", line_no, e);
                bad.push(BadLine {
                    line: line_no,
                    text: String::new(),
                });
                continue;
            }
        };
        match parse_line(&text) {
            Ok(Some(msg)) => messages.push(msg),
            Ok(None) => {}
            Err(e) => {
                warn!("line {}: {}, skipping", line_no, e);
                bad.push(BadLine { line: line_no, text });
            }
        }
    }
    (messages, bad)
}

/// Plays messages through the dispatcher into the sink, in arrival order.
pub fn replay<S: KeySink + ?Sized>(
    dispatcher: &mut Dispatcher,
    layout: &CompiledLayout,
    messages: &[Vec<u8>],
    sink: &mut S,
) -> usize {
    let mut buf: Vec<KeyIntent> = Vec::new();
    let mut delivered = 0;
    for msg in messages {
        buf.clear();
        dispatcher.handle_message_into(layout, msg, &mut buf);
        delivered += deliver(sink, &buf);
    }
    delivered
}
