use std::{io::BufRead, num::NonZeroU64, string::String, vec::Vec};

use crate::qmap;

const LINE_CAPACITY: usize = 128;

/// Structural role of a line, decided by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    OpenBrace,
    CloseBrace,
    Property,
    Face,
    Other,
}

/// A trimmed, non-blank, non-comment source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub line_number: NonZeroU64,
}

impl Line {
    pub fn kind(&self) -> LineKind {
        match self.text.as_bytes().first() {
            Some(b'{') => LineKind::OpenBrace,
            Some(b'}') => LineKind::CloseBrace,
            Some(b'"') => LineKind::Property,
            Some(b'(') => LineKind::Face,
            _ => LineKind::Other,
        }
    }
}

pub struct LineIterator<R: BufRead> {
    reader: R,
    lines_read: u64,
    buffer: String,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lines_read: 0,
            buffer: String::with_capacity(LINE_CAPACITY),
        }
    }
}

impl<R: BufRead> Iterator for LineIterator<R> {
    type Item = qmap::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();

            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(qmap::Error::from_io(e))),
            }

            let line_number = NonZeroU64::MIN.saturating_add(self.lines_read);
            self.lines_read += 1;

            let text = self.buffer.trim();

            if text.is_empty() || text.starts_with("//") {
                continue;
            }

            return Some(Ok(Line {
                text: String::from(text),
                line_number,
            }));
        }
    }
}

/// Splits a face line on whitespace, dropping tokens that are a lone
/// bracket character.
pub fn face_tokens(text: &str) -> Vec<&str> {
    text.split_ascii_whitespace()
        .filter(|token| !matches!(*token, "(" | ")" | "[" | "]"))
        .collect()
}

/// Text between the first and second, then third and fourth, double quotes.
pub fn property_pair(text: &str) -> Option<(&str, &str)> {
    let mut quotes = text.match_indices('"').map(|(index, _)| index);

    let key_start = quotes.next()?;
    let key_end = quotes.next()?;
    let value_start = quotes.next()?;
    let value_end = quotes.next()?;

    Some((
        &text[key_start + 1..key_end],
        &text[value_start + 1..value_end],
    ))
}
