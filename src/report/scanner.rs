//! Streaming markup scanner.
//!
//! The scanner walks a report document once, front to back, and hands each
//! structural event to a [`Sink`]: element open, element close, character
//! data and comments. It never builds a tree and never backtracks, so a sink
//! sees events in exactly document order.
//!
//! Only the subset of HTML that performance reports use is understood:
//! plain elements (attributes are skipped), comments, declarations and a
//! handful of character references. Anything that cannot be tokenized, such
//! as an unterminated comment, is a fatal [`ReportError::Markup`].
//!
//! # Example
//!
//! ```
//! use gridperf::report::scanner::{Flow, Scanner, Sink};
//! use gridperf::report::ReportError;
//!
//! #[derive(Default)]
//! struct CountItems(usize);
//!
//! impl Sink for CountItems {
//!     fn open(&mut self, tag: &str) -> Result<Flow, ReportError> {
//!         if tag == "li" {
//!             self.0 += 1;
//!         }
//!         Ok(Flow::Continue)
//!     }
//! }
//!
//! let mut sink = CountItems::default();
//! Scanner::new()
//!     .advance(&mut sink, "<ul><li>a</li><li>b</li></ul>")
//!     .unwrap();
//! assert_eq!(sink.0, 2);
//! ```

use std::borrow::Cow;

use tracing::trace;

use super::error::ReportError;

/// Whether scanning should go on after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop scanning the document; returned to the caller of
    /// [`Scanner::advance`] unchanged.
    Stop,
}

/// Receiver of scanner events.
///
/// All callbacks default to ignoring the event. Returning an error aborts the
/// scan and propagates the error; returning [`Flow::Stop`] ends it early.
pub trait Sink {
    fn open(&mut self, _tag: &str) -> Result<Flow, ReportError> {
        Ok(Flow::Continue)
    }

    fn close(&mut self, _tag: &str) -> Result<Flow, ReportError> {
        Ok(Flow::Continue)
    }

    fn text(&mut self, _data: &str) -> Result<Flow, ReportError> {
        Ok(Flow::Continue)
    }

    fn comment(&mut self, _data: &str) -> Result<Flow, ReportError> {
        Ok(Flow::Continue)
    }
}

/// Return early from `advance` when the sink asked to stop.
macro_rules! check {
    ($flow:expr) => {
        if $flow? == Flow::Stop {
            return Ok(Flow::Stop);
        }
    };
}

/// Single pass tokenizer feeding a [`Sink`].
#[derive(Debug, Default)]
pub struct Scanner {
    events: u64,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events delivered so far.
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Scan `text` to the end (or until the sink stops) delivering events.
    pub fn advance<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        text: &str,
    ) -> Result<Flow, ReportError> {
        let bytes = text.as_bytes();
        let mut pos = 0;
        let mut text_start = 0;

        while let Some(rel) = text[pos..].find('<') {
            let lt = pos + rel;
            let rest = &bytes[lt + 1..];

            if rest.starts_with(b"!--") {
                let body_start = lt + 4;
                let end = text[body_start..]
                    .find("-->")
                    .map(|i| body_start + i)
                    .ok_or_else(|| markup_error(lt, "unterminated comment"))?;
                check!(self.flush_text(sink, &text[text_start..lt]));
                check!(self.emit(sink, Event::Comment(&text[body_start..end])));
                pos = end + 3;
                text_start = pos;
            } else if rest.first().is_some_and(|b| *b == b'!' || *b == b'?') {
                let end = find_tag_end(text, lt + 1)
                    .ok_or_else(|| markup_error(lt, "unterminated declaration"))?;
                check!(self.flush_text(sink, &text[text_start..lt]));
                trace!(declaration = &text[lt..=end], "Skipping declaration");
                pos = end + 1;
                text_start = pos;
            } else if rest.first() == Some(&b'/')
                && rest.get(1).is_some_and(|b| b.is_ascii_alphabetic())
            {
                let end = find_tag_end(text, lt + 2)
                    .ok_or_else(|| markup_error(lt, "unterminated end tag"))?;
                let name = tag_name(&text[lt + 2..end]);
                check!(self.flush_text(sink, &text[text_start..lt]));
                check!(self.emit(sink, Event::Close(&name)));
                pos = end + 1;
                text_start = pos;
            } else if rest.first().is_some_and(|b| b.is_ascii_alphabetic()) {
                let end = find_tag_end(text, lt + 1)
                    .ok_or_else(|| markup_error(lt, "unterminated start tag"))?;
                let inner = &text[lt + 1..end];
                let name = tag_name(inner);
                let self_closing = inner.ends_with('/');
                check!(self.flush_text(sink, &text[text_start..lt]));
                check!(self.emit(sink, Event::Open(&name)));
                if self_closing {
                    check!(self.emit(sink, Event::Close(&name)));
                }
                pos = end + 1;
                text_start = pos;
            } else {
                // A bare '<' is character data.
                pos = lt + 1;
            }
        }

        check!(self.flush_text(sink, &text[text_start..]));
        Ok(Flow::Continue)
    }

    fn flush_text<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        raw: &str,
    ) -> Result<Flow, ReportError> {
        if raw.is_empty() {
            return Ok(Flow::Continue);
        }
        let decoded = decode_entities(raw);
        self.emit(sink, Event::Text(&decoded))
    }

    fn emit<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        event: Event<'_>,
    ) -> Result<Flow, ReportError> {
        self.events += 1;
        match event {
            Event::Open(tag) => sink.open(tag),
            Event::Close(tag) => sink.close(tag),
            Event::Text(data) => sink.text(data),
            Event::Comment(data) => sink.comment(data),
        }
    }
}

enum Event<'a> {
    Open(&'a str),
    Close(&'a str),
    Text(&'a str),
    Comment(&'a str),
}

fn markup_error(offset: usize, message: &str) -> ReportError {
    ReportError::Markup {
        offset,
        message: message.to_string(),
    }
}

/// Find the `>` closing a tag, ignoring any inside quoted attribute values.
fn find_tag_end(text: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in text.as_bytes()[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(from + i),
                _ => {}
            },
        }
    }
    None
}

/// Lower-cased element name at the start of a tag body.
fn tag_name(inner: &str) -> String {
    inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Decode the character references reports use.
///
/// Unknown references are left as written.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
