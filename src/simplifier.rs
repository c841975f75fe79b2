//! Simplifier - reduces markup to normalized plain text
//!
//! This module consumes the event stream of [`crate::tokenizer`] and
//! produces plain text with a small markdown-like subset for emphasis and
//! links. It is the conversion core of the engine.
//!
//! # Conversion Rules
//!
//! - Text runs are appended with whitespace collapsing (below).
//! - `<br>` requests a logical line break that merges with surrounding
//!   whitespace instead of stacking.
//! - `<a href=...>inner</a>` becomes `[inner](href)`.
//! - `<b>inner</b>` becomes `*inner*`.
//! - Comments, processing instructions and doctypes contribute nothing;
//!   they are the only constructs whose content is dropped wholesale.
//! - CDATA content is appended verbatim, uninterpreted, but still subject
//!   to whitespace collapsing.
//! - Every other tag is a transparent wrapper: the markup is dropped, the
//!   enclosed text flows through.
//!
//! # Whitespace Collapsing
//!
//! Any run of space, tab, CR and LF collapses to one pending break: a
//! newline if the run contained at least one CR or LF, otherwise a single
//! space. The pending break is emitted just before the next
//! non-whitespace character, so the output never carries leading or
//! trailing whitespace and never contains two consecutive newlines.
//!
//! # Error Recovery
//!
//! The simplifier has no failure mode for malformed markup. Unterminated
//! tags end at end of input, and an `<a>`/`<b>` span left open when the
//! input ends is flushed with its transformation applied, so content is
//! never lost.
//!
//! # Examples
//!
//! ```rust
//! use mail_text_engine::simplifier::Simplifier;
//!
//! let simplifier = Simplifier::new();
//! assert_eq!(
//!     simplifier.simplify("click <a href=url>here</a><br>done", true),
//!     "click [here](url)\ndone"
//! );
//! ```

use crate::charset::decode_to_utf8;
use crate::error::EngineError;
use crate::tokenizer::{MarkupEvent, Tokenizer};

/// What the simplifier does with a recognized tag name
///
/// A closed set; unrecognized names map to `Transparent`. Matching is
/// ASCII case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagAction {
    /// `<br>`: request a logical line break
    LineBreak,
    /// `<a href=...>`: buffer inner text, emit `[text](href)`
    Link,
    /// `<b>`: buffer inner text, emit `*text*`
    Bold,
    /// Drop the markup, keep the enclosed text
    Transparent,
}

impl TagAction {
    fn classify(name: &str) -> TagAction {
        if name.eq_ignore_ascii_case("br") {
            TagAction::LineBreak
        } else if name.eq_ignore_ascii_case("a") {
            TagAction::Link
        } else if name.eq_ignore_ascii_case("b") {
            TagAction::Bold
        } else {
            TagAction::Transparent
        }
    }
}

/// Collapsed representation of whitespace seen since the last emitted
/// character
///
/// At most one logical break is ever pending: a newline absorbs spaces,
/// and repeated break requests merge instead of stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingBreak {
    None,
    Space,
    Newline,
}

/// Output accumulator with the pending-break state machine
///
/// Owned exclusively by one simplify call; never aliased outside it.
#[derive(Debug)]
struct TextFlow {
    out: String,
    pending: PendingBreak,
}

impl TextFlow {
    fn new() -> Self {
        TextFlow {
            out: String::new(),
            pending: PendingBreak::None,
        }
    }

    /// Append a text run, collapsing whitespace as it goes
    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\r' | '\n' => self.pending = PendingBreak::Newline,
                ' ' | '\t' => {
                    if self.pending == PendingBreak::None {
                        self.pending = PendingBreak::Space;
                    }
                }
                _ => {
                    self.flush_pending();
                    self.out.push(ch);
                }
            }
        }
    }

    /// Request a logical line break; merges with whatever is pending
    fn request_break(&mut self) {
        self.pending = PendingBreak::Newline;
    }

    /// Append a pre-rendered fragment after flushing the pending break
    fn push_fragment(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.flush_pending();
        self.out.push_str(fragment);
    }

    /// Emit the pending break, unless the output is still empty (which
    /// trims leading whitespace)
    fn flush_pending(&mut self) {
        if !self.out.is_empty() {
            match self.pending {
                PendingBreak::Newline => self.out.push('\n'),
                PendingBreak::Space => self.out.push(' '),
                PendingBreak::None => {}
            }
        }
        self.pending = PendingBreak::None;
    }

    /// Finish the flow; dropping the pending break trims trailing
    /// whitespace
    fn finish(self) -> String {
        self.out
    }
}

/// An open buffering construct (`<a href>` or `<b>`)
#[derive(Debug)]
struct Span {
    kind: SpanKind,
    flow: TextFlow,
}

#[derive(Debug)]
enum SpanKind {
    Link { href: String },
    Bold,
}

impl Span {
    /// Render the buffered span with its transformation applied
    fn render(self) -> String {
        let inner = self.flow.finish();
        match self.kind {
            SpanKind::Link { href } => format!("[{}]({})", inner, href),
            SpanKind::Bold => format!("*{}*", inner),
        }
    }
}

/// Markup to plain text simplifier
///
/// The instance is a configuration container only; it carries no per-call
/// state, so one simplifier can be shared freely across threads and every
/// call owns its own buffers.
///
/// # Usage
///
/// ```rust
/// use mail_text_engine::simplifier::Simplifier;
///
/// let simplifier = Simplifier::new();
/// let plain = simplifier.simplify("line1<br>\r\nline2", true);
/// assert_eq!(plain, "line1\nline2");
/// ```
#[derive(Debug, Default)]
pub struct Simplifier;

impl Simplifier {
    /// Create a new simplifier
    pub fn new() -> Self {
        Simplifier
    }

    /// Simplify a markup buffer to normalized plain text
    ///
    /// With `is_html == false` only whitespace collapsing is applied; no
    /// tag interpretation takes place. This call cannot fail: malformed
    /// markup degrades to best-effort text, never to an error.
    pub fn simplify(&self, input: &str, is_html: bool) -> String {
        let mut flow = TextFlow::new();
        if !is_html {
            flow.push_text(input);
            return flow.finish();
        }

        let mut span: Option<Span> = None;
        for event in Tokenizer::new(input) {
            match event {
                MarkupEvent::Text(text) | MarkupEvent::CData(text) => {
                    sink(&mut flow, &mut span).push_text(text);
                }
                MarkupEvent::Comment
                | MarkupEvent::ProcessingInstruction
                | MarkupEvent::Doctype => {}
                MarkupEvent::StartTag { name, .. } => match TagAction::classify(name) {
                    TagAction::LineBreak => sink(&mut flow, &mut span).request_break(),
                    TagAction::Link => {
                        // Only a start tag carrying href opens a link span;
                        // while a span is open further a/b starts are
                        // transparent
                        if span.is_none()
                            && let Some(href) = event.attr("href")
                        {
                            span = Some(Span {
                                kind: SpanKind::Link {
                                    href: href.to_string(),
                                },
                                flow: TextFlow::new(),
                            });
                        }
                    }
                    TagAction::Bold => {
                        if span.is_none() {
                            span = Some(Span {
                                kind: SpanKind::Bold,
                                flow: TextFlow::new(),
                            });
                        }
                    }
                    TagAction::Transparent => {}
                },
                MarkupEvent::EndTag { name } => {
                    let closes = match (&span, TagAction::classify(name)) {
                        (Some(Span { kind: SpanKind::Link { .. }, .. }), TagAction::Link) => true,
                        (Some(Span { kind: SpanKind::Bold, .. }), TagAction::Bold) => true,
                        _ => false,
                    };
                    if closes
                        && let Some(open) = span.take()
                    {
                        flow.push_fragment(&open.render());
                    }
                }
            }
        }

        // An unterminated span never drops content: flush it as if closed
        if let Some(open) = span.take() {
            flow.push_fragment(&open.render());
        }
        flow.finish()
    }

    /// Simplify a raw byte buffer, decoding it to UTF-8 first
    ///
    /// This is the byte-sequence entry point: charset is detected from
    /// the optional Content-Type value or the markup itself and the input
    /// is transcoded before simplification.
    ///
    /// # Errors
    ///
    /// - `EngineError::InvalidInput` when the buffer is empty
    /// - `EngineError::Encoding` when the charset is unsupported or the
    ///   bytes cannot be decoded
    pub fn simplify_bytes(
        &self,
        input: &[u8],
        content_type: Option<&str>,
        is_html: bool,
    ) -> Result<String, EngineError> {
        if input.is_empty() {
            return Err(EngineError::InvalidInput(
                "markup input is empty".to_string(),
            ));
        }
        let text = decode_to_utf8(input, content_type)?;
        Ok(self.simplify(&text, is_html))
    }
}

/// Route text to the open span's buffer, or to the top-level flow
fn sink<'f>(flow: &'f mut TextFlow, span: &'f mut Option<Span>) -> &'f mut TextFlow {
    match span {
        Some(open) => &mut open.flow,
        None => flow,
    }
}
