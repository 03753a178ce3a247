//! Runs → inline HTML

use super::normalize::normalize;
use super::spans::{self, Span};
use super::{InlineRun, Mark, BREAK_TAG};
use crate::escape::push_escaped;

/// Encode runs as inline HTML.
///
/// Runs are normalized first, so callers may pass anything; the output for a given sequence of
/// runs is always byte-identical.
pub fn encode(runs: &[InlineRun]) -> String {
    let runs = normalize(runs.iter().cloned());
    let mut out = String::new();
    write_spans(&mut out, &spans::build(&runs));
    out
}

fn write_spans(out: &mut String, spans: &[Span<'_>]) {
    for span in spans {
        match span {
            Span::Text(text) => write_text(out, text),
            Span::Marked { mark, children } => {
                write_open(out, mark);
                write_spans(out, children);
                out.push_str("</");
                out.push_str(mark.kind().tag());
                out.push('>');
            }
        }
    }
}

fn write_open(out: &mut String, mark: &Mark) {
    out.push('<');
    out.push_str(mark.kind().tag());
    if let Mark::Link(href) = mark {
        out.push_str(" href=\"");
        push_escaped(out, href);
        out.push('"');
    }
    out.push('>');
}

fn write_text(out: &mut String, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('<');
            out.push_str(BREAK_TAG);
            out.push('>');
        }
        push_escaped(out, line);
    }
}
