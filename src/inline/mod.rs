//! Inline-mark codec
//!
//!     Text inside a block is a sequence of [`InlineRun`]s: a piece of text plus the set of marks
//!     active over it. The codec converts that flat representation to inline HTML and back.
//!
//! Mark tables
//!
//!     | Mark          | Encoded as        | Decoded from                |
//!     |---------------|-------------------|-----------------------------|
//!     | link(href)    | `<a href="...">`  | `a` (with non-empty href)   |
//!     | bold          | `<strong>`        | `strong`, `b`               |
//!     | italic        | `<em>`            | `em`, `i`                   |
//!     | underline     | `<u>`             | `u`, `ins`                  |
//!     | strikethrough | `<s>`             | `s`, `strike`, `del`        |
//!     | code          | `<code>`          | `code`, `kbd`, `samp`       |
//!
//!     The order of the table is the nesting precedence: links are always the outermost element
//!     and code the innermost. Runs are turned into a span tree that honours that order (see
//!     [`spans`]), so overlapping marks always come out well nested and the same runs always
//!     encode to the same bytes.
//!
//!     `<br>` and `\n` map onto each other. `script`, `style`, `template` and `noscript` are
//!     dropped with their content. Block-level tags met inside text (`<li><p>one</p><p>two</p>`)
//!     split it into lines: each line is trimmed, empty lines are dropped, and the rest are
//!     joined with `\n`. Any other tag met while decoding is transparent: its children are
//!     decoded and the tag itself is forgotten.

pub mod decode;
pub mod encode;
mod normalize;
mod spans;

pub use decode::{decode_children, decode_nodes};
pub use encode::encode;

use serde::{Deserialize, Serialize};

/// A formatting mark applied to a run of text.
///
/// Variant order is the nesting precedence, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Link(String),
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

/// Data-less discriminant of [`Mark`], used by the tag tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkKind {
    Link,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

/// Nesting precedence, outermost first.
pub const PRECEDENCE: [MarkKind; 6] = [
    MarkKind::Link,
    MarkKind::Bold,
    MarkKind::Italic,
    MarkKind::Underline,
    MarkKind::Strikethrough,
    MarkKind::Code,
];

/// Tag written for each mark kind.
pub const ENCODE_TAGS: &[(MarkKind, &str)] = &[
    (MarkKind::Link, "a"),
    (MarkKind::Bold, "strong"),
    (MarkKind::Italic, "em"),
    (MarkKind::Underline, "u"),
    (MarkKind::Strikethrough, "s"),
    (MarkKind::Code, "code"),
];

/// Tags recognised as marks when decoding.
pub const DECODE_TAGS: &[(&str, MarkKind)] = &[
    ("a", MarkKind::Link),
    ("strong", MarkKind::Bold),
    ("b", MarkKind::Bold),
    ("em", MarkKind::Italic),
    ("i", MarkKind::Italic),
    ("u", MarkKind::Underline),
    ("ins", MarkKind::Underline),
    ("s", MarkKind::Strikethrough),
    ("strike", MarkKind::Strikethrough),
    ("del", MarkKind::Strikethrough),
    ("code", MarkKind::Code),
    ("kbd", MarkKind::Code),
    ("samp", MarkKind::Code),
];

/// Tags dropped together with everything inside them.
pub const STRIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Line break tag, decoded to `\n`.
pub const BREAK_TAG: &str = "br";

/// Block-level tags met inside text. Each one starts a new line of the decoded text.
pub const LINE_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "ul", "ol", "li",
    "dl", "dt", "dd", "table", "tr", "section", "article", "aside", "header", "footer", "nav",
    "figure", "figcaption", "address", "hr",
];

impl Mark {
    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Link(_) => MarkKind::Link,
            Mark::Bold => MarkKind::Bold,
            Mark::Italic => MarkKind::Italic,
            Mark::Underline => MarkKind::Underline,
            Mark::Strikethrough => MarkKind::Strikethrough,
            Mark::Code => MarkKind::Code,
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link(href.into())
    }
}

impl MarkKind {
    /// The tag this kind encodes to.
    pub fn tag(self) -> &'static str {
        ENCODE_TAGS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, tag)| *tag)
            .unwrap_or("span")
    }

    /// Look up the mark kind a tag decodes to.
    pub fn from_tag(tag: &str) -> Option<Self> {
        DECODE_TAGS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, kind)| *kind)
    }
}

/// A piece of text with the marks active over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl InlineRun {
    pub fn new(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        InlineRun {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// Builder-style helper to add a mark.
    pub fn with(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    pub fn has(&self, kind: MarkKind) -> bool {
        self.mark_of(kind).is_some()
    }

    pub(crate) fn mark_of(&self, kind: MarkKind) -> Option<&Mark> {
        self.marks.iter().find(|mark| mark.kind() == kind)
    }
}

/// Normalized inline content of a text-bearing block field.
///
/// Deserializes from either a plain string (one unmarked run) or an array of runs, and always
/// serializes as an array of runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RichTextRepr", into = "Vec<InlineRun>")]
pub struct RichText {
    runs: Vec<InlineRun>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RichTextRepr {
    Plain(String),
    Runs(Vec<InlineRun>),
}

impl From<RichTextRepr> for RichText {
    fn from(repr: RichTextRepr) -> Self {
        match repr {
            RichTextRepr::Plain(text) => RichText::plain(text),
            RichTextRepr::Runs(runs) => RichText::from_runs(runs),
        }
    }
}

impl From<RichText> for Vec<InlineRun> {
    fn from(text: RichText) -> Self {
        text.runs
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::plain(text)
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        RichText::plain(text)
    }
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs(vec![InlineRun::plain(text)])
    }

    pub fn from_runs(runs: impl IntoIterator<Item = InlineRun>) -> Self {
        RichText {
            runs: normalize::normalize(runs),
        }
    }

    pub fn runs(&self) -> &[InlineRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The text with all marks removed.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn to_html(&self) -> String {
        encode(&self.runs)
    }

    /// Append runs, keeping the content normalized.
    pub fn extend(&mut self, runs: impl IntoIterator<Item = InlineRun>) {
        let merged = std::mem::take(&mut self.runs).into_iter().chain(runs);
        self.runs = normalize::normalize(merged);
    }

    /// Strip leading and trailing whitespace, dropping runs that become empty.
    pub fn trimmed(self) -> Self {
        let mut runs = self.runs;
        while let Some(first) = runs.first_mut() {
            let text = first.text.trim_start().to_string();
            if !text.is_empty() {
                first.text = text;
                break;
            }
            runs.remove(0);
        }
        while let Some(last) = runs.last_mut() {
            let text = last.text.trim_end().to_string();
            if !text.is_empty() {
                last.text = text;
                break;
            }
            runs.pop();
        }
        Self::from_runs(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MarkKind::Link, "a")]
    #[case(MarkKind::Bold, "strong")]
    #[case(MarkKind::Italic, "em")]
    #[case(MarkKind::Underline, "u")]
    #[case(MarkKind::Strikethrough, "s")]
    #[case(MarkKind::Code, "code")]
    fn encode_tag_table(#[case] kind: MarkKind, #[case] tag: &str) {
        assert_eq!(kind.tag(), tag);
    }

    #[rstest]
    #[case("b", Some(MarkKind::Bold))]
    #[case("STRONG", Some(MarkKind::Bold))]
    #[case("i", Some(MarkKind::Italic))]
    #[case("ins", Some(MarkKind::Underline))]
    #[case("del", Some(MarkKind::Strikethrough))]
    #[case("strike", Some(MarkKind::Strikethrough))]
    #[case("kbd", Some(MarkKind::Code))]
    #[case("span", None)]
    #[case("mark", None)]
    fn decode_tag_table(#[case] tag: &str, #[case] kind: Option<MarkKind>) {
        assert_eq!(MarkKind::from_tag(tag), kind);
    }

    #[test]
    fn precedence_matches_mark_order() {
        let mut kinds = PRECEDENCE.to_vec();
        kinds.sort();
        assert_eq!(kinds, PRECEDENCE.to_vec());
        assert!(Mark::link("x") < Mark::Bold);
        assert!(Mark::Strikethrough < Mark::Code);
    }

    #[test]
    fn rich_text_accepts_plain_string() {
        let text: RichText = serde_json::from_str(r#""Hello""#).unwrap();
        assert_eq!(text.runs(), &[InlineRun::plain("Hello")]);
    }

    #[test]
    fn rich_text_accepts_runs() {
        let text: RichText = serde_json::from_str(
            r#"[{"text":"bold","marks":["bold"]},{"text":"link","marks":[{"link":"/x"}]}]"#,
        )
        .unwrap();
        assert_eq!(
            text.runs(),
            &[
                InlineRun::new("bold", vec![Mark::Bold]),
                InlineRun::new("link", vec![Mark::link("/x")]),
            ]
        );
    }

    #[test]
    fn rich_text_serializes_as_runs() {
        let text = RichText::from_runs(vec![InlineRun::plain("a").with(Mark::Italic)]);
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"[{"text":"a","marks":["italic"]}]"#);
    }

    #[test]
    fn trimmed_only_touches_the_ends() {
        let text = RichText::from_runs(vec![
            InlineRun::plain("  a "),
            InlineRun::new(" b  ", vec![Mark::Bold]),
        ])
        .trimmed();
        assert_eq!(
            text.runs(),
            &[
                InlineRun::plain("a "),
                InlineRun::new(" b", vec![Mark::Bold]),
            ]
        );
    }

    #[test]
    fn trimmed_whitespace_only_becomes_empty() {
        assert!(RichText::plain(" \n ").trimmed().is_empty());
    }
}
