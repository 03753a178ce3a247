//! Inline HTML → runs
//!
//! Depth-first walk keeping the active marks on a stack. Text nodes become runs tagged with the
//! current stack; mark tags push on entry and pop on exit. The walk keeps its own work stack,
//! so nesting depth is bounded by memory rather than by the thread's stack.

use super::{InlineRun, Mark, MarkKind, RichText, BREAK_TAG, LINE_TAGS, STRIPPED_TAGS};
use crate::dom;
use markup5ever_rcdom::{Handle, NodeData};

/// Decode the children of an element.
pub fn decode_children(node: &Handle) -> RichText {
    let children = node.children.borrow();
    decode_nodes(children.iter())
}

/// Decode a sequence of sibling nodes.
pub fn decode_nodes<'a>(nodes: impl IntoIterator<Item = &'a Handle>) -> RichText {
    let mut decoder = Decoder::default();
    for node in nodes {
        decoder.walk(node);
    }
    decoder.finish()
}

enum Step {
    Enter(Handle),
    PopMark,
    EndLine,
}

#[derive(Default)]
struct Decoder {
    marks: Vec<Mark>,
    runs: Vec<InlineRun>,
    /// Lines closed by block-level tags; empty while the text is a single line.
    lines: Vec<Vec<InlineRun>>,
}

impl Decoder {
    fn walk(&mut self, root: &Handle) {
        let mut stack = vec![Step::Enter(root.clone())];

        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Enter(node) => node,
                Step::PopMark => {
                    self.marks.pop();
                    continue;
                }
                Step::EndLine => {
                    self.end_line();
                    continue;
                }
            };

            match &node.data {
                NodeData::Text { contents } => {
                    // Newlines in source text are formatting, not breaks
                    let text = contents.borrow().replace(['\n', '\r'], " ");
                    self.push_text(text);
                }
                NodeData::Element { name, .. } => {
                    let tag = &*name.local;
                    if tag == BREAK_TAG {
                        self.push_text("\n".to_string());
                        continue;
                    }
                    if STRIPPED_TAGS.contains(&tag) {
                        continue;
                    }

                    if LINE_TAGS.contains(&tag) {
                        self.end_line();
                        stack.push(Step::EndLine);
                    }
                    if let Some(mark) = mark_for(&node, tag) {
                        self.marks.push(mark);
                        stack.push(Step::PopMark);
                    }
                    stack.extend(node.children.borrow().iter().rev().cloned().map(Step::Enter));
                }
                _ => {}
            }
        }
    }

    fn push_text(&mut self, text: String) {
        self.runs.push(InlineRun::new(text, self.marks.clone()));
    }

    fn end_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.runs));
    }

    fn finish(mut self) -> RichText {
        if self.lines.is_empty() {
            return RichText::from_runs(self.runs);
        }
        self.end_line();

        let mut joined: Vec<InlineRun> = Vec::new();
        let lines = self
            .lines
            .into_iter()
            .map(|line| RichText::from_runs(line).trimmed())
            .filter(|line| !line.is_empty());
        for (index, line) in lines.enumerate() {
            if index > 0 {
                joined.push(InlineRun::plain("\n"));
            }
            joined.extend(line.runs().iter().cloned());
        }
        RichText::from_runs(joined)
    }
}

fn mark_for(node: &Handle, tag: &str) -> Option<Mark> {
    match MarkKind::from_tag(tag)? {
        MarkKind::Link => dom::non_empty_attr(node, "href").map(Mark::Link),
        MarkKind::Bold => Some(Mark::Bold),
        MarkKind::Italic => Some(Mark::Italic),
        MarkKind::Underline => Some(Mark::Underline),
        MarkKind::Strikethrough => Some(Mark::Strikethrough),
        MarkKind::Code => Some(Mark::Code),
    }
}
