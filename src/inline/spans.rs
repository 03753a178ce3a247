//! Runs → nested span tree
//!
//! The flat run list is folded into a tree one precedence level at a time: at each level,
//! maximal stretches of runs that share the level's mark become one element whose children are
//! built from the next level down. Runs without the mark are passed to the next level as-is.
//!
//! ```text
//! [A{bold}] [B{bold,italic}] [C{italic}]
//!
//! strong ─┬─ "A"          em ── "C"
//!         └─ em ── "B"
//! ```

use super::{InlineRun, Mark, PRECEDENCE};

#[derive(Debug, PartialEq)]
pub(crate) enum Span<'a> {
    Text(&'a str),
    Marked {
        mark: &'a Mark,
        children: Vec<Span<'a>>,
    },
}

/// Build the span tree for normalized runs.
pub(crate) fn build(runs: &[InlineRun]) -> Vec<Span<'_>> {
    nest(runs, 0)
}

fn nest(runs: &[InlineRun], level: usize) -> Vec<Span<'_>> {
    let Some(&kind) = PRECEDENCE.get(level) else {
        return runs.iter().map(|run| Span::Text(&run.text)).collect();
    };

    let mut spans = Vec::new();
    let mut start = 0;

    while start < runs.len() {
        let current = runs[start].mark_of(kind);
        let len = runs[start..]
            .iter()
            .position(|run| run.mark_of(kind) != current)
            .unwrap_or(runs.len() - start);
        let group = &runs[start..start + len];

        match current {
            Some(mark) => spans.push(Span::Marked {
                mark,
                children: nest(group, level + 1),
            }),
            None => spans.extend(nest(group, level + 1)),
        }

        start += len;
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_runs_are_text() {
        let runs = vec![InlineRun::plain("a")];
        assert_eq!(build(&runs), vec![Span::Text("a")]);
    }

    #[test]
    fn shared_mark_groups_runs() {
        let runs = vec![
            InlineRun::new("A", vec![Mark::Bold]),
            InlineRun::new("B", vec![Mark::Bold, Mark::Italic]),
            InlineRun::new("C", vec![Mark::Italic]),
        ];
        assert_eq!(
            build(&runs),
            vec![
                Span::Marked {
                    mark: &Mark::Bold,
                    children: vec![
                        Span::Text("A"),
                        Span::Marked {
                            mark: &Mark::Italic,
                            children: vec![Span::Text("B")],
                        },
                    ],
                },
                Span::Marked {
                    mark: &Mark::Italic,
                    children: vec![Span::Text("C")],
                },
            ]
        );
    }

    #[test]
    fn link_is_outermost() {
        let runs = vec![InlineRun::new("x", vec![Mark::Code, Mark::link("/a")])];
        let spans = build(&runs);
        match &spans[0] {
            Span::Marked { mark, children } => {
                assert_eq!(*mark, &Mark::link("/a"));
                assert!(matches!(
                    &children[0],
                    Span::Marked { mark: Mark::Code, .. }
                ));
            }
            other => panic!("expected link span, got {:?}", other),
        }
    }

    #[test]
    fn different_links_do_not_merge() {
        let runs = vec![
            InlineRun::new("a", vec![Mark::link("/a")]),
            InlineRun::new("b", vec![Mark::link("/b")]),
        ];
        assert_eq!(build(&runs).len(), 2);
    }
}
