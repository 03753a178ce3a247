//! Run normalization
//!
//! After normalization:
//! - no run has empty text
//! - each run's marks are sorted by precedence and free of duplicates
//! - a run carries at most one link, and never one with a blank href
//! - no two adjacent runs carry the same marks

use super::{InlineRun, Mark};
use std::collections::BTreeSet;

pub(crate) fn normalize(runs: impl IntoIterator<Item = InlineRun>) -> Vec<InlineRun> {
    let mut normalized: Vec<InlineRun> = Vec::new();

    for mut run in runs {
        if run.text.is_empty() {
            continue;
        }
        run.marks = normalize_marks(run.marks);

        match normalized.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => normalized.push(run),
        }
    }

    normalized
}

fn normalize_marks(marks: Vec<Mark>) -> Vec<Mark> {
    let mut set = BTreeSet::new();
    let mut has_link = false;

    for mark in marks {
        if let Mark::Link(href) = &mark {
            // First link wins
            if has_link || href.trim().is_empty() {
                continue;
            }
            has_link = true;
        }
        set.insert(mark);
    }

    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_empty_runs() {
        let runs = normalize(vec![InlineRun::plain(""), InlineRun::plain("a")]);
        assert_eq!(runs, vec![InlineRun::plain("a")]);
    }

    #[test]
    fn merges_adjacent_runs_with_same_marks() {
        let runs = normalize(vec![
            InlineRun::new("a", vec![Mark::Bold, Mark::Italic]),
            InlineRun::new("b", vec![Mark::Italic, Mark::Bold]),
            InlineRun::plain("c"),
        ]);
        assert_eq!(
            runs,
            vec![
                InlineRun::new("ab", vec![Mark::Bold, Mark::Italic]),
                InlineRun::plain("c"),
            ]
        );
    }

    #[test]
    fn sorts_and_dedups_marks() {
        let runs = normalize(vec![InlineRun::new(
            "x",
            vec![Mark::Code, Mark::Bold, Mark::link("/a"), Mark::Bold],
        )]);
        assert_eq!(runs[0].marks, vec![Mark::link("/a"), Mark::Bold, Mark::Code]);
    }

    #[test]
    fn keeps_first_link_only() {
        let runs = normalize(vec![InlineRun::new(
            "x",
            vec![Mark::link("/first"), Mark::link("/second")],
        )]);
        assert_eq!(runs[0].marks, vec![Mark::link("/first")]);
    }

    #[test]
    fn drops_blank_links() {
        let runs = normalize(vec![InlineRun::new("x", vec![Mark::link("  ")])]);
        assert_eq!(runs, vec![InlineRun::plain("x")]);
    }
}
