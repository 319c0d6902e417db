//! Line alignment on top of `diffy`'s Myers diff.

use diffy::{DiffOptions, Line};

use crate::diff::DiffLine;

/// Align `before` against `after`, both split on `\n`.
///
/// The common subsequence is maximal, and inside every changed block the
/// removals come before the additions.
pub(crate) fn align(before: &str, after: &str) -> Vec<DiffLine> {
    // With a `\n` after every line, including the last and an empty one,
    // diffy's lines are exactly those of a plain `\n` split.
    let before = format!("{before}\n");
    let after = format!("{after}\n");

    // Context covering the whole text folds every change into one hunk that
    // carries the unchanged lines too.
    let mut options = DiffOptions::new();
    options.set_context_len(line_count(&before).max(line_count(&after)));
    let patch = options.create_patch(&before, &after);

    let lines = match patch.hunks() {
        [] => before
            .split_terminator('\n')
            .map(|line| DiffLine::Unchanged(line.to_owned()))
            .collect(),
        hunks => hunks
            .iter()
            .flat_map(|hunk| hunk.lines())
            .map(to_diff_line)
            .collect(),
    };

    removals_first(lines)
}

fn line_count(text: &str) -> usize {
    text.matches('\n').count()
}

fn to_diff_line(line: &Line<'_, str>) -> DiffLine {
    match *line {
        Line::Context(text) => DiffLine::Unchanged(strip_newline(text)),
        Line::Delete(text) => DiffLine::Removed(strip_newline(text)),
        Line::Insert(text) => DiffLine::Added(strip_newline(text)),
    }
}

fn strip_newline(text: &str) -> String {
    text.strip_suffix('\n').unwrap_or(text).to_owned()
}

/// Move the additions of each changed block behind its removals.
fn removals_first(lines: Vec<DiffLine>) -> Vec<DiffLine> {
    let mut ordered = Vec::with_capacity(lines.len());
    let mut added = Vec::new();

    for line in lines {
        match line {
            DiffLine::Removed(_) => ordered.push(line),
            DiffLine::Added(_) => added.push(line),
            DiffLine::Unchanged(_) => {
                ordered.append(&mut added);
                ordered.push(line);
            },
        }
    }
    ordered.append(&mut added);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(lines: &[DiffLine]) -> (usize, usize, usize) {
        lines.iter().fold((0, 0, 0), |(eq, del, ins), line| match line {
            DiffLine::Unchanged(_) => (eq + 1, del, ins),
            DiffLine::Removed(_) => (eq, del + 1, ins),
            DiffLine::Added(_) => (eq, del, ins + 1),
        })
    }

    /// Lines of each side, recovered from the alignment.
    fn sides(lines: &[DiffLine]) -> (Vec<&str>, Vec<&str>) {
        let before = lines
            .iter()
            .filter(|l| !matches!(l, DiffLine::Added(_)))
            .map(DiffLine::text)
            .collect();
        let after = lines
            .iter()
            .filter(|l| !matches!(l, DiffLine::Removed(_)))
            .map(DiffLine::text)
            .collect();
        (before, after)
    }

    #[test]
    fn test_identical() {
        let lines = align("a\nb\nc", "a\nb\nc");
        assert_eq!(counts(&lines), (3, 0, 0));
    }

    #[test]
    fn test_replacement_removes_first() {
        assert_eq!(
            align("x", "y"),
            vec![DiffLine::Removed("x".to_owned()), DiffLine::Added("y".to_owned())]
        );
    }

    #[test]
    fn test_disjoint_never_pairs() {
        let lines = align("a\nb\nc", "x\ny\nz");
        assert_eq!(counts(&lines), (0, 3, 3));
        assert!(matches!(lines[0], DiffLine::Removed(_)));
    }

    #[test]
    fn test_finds_longest_common_subsequence() {
        let lines = align("A\nB\nC\nA\nB\nB\nA", "C\nB\nA\nB\nA\nC");
        assert_eq!(counts(&lines), (4, 3, 2));

        let (before, after) = sides(&lines);
        assert_eq!(before, ["A", "B", "C", "A", "B", "B", "A"]);
        assert_eq!(after, ["C", "B", "A", "B", "A", "C"]);
    }

    #[test]
    fn test_shifted_block_is_matched() {
        let lines = align("p\nq\nr", "new\np\nq\nr");
        assert_eq!(lines[0], DiffLine::Added("new".to_owned()));
        assert_eq!(counts(&lines), (3, 0, 1));
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(align("", ""), vec![DiffLine::Unchanged(String::new())]);
        assert_eq!(counts(&align("", "a\nb")), (0, 1, 2));
        assert_eq!(counts(&align("a\nb", "")), (0, 2, 1));
    }

    #[test]
    fn test_trailing_newline_is_an_empty_line() {
        assert_eq!(
            align("a\n", "a"),
            vec![DiffLine::Unchanged("a".to_owned()), DiffLine::Removed(String::new())]
        );
    }

    #[test]
    fn test_removals_first_keeps_blocks_apart() {
        let reordered = removals_first(vec![
            DiffLine::Added("1".to_owned()),
            DiffLine::Removed("2".to_owned()),
            DiffLine::Unchanged("3".to_owned()),
            DiffLine::Added("4".to_owned()),
            DiffLine::Removed("5".to_owned()),
        ]);
        let rendered: Vec<String> = reordered.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["- 2", "+ 1", "  3", "- 5", "+ 4"]);
    }
}
