// crates/todo_marker/src/lib.rs

//! The line-oriented marker pass. Independent of any parser: it works on
//! raw text and can never fail.

/// Literal substring that flags a line. Case-sensitive, no word boundary,
/// so `TODOS:` and `TODOLIST` match as well.
pub const TODO_MARKER: &str = "TODO";

/// One line of a code block that contains [`TODO_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFinding {
    /// 1-based, relative to the start of the block.
    pub line: usize,
    /// The whole source line with surrounding whitespace trimmed.
    pub content: String,
}

/// Scans `content` line by line and returns one finding per line that
/// contains the marker, in ascending line order.
pub fn find_todo_markers(content: &str) -> Vec<MarkerFinding> {
    let findings: Vec<MarkerFinding> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(TODO_MARKER))
        .map(|(idx, line)| MarkerFinding {
            line: idx + 1,
            content: line.trim().to_string(),
        })
        .collect();
    log::debug!("{} marker line(s) found", findings.len());
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers() {
        let content = "def foo():\n    return 1\n";
        assert!(find_todo_markers(content).is_empty());
    }

    #[test]
    fn test_marker_lines_are_one_based_and_trimmed() {
        let content = "x = 1\n    # TODO fix this   \ny = 2\n";
        let findings = find_todo_markers(content);
        assert_eq!(
            findings,
            vec![MarkerFinding {
                line: 2,
                content: "# TODO fix this".to_string()
            }]
        );
    }

    #[test]
    fn test_two_markers_on_one_line_yield_one_finding() {
        let findings = find_todo_markers("# TODO: one TODO: two");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn test_substring_match_has_no_word_boundary() {
        let content = "# TODOS: clean up\nTODOLIST = []\n";
        let lines: Vec<usize> = find_todo_markers(content).iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert!(find_todo_markers("# todo: lower case\n# ToDo: mixed").is_empty());
    }

    #[test]
    fn test_line_numbers_strictly_increase() {
        let content = "TODO\n\nTODO\nnothing\n  TODO  \n";
        let lines: Vec<usize> = find_todo_markers(content).iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
        assert!(lines.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_marker_pass_does_not_need_valid_source() {
        let content = "def broken(:\n    # TODO repair the signature\n";
        let findings = find_todo_markers(content);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].content, "# TODO repair the signature");
    }
}
