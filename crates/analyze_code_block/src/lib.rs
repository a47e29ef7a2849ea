// crates/analyze_code_block/src/lib.rs

use find_incomplete_functions::{
    find_incomplete_functions, find_incomplete_functions_with_parser, PythonParser,
};
use todo_marker::find_todo_markers;

pub use find_incomplete_functions::IncompleteFunction;
pub use todo_marker::MarkerFinding;

/// Findings for a single code block. Built fresh per block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Source-line order.
    pub markers: Vec<MarkerFinding>,
    /// Tree-walk order.
    pub incomplete_functions: Vec<IncompleteFunction>,
}

impl AnalysisResult {
    pub fn is_clean(&self) -> bool {
        self.markers.is_empty() && self.incomplete_functions.is_empty()
    }
}

/// Runs the marker pass and the structural pass over `content`. The two
/// passes share nothing: a block that fails to parse still gets its markers.
pub fn analyze_code_block(content: &str) -> AnalysisResult {
    let markers = find_todo_markers(content);
    let incomplete_functions = find_incomplete_functions(content);
    log::debug!(
        "analysis: {} marker(s), {} incomplete function(s)",
        markers.len(),
        incomplete_functions.len()
    );
    AnalysisResult {
        markers,
        incomplete_functions,
    }
}

/// Same as [`analyze_code_block`] with a caller-supplied parser.
pub fn analyze_code_block_with_parser(
    content: &str,
    parser: &mut impl PythonParser,
) -> AnalysisResult {
    AnalysisResult {
        markers: find_todo_markers(content),
        incomplete_functions: find_incomplete_functions_with_parser(content, parser),
    }
}
