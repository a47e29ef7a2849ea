// crates/format_report/src/lib.rs

use analyze_code_block::AnalysisResult;

pub const REPORT_HEADER: &str = "🔍 Code Analysis Results";
/// Header used when neither pass found anything.
pub const CLEAN_REPORT_HEADER: &str = "🔍 Code Analysis Results: the code looks complete! 🎉";
pub const MARKERS_LABEL: &str = "📝 TODO comments found:";
pub const NO_MARKERS: &str = "✅ No TODO comments found.";
pub const INCOMPLETE_LABEL: &str = "⚠️ Incomplete functions found:";
pub const NO_INCOMPLETE: &str = "✅ No incomplete functions found.";

/// Renders one block's findings as reply text: header, marker section,
/// blank line, incomplete-function section. A clean result says so in the
/// header.
pub fn format_report(result: &AnalysisResult) -> String {
    let mut report = String::new();
    report.push_str(if result.is_clean() {
        CLEAN_REPORT_HEADER
    } else {
        REPORT_HEADER
    });
    report.push('\n');

    if result.markers.is_empty() {
        report.push_str(NO_MARKERS);
        report.push('\n');
    } else {
        report.push_str(MARKERS_LABEL);
        report.push('\n');
        for marker in &result.markers {
            report.push_str(&format!("- Line {}: {}\n", marker.line, marker.content));
        }
    }

    report.push('\n');

    if result.incomplete_functions.is_empty() {
        report.push_str(NO_INCOMPLETE);
    } else {
        report.push_str(INCOMPLETE_LABEL);
        for func in &result.incomplete_functions {
            report.push_str(&format!("\n- {} (Line {})", func.name, func.line));
        }
    }
    report
}
