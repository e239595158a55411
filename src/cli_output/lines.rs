//! Simple line-based CLI output utilities.

/// Line width for separators.
pub const LINE_WIDTH: usize = 60;

/// Print a section header.
///
/// ```text
/// BATCH CONVERSION
/// ════════════════════════════════════════════════════════════
/// ```
pub fn print_header(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print a closing separator.
pub fn print_footer() {
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print an indented line with a status icon.
///
/// ```text
///   ✓ Server is up
/// ```
pub fn print_step_line(icon: &str, message: &str) {
    println!("  {} {}", icon, message);
}

/// Print indented detail lines.
pub fn print_details(lines: &[String]) {
    for line in lines {
        println!("    {}", line);
    }
}

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "·";
}
