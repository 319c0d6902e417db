//! CLI theme and styling.

use colored::Colorize;
use steward_approval::PolicyDecision;
use steward_verify::DiffLine;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a key-value pair.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Format a policy decision.
    pub(crate) fn decision(decision: PolicyDecision) -> String {
        let label = decision.to_string();
        match decision {
            PolicyDecision::Allow => label.green().bold().to_string(),
            PolicyDecision::Deny => label.red().bold().to_string(),
            PolicyDecision::Confirm => label.yellow().bold().to_string(),
        }
    }

    /// Format one line of a snapshot diff.
    pub(crate) fn diff_line(line: &DiffLine) -> String {
        let text = line.to_string();
        match line {
            DiffLine::Added(_) => text.green().to_string(),
            DiffLine::Removed(_) => text.red().to_string(),
            DiffLine::Unchanged(_) => text.dimmed().to_string(),
        }
    }

    /// Format a box around text using box-drawing characters.
    pub(crate) fn approval_box(title: &str, content: &str) -> String {
        let width: usize = 60;
        let inner = width.saturating_sub(2);
        let top = format!("╭{}╮", "─".repeat(inner)).yellow().to_string();
        let bottom = format!("╰{}╯", "─".repeat(inner)).yellow().to_string();
        let empty = format!("│{:w$}│", "", w = inner).yellow().to_string();

        let pad_line = |text: &str| -> String {
            // Strip ANSI for length calculation
            let visible_len = strip_ansi(text).chars().count();
            let padding = width.saturating_sub(4).saturating_sub(visible_len);
            format!("│ {text}{:p$} │", "", p = padding)
        };

        let mut lines = vec![top, pad_line(&title.bold().to_string()), empty];
        for line in content.lines() {
            lines.push(pad_line(line));
        }
        lines.push(bottom);
        lines.join("\n")
    }
}

/// Strip ANSI escape codes from a string for visible-length calculation.
fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            result.push(c);
        }
    }
    result
}
