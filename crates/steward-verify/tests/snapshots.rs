//! Diffs over realistic accessibility snapshots.

use steward_verify::{DiffLine, diff_lines, diff_snapshots};

const LOGIN_BEFORE: &str = r#"- document "Sign in"
  - heading "Welcome back" [level=1]
  - textbox "Email" [ref=e3]
  - textbox "Password" [ref=e4]
  - button "Sign in" [ref=e5]
  - link "Forgot password?" [ref=e6]"#;

const LOGIN_AFTER: &str = r#"- document "Sign in"
  - heading "Welcome back" [level=1]
  - alert "Invalid email or password"
  - textbox "Email" [ref=e3]
  - textbox "Password" [ref=e4]
  - button "Sign in" [ref=e5] [disabled]
  - link "Forgot password?" [ref=e6]"#;

#[test]
fn test_validation_error_after_submit() {
    let result = diff_snapshots(LOGIN_BEFORE, LOGIN_AFTER);

    assert!(result.changed);
    assert_eq!(result.additions, 2);
    assert_eq!(result.removals, 1);
    assert_eq!(result.unchanged, 5);
    assert_eq!(result.summary(), "2 additions, 1 removal, 5 unchanged");

    let expected = [
        r#"  - document "Sign in""#,
        r#"    - heading "Welcome back" [level=1]"#,
        r#"+   - alert "Invalid email or password""#,
        r#"    - textbox "Email" [ref=e3]"#,
        r#"    - textbox "Password" [ref=e4]"#,
        r#"-   - button "Sign in" [ref=e5]"#,
        r#"+   - button "Sign in" [ref=e5] [disabled]"#,
        r#"    - link "Forgot password?" [ref=e6]"#,
    ]
    .join("\n");
    assert_eq!(result.diff, expected);
}

#[test]
fn test_no_drift_when_action_had_no_visible_effect() {
    let result = diff_snapshots(LOGIN_BEFORE, LOGIN_BEFORE);
    assert!(!result.changed);
    assert_eq!(result.unchanged, LOGIN_BEFORE.lines().count());
    assert!(result.diff.lines().all(|l| l.starts_with("  ")));
}

#[test]
fn test_reordered_items_keep_the_longest_run() {
    let before = "item \"one\"\nitem \"two\"\nitem \"three\"";
    let after = "item \"three\"\nitem \"one\"\nitem \"two\"";
    let lines = diff_lines(before, after);

    let unchanged: Vec<&str> = lines
        .iter()
        .filter(|l| matches!(l, DiffLine::Unchanged(_)))
        .map(DiffLine::text)
        .collect();
    assert_eq!(unchanged, ["item \"one\"", "item \"two\""]);
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_page_emptied_by_navigation() {
    let result = diff_snapshots(LOGIN_BEFORE, "");
    assert_eq!(result.removals, LOGIN_BEFORE.lines().count());
    assert_eq!(result.additions, 1);
    assert_eq!(result.unchanged, 0);
    assert!(result.diff.ends_with("\n+ "));
}
