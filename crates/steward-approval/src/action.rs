//! Browser action classification.
//!
//! Every action the automation driver understands maps to exactly one
//! category. Policies and confirmation lists are written in terms of
//! categories, never individual action names, so adding a new action to the
//! driver only requires one new row here.
//!
//! Actions that manage the automation session itself (lifecycle, tab and
//! frame bookkeeping, tracing, recording, emulation settings) belong to the
//! [`INTERNAL_CATEGORY`] and bypass governance entirely.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use serde_json::Value;

use crate::ActionPayload;

/// Category for session meta-operations. Never governed.
pub const INTERNAL_CATEGORY: &str = "_internal";

/// Category for action names missing from the table.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Upper bound on [`describe`] output, in characters.
const MAX_DESCRIPTION_CHARS: usize = 200;

/// How much of an evaluated script is echoed into a prompt.
const MAX_SCRIPT_PREVIEW_CHARS: usize = 80;

/// Placeholder for payload fields the caller did not supply.
const MISSING_FIELD: &str = "<none>";

/// Action name → category.
const ACTION_TABLE: &[(&str, &str)] = &[
    // Navigation
    ("navigate", "navigate"),
    ("back", "navigate"),
    ("forward", "navigate"),
    ("reload", "navigate"),
    ("tab_new", "navigate"),
    // Clicks
    ("click", "click"),
    ("dblclick", "click"),
    ("tap", "click"),
    // Form input
    ("fill", "fill"),
    ("type", "fill"),
    ("keyboard", "fill"),
    ("inserttext", "fill"),
    ("select", "fill"),
    ("multiselect", "fill"),
    ("check", "fill"),
    ("uncheck", "fill"),
    ("clear", "fill"),
    ("selectall", "fill"),
    ("setvalue", "fill"),
    // Transfers
    ("download", "download"),
    ("waitfordownload", "download"),
    ("upload", "upload"),
    // Script execution
    ("evaluate", "eval"),
    ("evalhandle", "eval"),
    ("addscript", "eval"),
    ("addinitscript", "eval"),
    // Capture
    ("snapshot", "snapshot"),
    ("screenshot", "snapshot"),
    ("pdf", "snapshot"),
    ("diff_snapshot", "snapshot"),
    ("diff_screenshot", "snapshot"),
    ("diff_url", "snapshot"),
    // Scrolling
    ("scroll", "scroll"),
    ("scrollintoview", "scroll"),
    // Waiting
    ("wait", "wait"),
    ("waitforurl", "wait"),
    ("waitforloadstate", "wait"),
    ("waitforfunction", "wait"),
    // Reads
    ("gettext", "get"),
    ("content", "get"),
    ("innerhtml", "get"),
    ("innertext", "get"),
    ("inputvalue", "get"),
    ("url", "get"),
    ("title", "get"),
    ("getattribute", "get"),
    ("count", "get"),
    ("boundingbox", "get"),
    ("styles", "get"),
    ("isvisible", "get"),
    ("isenabled", "get"),
    ("ischecked", "get"),
    ("responsebody", "get"),
    // Network interception
    ("route", "network"),
    ("unroute", "network"),
    ("requests", "network"),
    // Persistent state writes
    ("state_save", "state"),
    ("state_load", "state"),
    ("cookies_set", "state"),
    ("storage_set", "state"),
    ("credentials", "state"),
    // Low-level interaction
    ("hover", "interact"),
    ("focus", "interact"),
    ("drag", "interact"),
    ("press", "interact"),
    ("keydown", "interact"),
    ("keyup", "interact"),
    ("mousemove", "interact"),
    ("mousedown", "interact"),
    ("mouseup", "interact"),
    ("wheel", "interact"),
    ("dispatch", "interact"),
    // Semantic locators resolve to a click target.
    ("getbyrole", "click"),
    ("getbytext", "click"),
    ("getbylabel", "click"),
    ("getbyplaceholder", "click"),
    ("getbyalttext", "click"),
    ("getbytitle", "click"),
    ("getbytestid", "click"),
    ("nth", "click"),
    // Session meta-operations
    ("launch", INTERNAL_CATEGORY),
    ("close", INTERNAL_CATEGORY),
    ("tab_list", INTERNAL_CATEGORY),
    ("tab_switch", INTERNAL_CATEGORY),
    ("tab_close", INTERNAL_CATEGORY),
    ("window_new", INTERNAL_CATEGORY),
    ("frame", INTERNAL_CATEGORY),
    ("mainframe", INTERNAL_CATEGORY),
    ("dialog", INTERNAL_CATEGORY),
    ("session", INTERNAL_CATEGORY),
    ("console", INTERNAL_CATEGORY),
    ("errors", INTERNAL_CATEGORY),
    ("cookies_get", INTERNAL_CATEGORY),
    ("cookies_clear", INTERNAL_CATEGORY),
    ("storage_get", INTERNAL_CATEGORY),
    ("storage_clear", INTERNAL_CATEGORY),
    ("state_list", INTERNAL_CATEGORY),
    ("state_show", INTERNAL_CATEGORY),
    ("state_clear", INTERNAL_CATEGORY),
    ("state_clean", INTERNAL_CATEGORY),
    ("state_rename", INTERNAL_CATEGORY),
    ("highlight", INTERNAL_CATEGORY),
    ("bringtofront", INTERNAL_CATEGORY),
    ("trace_start", INTERNAL_CATEGORY),
    ("trace_stop", INTERNAL_CATEGORY),
    ("har_start", INTERNAL_CATEGORY),
    ("har_stop", INTERNAL_CATEGORY),
    ("video_start", INTERNAL_CATEGORY),
    ("video_stop", INTERNAL_CATEGORY),
    ("recording_start", INTERNAL_CATEGORY),
    ("recording_stop", INTERNAL_CATEGORY),
    ("recording_restart", INTERNAL_CATEGORY),
    ("profiler_start", INTERNAL_CATEGORY),
    ("profiler_stop", INTERNAL_CATEGORY),
    ("clipboard", INTERNAL_CATEGORY),
    ("viewport", INTERNAL_CATEGORY),
    ("useragent", INTERNAL_CATEGORY),
    ("device", INTERNAL_CATEGORY),
    ("geolocation", INTERNAL_CATEGORY),
    ("permissions", INTERNAL_CATEGORY),
    ("emulatemedia", INTERNAL_CATEGORY),
    ("offline", INTERNAL_CATEGORY),
    ("headers", INTERNAL_CATEGORY),
    ("addstyle", INTERNAL_CATEGORY),
    ("expose", INTERNAL_CATEGORY),
    ("timezone", INTERNAL_CATEGORY),
    ("locale", INTERNAL_CATEGORY),
    ("pause", INTERNAL_CATEGORY),
    ("setcontent", INTERNAL_CATEGORY),
    ("screencast_start", INTERNAL_CATEGORY),
    ("screencast_stop", INTERNAL_CATEGORY),
    ("input_mouse", INTERNAL_CATEGORY),
    ("input_keyboard", INTERNAL_CATEGORY),
    ("input_touch", INTERNAL_CATEGORY),
];

static CATEGORY_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ACTION_TABLE.iter().copied().collect());

/// Map an action name to its category.
///
/// Total over all inputs: names missing from the table yield
/// [`UNKNOWN_CATEGORY`], which falls through to the policy default.
///
/// # Example
///
/// ```
/// use steward_approval::{classify, INTERNAL_CATEGORY, UNKNOWN_CATEGORY};
///
/// assert_eq!(classify("dblclick"), "click");
/// assert_eq!(classify("trace_start"), INTERNAL_CATEGORY);
/// assert_eq!(classify("teleport"), UNKNOWN_CATEGORY);
/// ```
#[must_use]
pub fn classify(action: &str) -> &'static str {
    CATEGORY_INDEX
        .get(action)
        .copied()
        .unwrap_or(UNKNOWN_CATEGORY)
}

/// Whether an action is a session meta-operation exempt from governance.
#[must_use]
pub fn is_internal(action: &str) -> bool {
    classify(action) == INTERNAL_CATEGORY
}

/// The distinct governable categories, sorted.
///
/// Excludes the internal sentinel; [`UNKNOWN_CATEGORY`] is not listed since
/// no table row produces it.
#[must_use]
pub fn categories() -> Vec<&'static str> {
    ACTION_TABLE
        .iter()
        .map(|(_, category)| *category)
        .filter(|category| *category != INTERNAL_CATEGORY)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Produce a short human-readable summary of an action for a confirmation
/// prompt.
///
/// Never fails and never exceeds 200 characters. Typed values (`fill`) are
/// deliberately not echoed.
#[must_use]
pub fn describe(action: &str, payload: &ActionPayload) -> String {
    let text = match action {
        "navigate" => format!("Navigate to {}", field(payload, "url")),
        "evaluate" | "evalhandle" => {
            let script = field(payload, "script");
            format!(
                "Evaluate JavaScript: {}",
                truncate_chars(&script, MAX_SCRIPT_PREVIEW_CHARS)
            )
        },
        "fill" => format!("Fill {} with value", field(payload, "selector")),
        "type" => format!("Type into {}", field(payload, "selector")),
        "click" | "dblclick" | "tap" => format!("{action} {}", field(payload, "selector")),
        "download" => format!(
            "Download via {} to {}",
            field(payload, "selector"),
            field(payload, "path")
        ),
        "upload" => format!("Upload files to {}", field(payload, "selector")),
        _ => format!("{}: {action}", classify(action)),
    };
    truncate_chars(&text, MAX_DESCRIPTION_CHARS)
}

/// Render a payload field for display.
fn field(payload: &ActionPayload, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => MISSING_FIELD.to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Keep at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_owned(),
        None => text.to_owned(),
    }
}
