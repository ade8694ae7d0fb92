//! Resume text cleanup applied between extraction and analysis.

use std::sync::OnceLock;

use regex::Regex;

/// Characters outside this set are dropped before whitespace collapsing.
/// The allow-list keeps everything a resume needs to stay intelligible:
/// emails, phone-like tokens, bullets, trademark glyphs, and skill
/// punctuation such as `C++`, `CI/CD`, `(AI/ML)`.
fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9\s@.,#&+/()•®©-]").expect("valid character filter"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Collapses whitespace and strips characters outside the allow-list.
/// Total and idempotent; empty input yields empty output.
///
/// Filtering runs before collapsing so that a dropped character never
/// leaves a double space behind.
pub fn normalize(text: &str) -> String {
    let kept = disallowed().replace_all(text, "");
    let collapsed = whitespace_run().replace_all(&kept, " ");
    collapsed.trim().to_string()
}
