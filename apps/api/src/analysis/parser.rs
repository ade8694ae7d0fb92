//! Turns the model's numbered-list reply into an `AnalysisReport`.
//!
//! Parsing is total: every field is matched independently, and a missing or
//! malformed field falls back to its sentinel default without disturbing
//! the others.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::report::{AnalysisReport, Verdict};

/// Reply-format seam. `AppState` carries an `Arc<dyn ResponseGrammar>` so a
/// structured-output grammar (e.g. a JSON-mode endpoint) can replace the
/// line-pattern default without touching the pipeline contracts.
pub trait ResponseGrammar: Send + Sync {
    fn parse(&self, response: &str) -> AnalysisReport;
}

/// Default grammar for the numbered seven-field reply format requested by
/// the analysis prompt.
pub struct NumberedListGrammar;

struct FieldPatterns {
    name: Regex,
    score: Regex,
    found_skills: Regex,
    missing_skills: Regex,
    experience: Regex,
    education: Regex,
    verdict: Regex,
}

/// One line-anchored, case-insensitive pattern per field, capturing the
/// remainder of the labeled line. Order-insensitive: each is searched over
/// the whole reply.
fn patterns() -> &'static FieldPatterns {
    static PATTERNS: OnceLock<FieldPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FieldPatterns {
        name: field(1, "Candidate Name"),
        score: Regex::new(r"(?im)^\s*2\.\s*Match Score:\s*(\d+)").expect("valid score pattern"),
        found_skills: field(3, "Key Skills Found"),
        missing_skills: field(4, "Missing Skills"),
        experience: field(5, "Years of Experience"),
        education: field(6, "Education"),
        verdict: field(7, "Verdict"),
    })
}

fn field(index: u8, label: &str) -> Regex {
    Regex::new(&format!(r"(?im)^\s*{index}\.\s*{label}:\s*(.+)$")).expect("valid field pattern")
}

fn capture(re: &Regex, response: &str) -> Option<String> {
    re.captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ResponseGrammar for NumberedListGrammar {
    fn parse(&self, response: &str) -> AnalysisReport {
        let p = patterns();
        let mut report = AnalysisReport {
            raw_response: response.to_string(),
            ..Default::default()
        };

        if let Some(name) = capture(&p.name, response) {
            report.candidate_name = name;
        }

        // Non-numeric or out-of-range captures coerce to 0, never an error.
        report.match_score = capture(&p.score, response)
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|score| *score <= 100)
            .map(|score| score as u8)
            .unwrap_or(0);

        if let Some(skills) = capture(&p.found_skills, response) {
            report.found_skills = skills;
        }
        if let Some(skills) = capture(&p.missing_skills, response) {
            report.missing_skills = skills;
        }
        if let Some(years) = capture(&p.experience, response) {
            report.years_experience = years;
        }
        if let Some(education) = capture(&p.education, response) {
            report.education = education;
        }
        if let Some(verdict) = capture(&p.verdict, response) {
            report.verdict = Verdict::from_response_text(&verdict);
        }

        report
    }
}
