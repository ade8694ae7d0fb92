//! Data models for a screening run: input criteria, the per-resume report
//! parsed from the model's reply, and the batch partition returned to the
//! client.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::ExtractionMethod;

/// Placeholder stored when a field cannot be recovered from the model reply.
pub const NOT_FOUND: &str = "Not found";

/// Optional skill lists supplied once per screening run and shared
/// (read-only) across every document in that run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
}

impl ScreeningCriteria {
    /// Builds criteria from the comma-separated form fields of the upload
    /// request. Tokens are trimmed; empty tokens are dropped.
    pub fn from_comma_lists(technical: &str, soft: &str) -> Self {
        Self {
            technical_skills: split_skills(technical),
            soft_skills: split_skills(soft),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical_skills.is_empty() && self.soft_skills.is_empty()
    }
}

fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Coarse three-level fit classification from the model reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Moderate Match")]
    ModerateMatch,
    #[serde(rename = "Weak Match")]
    WeakMatch,
    #[default]
    Unknown,
}

impl Verdict {
    /// Maps a captured verdict line to a variant, case-insensitively.
    /// Anything that names none of the three levels is `Unknown`.
    pub fn from_response_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("strong") {
            Verdict::StrongMatch
        } else if lower.contains("moderate") {
            Verdict::ModerateMatch
        } else if lower.contains("weak") {
            Verdict::WeakMatch
        } else {
            Verdict::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::StrongMatch => "Strong Match",
            Verdict::ModerateMatch => "Moderate Match",
            Verdict::WeakMatch => "Weak Match",
            Verdict::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of one analyzed resume. Missing fields carry sentinel
/// defaults instead of failing; the untouched model reply rides along in
/// `raw_response` for audit display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub candidate_name: String,
    pub match_score: u8,
    pub found_skills: String,
    pub missing_skills: String,
    pub years_experience: String,
    pub education: String,
    pub verdict: Verdict,
    pub raw_response: String,
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self {
            candidate_name: NOT_FOUND.to_string(),
            match_score: 0,
            found_skills: NOT_FOUND.to_string(),
            missing_skills: NOT_FOUND.to_string(),
            years_experience: NOT_FOUND.to_string(),
            education: NOT_FOUND.to_string(),
            verdict: Verdict::Unknown,
            raw_response: String::new(),
        }
    }
}

/// One successfully screened document in the batch result.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenedResume {
    pub filename: String,
    pub extraction_method: ExtractionMethod,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// One document that could not be screened. Surfaced to the client next to
/// the successful reports; never aborts the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub filename: String,
    pub error: String,
}

/// The batch partition: reports sorted by descending match score, plus the
/// per-document failure records.
#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub analyzed: usize,
    pub total: usize,
    pub results: Vec<ScreenedResume>,
    pub failures: Vec<FailedDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_from_comma_lists_trims_and_drops_empty() {
        let criteria = ScreeningCriteria::from_comma_lists(" Python , SQL ,, ", "Leadership");
        assert_eq!(criteria.technical_skills, vec!["Python", "SQL"]);
        assert_eq!(criteria.soft_skills, vec!["Leadership"]);
    }

    #[test]
    fn test_criteria_blank_fields_are_empty() {
        let criteria = ScreeningCriteria::from_comma_lists("", "   ");
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_verdict_from_response_text() {
        assert_eq!(Verdict::from_response_text("Strong Match"), Verdict::StrongMatch);
        assert_eq!(Verdict::from_response_text("moderate match"), Verdict::ModerateMatch);
        assert_eq!(Verdict::from_response_text("WEAK MATCH"), Verdict::WeakMatch);
        assert_eq!(Verdict::from_response_text("outstanding"), Verdict::Unknown);
    }

    #[test]
    fn test_verdict_serializes_as_display_string() {
        let json = serde_json::to_string(&Verdict::StrongMatch).unwrap();
        assert_eq!(json, r#""Strong Match""#);
        let back: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Verdict::StrongMatch);
    }

    #[test]
    fn test_report_defaults_are_sentinels() {
        let report = AnalysisReport::default();
        assert_eq!(report.candidate_name, NOT_FOUND);
        assert_eq!(report.match_score, 0);
        assert_eq!(report.years_experience, NOT_FOUND);
        assert_eq!(report.verdict, Verdict::Unknown);
    }
}
