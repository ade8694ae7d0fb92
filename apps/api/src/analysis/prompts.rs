// Prompt constants for resume analysis. The numbered output format is a
// contract shared with `analysis::parser` — change them together.

/// Criteria description used when neither skill list is provided.
pub const GENERAL_EVALUATION: &str = "General skills and qualifications assessment";

/// Analysis prompt template. Replace `{resume_text}` and `{criteria}`
/// before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert AI HR assistant. Analyze the resume against the following criteria.
Return the results strictly in this format:

1. Candidate Name: [Full Name]
2. Match Score: [0-100]
3. Key Skills Found: [comma-separated list]
4. Missing Skills: [comma-separated list]
5. Years of Experience: [total years]
6. Education: [highest qualification]
7. Verdict: Strong Match / Moderate Match / Weak Match

DO NOT include any extra text or explanation. Follow this exact format.

Resume:
{resume_text}

Criteria to Match Against:
{criteria}"#;
