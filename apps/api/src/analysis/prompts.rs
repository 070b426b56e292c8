// Prompts for the optional LLM-enhanced analysis.

pub const ANALYSIS_SYSTEM: &str = "You are a precise CV reviewer and applicant-tracking-system \
    expert. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Filled with `{target_market}`, `{cv_text}` and `{job_description}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Review the CV below for the {target_market} job market.

Return a JSON object with this exact shape (all scores are integers):
{
  "overallScore": 0-100,
  "atsScore": 40-100,
  "sections": {
    "contact":    { "score": 0-100, "issues": ["..."] },
    "summary":    { "score": 0-100, "issues": ["..."] },
    "experience": { "score": 0-100, "issues": ["..."] },
    "skills":     { "score": 0-100, "issues": ["..."] },
    "education":  { "score": 0-100, "issues": ["..."] }
  },
  "strengths": ["..."],
  "weaknesses": ["..."],
  "suggestions": ["..."],
  "improvements": [
    {
      "id": "section-short-slug",
      "section": "contact|summary|experience|skills|education",
      "severity": "critical|important|nice-to-have",
      "title": "...",
      "description": "...",
      "before": "text quoted from the CV",
      "after": "rewritten text",
      "priority": 1
    }
  ]
}

Rules:
- If a job description is given, "overallScore" is how well the CV fits that job.
  Penalise heavily when the CV and the job are in different industries.
- If no job description is given, "overallScore" is the overall quality of the CV.
- Never invent experience the candidate does not have.

CV:
"""
{cv_text}
"""

Job description:
"""
{job_description}
"""
"#;

pub fn build_analysis_prompt(
    cv_text: &str,
    job_description: Option<&str>,
    target_market: &str,
) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{target_market}", target_market)
        .replace("{job_description}", job_description.unwrap_or("(none provided)"))
        .replace("{cv_text}", cv_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let prompt = build_analysis_prompt("My CV", Some("Chef wanted"), "uk");
        assert!(prompt.contains("for the uk job market"));
        assert!(prompt.contains("My CV"));
        assert!(prompt.contains("Chef wanted"));
        assert!(!prompt.contains("{cv_text}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_prompt_without_job_description() {
        let prompt = build_analysis_prompt("My CV", None, "global");
        assert!(prompt.contains("(none provided)"));
    }
}
