use crate::analysis::AnalysisRequest;

pub const JSON_START_MARKER: &str = "[JSON_START]";
pub const JSON_END_MARKER: &str = "[JSON_END]";

const SYSTEM_INSTRUCTION: &str = r#"You are a competitive analysis expert specializing in customer loyalty programs.

Given a company, identify its top competitors and compare their loyalty programs: market position, strengths, weaknesses and the concrete features each program offers.

RESPONSE FORMAT - Your answer MUST have exactly two parts:
1. A natural-language analysis written for a business audience.
2. A JSON object enclosed between the markers [JSON_START] and [JSON_END], shaped exactly like this:

[JSON_START]
{
  "top_competitors": [
    {
      "name": "Competitor name",
      "strengths": ["strength", "..."],
      "weaknesses": ["weakness", "..."],
      "loyalty_program_features": ["feature", "..."]
    }
  ]
}
[JSON_END]

Rules for the JSON part:
- Every competitor must have all four fields; use an empty list when nothing applies
- All list entries are plain strings
- Do not use the markers anywhere else in the answer
- Do not add comments or trailing commas"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub struct PromptBuilder;

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    pub fn user_instruction(
        &self,
        company_name: &str,
        feedback: &str,
        previous_output: Option<&str>,
    ) -> String {
        let mut prompt = format!(
            "Analyze the top competitors of {company_name} and their loyalty programs."
        );

        let feedback = feedback.trim();
        if !feedback.is_empty() {
            // Previous output only matters as context for a revision
            if let Some(previous) = previous_output.filter(|p| !p.trim().is_empty()) {
                prompt.push_str("\n\nPrevious analysis:\n");
                prompt.push_str(previous.trim());
            }
            prompt.push_str(&format!("\n\nPlease incorporate this feedback: {feedback}"));
        }

        prompt
    }

    pub fn build(&self, request: &AnalysisRequest) -> Prompt {
        Prompt {
            system: self.system_instruction().to_string(),
            user: self.user_instruction(
                &request.company_name,
                &request.feedback,
                request.previous_output.as_deref(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_names_both_markers() {
        let system = PromptBuilder::new().system_instruction();
        assert!(system.contains(JSON_START_MARKER));
        assert!(system.contains(JSON_END_MARKER));
        assert!(system.contains("loyalty_program_features"));
        assert!(system.find(JSON_START_MARKER) < system.find(JSON_END_MARKER));
    }

    #[test]
    fn no_feedback_means_no_feedback_clause() {
        let builder = PromptBuilder::new();
        for name in ["Acme Rewards", "Café \"Ñ\" & Co.", "{company}"] {
            let user = builder.user_instruction(name, "", None);
            assert!(user.contains(name));
            assert!(!user.contains("feedback"));
        }
    }

    #[test]
    fn whitespace_feedback_counts_as_empty() {
        let user = PromptBuilder::new().user_instruction("Acme", "  \n ", Some("old"));
        assert!(!user.contains("feedback"));
        assert!(!user.contains("old"));
    }

    #[test]
    fn feedback_is_appended_verbatim() {
        let user = PromptBuilder::new().user_instruction("Acme", "Focus on airlines", None);
        assert!(user.contains("Acme"));
        assert!(user.contains("Please incorporate this feedback: Focus on airlines"));
        assert!(user.find("Acme") < user.find("Focus on airlines"));
    }

    #[test]
    fn previous_output_precedes_feedback_on_revision() {
        let user = PromptBuilder::new().user_instruction(
            "Acme",
            "Add more detail",
            Some("Acme leads in retail."),
        );
        let previous = user.find("Acme leads in retail.").unwrap();
        let feedback = user.find("Add more detail").unwrap();
        assert!(previous < feedback);
    }

    #[test]
    fn build_uses_request_fields() {
        let request = AnalysisRequest::new("Acme").with_feedback("shorter");
        let prompt = PromptBuilder::new().build(&request);
        assert_eq!(prompt.system, SYSTEM_INSTRUCTION);
        assert!(prompt.user.contains("Acme"));
        assert!(prompt.user.contains("shorter"));
    }
}
