use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisError;

// ============================================================================
// Wire Structures
// ============================================================================

/// Body of `POST /generate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    pub company_name: String,
    /// Opaque bag kept for forward compatibility; not read by the analysis.
    #[serde(default = "empty_object")]
    pub previous_data: Value,
    #[serde(default)]
    pub current_prompt_data: Option<CurrentPromptData>,
    /// Opaque bag kept for forward compatibility; not read by the analysis.
    #[serde(default = "empty_object")]
    pub other_input_data: Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentPromptData {
    pub existing_generated_output: String,
    pub user_feedback: String,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Competitor {
    pub name: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub loyalty_program_features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StructuredResult {
    pub top_competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub generated_output: String,
    pub structured_data: StructuredResult,
}

// ============================================================================
// Validated Request
// ============================================================================

/// A request that passed validation and is ready for prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub company_name: String,
    /// Empty when the caller sent no feedback.
    pub feedback: String,
    pub previous_output: Option<String>,
}

impl AnalysisRequest {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            feedback: String::new(),
            previous_output: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = feedback.into();
        self
    }

    pub fn with_previous_output(mut self, output: impl Into<String>) -> Self {
        self.previous_output = Some(output.into());
        self
    }
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<AnalysisRequest, AnalysisError> {
        let company_name = self.company_name.trim();
        if company_name.is_empty() {
            return Err(AnalysisError::Validation(
                "company_name must not be empty".to_string(),
            ));
        }

        let mut request = AnalysisRequest::new(company_name);
        if let Some(prompt_data) = &self.current_prompt_data {
            request.feedback = prompt_data.user_feedback.trim().to_string();
            let existing = prompt_data.existing_generated_output.trim();
            if !existing.is_empty() {
                request.previous_output = Some(existing.to_string());
            }
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_body_gets_empty_bags() {
        let req: GenerateRequest =
            serde_json::from_value(json!({"company_name": "Acme Rewards"})).unwrap();
        assert_eq!(req.previous_data, json!({}));
        assert_eq!(req.other_input_data, json!({}));
        assert!(req.current_prompt_data.is_none());

        let validated = req.validate().unwrap();
        assert_eq!(validated, AnalysisRequest::new("Acme Rewards"));
    }

    #[test]
    fn opaque_bags_are_kept_verbatim() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "company_name": "Acme",
            "previous_data": {"run": 3, "tags": ["a"]},
            "other_input_data": {"region": "EU"}
        }))
        .unwrap();
        assert_eq!(req.previous_data["run"], 3);
        assert_eq!(req.other_input_data["region"], "EU");
    }

    #[test]
    fn feedback_and_previous_output_are_carried() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "company_name": "  Acme  ",
            "current_prompt_data": {
                "existing_generated_output": "Old analysis.",
                "user_feedback": " focus on airlines "
            }
        }))
        .unwrap();

        let validated = req.validate().unwrap();
        assert_eq!(validated.company_name, "Acme");
        assert_eq!(validated.feedback, "focus on airlines");
        assert_eq!(validated.previous_output.as_deref(), Some("Old analysis."));
    }

    #[test]
    fn blank_company_name_is_rejected() {
        for name in ["", "   ", "\n\t"] {
            let req = GenerateRequest {
                company_name: name.to_string(),
                previous_data: empty_object(),
                current_prompt_data: None,
                other_input_data: empty_object(),
            };
            assert!(matches!(req.validate(), Err(AnalysisError::Validation(_))));
        }
    }

    #[test]
    fn missing_company_name_fails_to_deserialize() {
        let result = serde_json::from_value::<GenerateRequest>(json!({"previous_data": {}}));
        assert!(result.is_err());
    }
}
