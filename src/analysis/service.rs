use log::{debug, info, warn};
use std::sync::Arc;

use crate::ai::{CompletionClient, CompletionRequest, PromptBuilder, ResponseExtractor};
use crate::analysis::{AnalysisError, AnalysisRequest, AnalysisResponse};
use crate::config::Settings;

/// Runs one analysis: prompt, a single completion call, extraction.
///
/// Holds no per-request state, so one instance is shared by every handler.
pub struct AnalysisService {
    client: Arc<dyn CompletionClient>,
    prompts: PromptBuilder,
    extractor: ResponseExtractor,
    temperature: f32,
    max_tokens: u32,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn CompletionClient>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            client,
            prompts: PromptBuilder::new(),
            extractor: ResponseExtractor::new(),
            temperature,
            max_tokens,
        }
    }

    pub fn from_settings(client: Arc<dyn CompletionClient>, settings: &Settings) -> Self {
        Self::new(client, settings.model.temperature, settings.model.max_tokens)
    }

    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, AnalysisError> {
        debug!("Building prompt for company: {}", request.company_name);
        let prompt = self.prompts.build(request);

        let completion = self
            .client
            .complete(&CompletionRequest {
                system: prompt.system,
                user: prompt.user,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .await
            .map_err(AnalysisError::Upstream)?;

        let extraction = self.extractor.extract(&completion).map_err(|e| {
            warn!("Rejected model response ({} error): {e}", e.kind());
            debug!("Rejected completion text: {completion}");
            AnalysisError::from(e)
        })?;

        info!(
            "Analysis for {} produced {} competitors",
            request.company_name,
            extraction.structured.top_competitors.len()
        );

        Ok(AnalysisResponse {
            generated_output: extraction.analysis,
            structured_data: extraction.structured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ExtractError, JSON_END_MARKER, JSON_START_MARKER};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn replying(text: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.into()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            self.reply.clone().map_err(|m| anyhow::anyhow!(m))
        }
    }

    fn completion(analysis: &str, body: &str) -> String {
        format!("{analysis}\n{JSON_START_MARKER}\n{body}\n{JSON_END_MARKER}")
    }

    #[tokio::test]
    async fn successful_analysis_passes_settings_through() {
        let client = ScriptedClient::replying(completion(
            "Acme faces strong competition.",
            r#"{"top_competitors":[{"name":"Competitor A","strengths":["Brand"],"weaknesses":["Legacy tech"],"loyalty_program_features":["Points"]}]}"#,
        ));
        let service = AnalysisService::new(client.clone(), 0.3, 512);

        let response = service
            .analyze(&AnalysisRequest::new("Acme Rewards").with_feedback("Be brief"))
            .await
            .unwrap();

        assert_eq!(response.generated_output, "Acme faces strong competition.");
        assert_eq!(
            response.structured_data.top_competitors[0].name,
            "Competitor A"
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let sent = client.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.temperature, 0.3);
        assert_eq!(sent.max_tokens, 512);
        assert!(sent.user.contains("Acme Rewards"));
        assert!(sent.user.contains("Be brief"));
        assert!(sent.system.contains(JSON_START_MARKER));
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let client = ScriptedClient::failing("503 Service Unavailable");
        let service = AnalysisService::new(client.clone(), 0.7, 2000);

        let err = service
            .analyze(&AnalysisRequest::new("Acme"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream(_)));
        assert!(err.to_string().contains("503 Service Unavailable"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_completion_keeps_its_error_kind() {
        let client = ScriptedClient::replying("No markers here.");
        let service = AnalysisService::new(client, 0.7, 2000);

        let err = service
            .analyze(&AnalysisRequest::new("Acme"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Extraction(ExtractError::MissingStartMarker)
        ));
    }
}
