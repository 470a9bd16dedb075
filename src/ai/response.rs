use log::debug;
use thiserror::Error;

use crate::ai::prompt::{JSON_END_MARKER, JSON_START_MARKER};
use crate::analysis::StructuredResult;

/// Ways a completion can break the marker contract.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model response is missing the [JSON_START] marker")]
    MissingStartMarker,
    #[error("model response is missing the [JSON_END] marker")]
    MissingEndMarker,
    #[error("[JSON_END] marker appears before [JSON_START]")]
    MisplacedEndMarker,
    #[error("structured section is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("structured section does not match the competitor schema: {0}")]
    Schema(#[source] serde_json::Error),
}

impl ExtractError {
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MissingStartMarker | Self::MissingEndMarker | Self::MisplacedEndMarker
        )
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingStartMarker | Self::MissingEndMarker | Self::MisplacedEndMarker => {
                "format"
            }
            Self::Parse(_) => "parse",
            Self::Schema(_) => "schema",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub analysis: String,
    pub structured: StructuredResult,
}

pub struct ResponseExtractor;

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Splits a raw completion into the free-text analysis and the validated
    /// competitor data found between the markers.
    pub fn extract(&self, raw: &str) -> Result<Extraction, ExtractError> {
        let (analysis, body) = Self::split_sections(raw)?;
        let body = Self::strip_code_fence(body);
        debug!("Structured section length: {}", body.len());

        let document: serde_json::Value =
            serde_json::from_str(body).map_err(ExtractError::Parse)?;
        let structured: StructuredResult =
            serde_json::from_value(document).map_err(ExtractError::Schema)?;

        Ok(Extraction {
            analysis: analysis.to_string(),
            structured,
        })
    }

    fn split_sections(raw: &str) -> Result<(&str, &str), ExtractError> {
        let start = raw.find(JSON_START_MARKER).ok_or_else(|| {
            if raw.contains(JSON_END_MARKER) {
                ExtractError::MisplacedEndMarker
            } else {
                ExtractError::MissingStartMarker
            }
        })?;

        let analysis = &raw[..start];
        if analysis.contains(JSON_END_MARKER) {
            return Err(ExtractError::MisplacedEndMarker);
        }

        let after_start = &raw[start + JSON_START_MARKER.len()..];
        let end = after_start
            .find(JSON_END_MARKER)
            .ok_or(ExtractError::MissingEndMarker)?;

        Ok((analysis.trim(), after_start[..end].trim()))
    }

    /// Models sometimes wrap the block in a Markdown fence despite instructions.
    fn strip_code_fence(body: &str) -> &str {
        let Some(rest) = body.strip_prefix("```") else {
            return body;
        };
        let Some(rest) = rest.strip_suffix("```") else {
            return body;
        };
        // Drop an info string such as `json` on the opening fence line
        match rest.find('\n') {
            Some(newline) if !rest[..newline].trim_start().starts_with('{') => {
                rest[newline + 1..].trim()
            }
            _ => rest.trim(),
        }
    }
}
