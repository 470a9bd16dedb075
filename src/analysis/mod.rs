pub mod error;
pub mod model;
pub mod service;

pub use error::AnalysisError;
pub use model::{
    AnalysisRequest, AnalysisResponse, Competitor, CurrentPromptData, GenerateRequest,
    StructuredResult,
};
pub use service::AnalysisService;
