pub mod config;
pub mod data_uri;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod workflow;

pub use config::{GeminiConfig, StudioConfig};
pub use error::{Result, StudioError};
pub use gemini::{GeminiImageClient, ImageGenerator};
pub use models::{
    AspectRatio, GeneratedImage, GenerationConfig, ImageModel, ModelInfo, ModelTier,
    ReferenceFile,
};
pub use workflow::{
    AttachmentList, GenerationController, SubmitOutcome, WorkflowState, MAX_REFERENCE_FILES,
};
