pub mod image_client;

use crate::{error::Result, models::GenerationConfig};
use async_trait::async_trait;

pub use image_client::GeminiImageClient;

/// The outbound side of a generation: one config in, data URIs out.
///
/// Implementations issue exactly one upstream call per invocation and do
/// not retry, cache or translate upstream failures.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, config: &GenerationConfig) -> Result<Vec<String>>;
}
