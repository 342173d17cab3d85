use crate::{
    config::GeminiConfig,
    data_uri,
    error::{Result, StudioError},
    gemini::ImageGenerator,
    models::{
        Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse,
        GenerationConfig, ImageConfig, Part,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;

#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn build_request_payload(config: &GenerationConfig) -> GenerateContentRequest {
        let mut text = config.prompt.clone();
        if let Some(negative) = config
            .negative_prompt
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        {
            text.push_str("\n\nAvoid: ");
            text.push_str(negative.trim());
        }

        let mut parts = vec![Part::text(text)];
        parts.extend(
            config
                .reference_images
                .iter()
                .map(|reference| Part::inline(&reference.mime_type, STANDARD.encode(&reference.bytes))),
        );

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GeminiGenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: config.aspect_ratio.as_str().to_string(),
                },
            },
        }
    }

    pub(crate) fn extract_images(response: &GenerateContentResponse) -> Vec<String> {
        response
            .inline_images()
            .map(|(mime_type, data)| data_uri::from_base64(mime_type, data))
            .collect()
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate(&self, config: &GenerationConfig) -> Result<Vec<String>> {
        let api_key = self.config.resolve_api_key()?;

        if let Some(n) = config.num_images.filter(|n| *n > 1) {
            log::warn!(
                "{} images requested; the endpoint decides how many it returns",
                n
            );
        }

        let payload = Self::build_request_payload(config);
        let url = self.config.endpoint_for(config.model);

        log::info!(
            "Generating image with model: {} ({})",
            config.model,
            config.aspect_ratio
        );
        log::debug!(
            "Request carries {} part(s), {} reference image(s)",
            payload.contents[0].parts.len(),
            config.reference_images.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            log::error!("Image endpoint returned {}: {}", status, body);
            return Err(StudioError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| StudioError::Response(e.to_string()))?;

        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            log::debug!("First candidate finished with reason: {}", reason);
        }

        let images = Self::extract_images(&parsed);
        if images.is_empty() {
            log::warn!("Response contained no inline image data");
        } else {
            log::info!("Received {} image(s)", images.len());
        }

        Ok(images)
    }
}
