use crate::{
    config::StudioConfig,
    error::{Result, StudioError},
    gemini::{GeminiImageClient, ImageGenerator},
    logger::Timer,
    models::{AspectRatio, GeneratedImage, GenerationConfig, ImageModel, ReferenceFile},
    workflow::WorkflowState,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank prompt (or unknown history entry); nothing was sent.
    Skipped,
    /// Another generation is still running; nothing was sent.
    Busy,
    Completed { added: usize },
    /// The generator failed; the state now carries the failure notice.
    Failed,
}

/// Clears the in-flight flag when dropped, whatever path the cycle took.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Runs generation cycles against an [`ImageGenerator`] and owns the
/// resulting [`WorkflowState`].
///
/// The state lock is never held across the generator call, so readers
/// (`snapshot`, `history`, ...) stay responsive while a request is out.
pub struct GenerationController {
    generator: Arc<dyn ImageGenerator>,
    state: Mutex<WorkflowState>,
    in_flight: AtomicBool,
    forward_attachments: bool,
}

impl GenerationController {
    pub fn new(generator: Arc<dyn ImageGenerator>, config: &StudioConfig) -> Self {
        Self {
            generator,
            state: Mutex::new(WorkflowState::from_config(config)),
            in_flight: AtomicBool::new(false),
            forward_attachments: config.forward_attachments,
        }
    }

    /// Controller backed by the Gemini REST client described by `config.gemini`.
    pub fn with_gemini(config: &StudioConfig) -> Self {
        let client = GeminiImageClient::new(config.gemini.clone());
        Self::new(Arc::new(client), config)
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> WorkflowState {
        self.state.lock().await.clone()
    }

    pub async fn history(&self) -> Vec<GeneratedImage> {
        self.state.lock().await.history.clone()
    }

    pub async fn notice(&self) -> Option<String> {
        self.state.lock().await.notice.clone()
    }

    pub async fn set_prompt(&self, prompt: impl Into<String>) {
        self.state.lock().await.prompt = prompt.into();
    }

    pub async fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) {
        self.state.lock().await.aspect_ratio = aspect_ratio;
    }

    pub async fn set_model(&self, model: ImageModel) {
        self.state.lock().await.model = model;
    }

    pub async fn add_attachments(&self, files: impl IntoIterator<Item = ReferenceFile>) -> usize {
        let mut state = self.state.lock().await;
        let kept = state.add_attachments(files);
        log::debug!(
            "Kept {} new attachment(s), {} total",
            kept,
            state.attachments.len()
        );
        kept
    }

    pub async fn remove_attachment(&self, index: usize) -> Option<ReferenceFile> {
        self.state.lock().await.remove_attachment(index)
    }

    pub async fn clear_attachments(&self) {
        self.state.lock().await.attachments.clear();
    }

    /// Generate from the current prompt, aspect ratio and model.
    pub async fn submit(&self) -> SubmitOutcome {
        let config = {
            let state = self.state.lock().await;
            match state.pending_config(self.forward_attachments) {
                Some(config) => config,
                None => {
                    log::debug!("Ignoring submit with an empty prompt");
                    return SubmitOutcome::Skipped;
                }
            }
        };

        self.run(config).await
    }

    /// Re-run the prompt of a history entry with another model, e.g. the
    /// "pro" variant of a flash result.
    pub async fn regenerate(&self, image_id: &str, model: ImageModel) -> SubmitOutcome {
        let config = {
            let state = self.state.lock().await;
            let Some(image) = state.find_image(image_id) else {
                log::warn!("No history entry {} to regenerate", image_id);
                return SubmitOutcome::Skipped;
            };
            let mut config = GenerationConfig::new(image.prompt.clone())
                .with_aspect_ratio(state.aspect_ratio)
                .with_model(model);
            if self.forward_attachments {
                config.reference_images = state.attachments.files().to_vec();
            }
            config
        };

        self.run(config).await
    }

    /// Load a history entry back into the editor: its prompt becomes the
    /// current prompt and its image is appended as a reference attachment.
    /// Returns whether the image fit under the attachment cap.
    pub async fn edit(&self, image_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let image = state
            .find_image(image_id)
            .cloned()
            .ok_or_else(|| StudioError::NotFound(format!("history entry {}", image_id)))?;

        let reference = image.to_reference()?;
        state.prompt = image.prompt;
        let kept = state.add_attachments([reference]) == 1;
        if !kept {
            log::warn!("Attachment list is full; {} not attached", image_id);
        }
        Ok(kept)
    }

    /// Write a history entry's image into `dir`.
    pub async fn download(&self, image_id: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let image = self
            .state
            .lock()
            .await
            .find_image(image_id)
            .cloned()
            .ok_or_else(|| StudioError::NotFound(format!("history entry {}", image_id)))?;

        image.save_to_dir(dir).await
    }

    async fn run(&self, config: GenerationConfig) -> SubmitOutcome {
        let Some(_in_flight) = InFlightGuard::acquire(&self.in_flight) else {
            log::debug!("Generation already in flight, ignoring submit");
            return SubmitOutcome::Busy;
        };

        let request_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        self.state.lock().await.clear_notice();

        log::info!(
            "[{}] Submitting prompt ({} chars) to {}",
            request_id,
            config.prompt.chars().count(),
            config.model
        );
        let timer = Timer::new(&format!("generation {}", request_id));
        let result = self.generator.generate(&config).await;
        drop(timer);

        let mut state = self.state.lock().await;
        match result {
            Ok(urls) => {
                let added = state.record_batch(&config.prompt, config.model, urls, Utc::now());
                log::info!("[{}] Added {} image(s) to history", request_id, added);
                SubmitOutcome::Completed { added }
            }
            Err(e) => {
                log::error!("[{}] Generation failed: {}", request_id, e);
                state.record_failure();
                SubmitOutcome::Failed
            }
        }
    }
}
