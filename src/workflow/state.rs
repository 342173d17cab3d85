use crate::{
    config::StudioConfig,
    models::{AspectRatio, GeneratedImage, GenerationConfig, ImageModel, ReferenceFile},
    workflow::AttachmentList,
};
use chrono::{DateTime, Utc};

pub const FAILURE_NOTICE: &str = "Failed to generate image. Please try again.";

/// Everything the front end renders, minus the in-flight flag (which the
/// controller owns so it can be checked without taking the state lock).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub model: ImageModel,
    pub attachments: AttachmentList,
    pub history: Vec<GeneratedImage>,
    pub notice: Option<String>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            aspect_ratio: config.default_aspect_ratio,
            model: config.default_model,
            ..Self::default()
        }
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    /// The request a submission would send right now, or `None` when the
    /// prompt is blank. Attachments ride along only when `forward_attachments`.
    pub fn pending_config(&self, forward_attachments: bool) -> Option<GenerationConfig> {
        if !self.has_prompt() {
            return None;
        }

        let mut config = GenerationConfig::new(self.prompt.clone())
            .with_aspect_ratio(self.aspect_ratio)
            .with_model(self.model);
        if forward_attachments {
            config.reference_images = self.attachments.files().to_vec();
        }
        Some(config)
    }

    /// Turn one successful response into history records and put them in
    /// front of everything already there, keeping response order.
    pub fn record_batch(
        &mut self,
        prompt: &str,
        model: ImageModel,
        urls: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> usize {
        let batch: Vec<GeneratedImage> = urls
            .into_iter()
            .map(|url| GeneratedImage::new(url, prompt, model, timestamp))
            .collect();
        let added = batch.len();
        self.history.splice(0..0, batch);
        added
    }

    pub fn record_failure(&mut self) {
        self.notice = Some(FAILURE_NOTICE.to_string());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn add_attachments(&mut self, files: impl IntoIterator<Item = ReferenceFile>) -> usize {
        self.attachments.add(files)
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<ReferenceFile> {
        self.attachments.remove(index)
    }

    pub fn find_image(&self, id: &str) -> Option<&GeneratedImage> {
        self.history.iter().find(|image| image.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(tags: &[&str]) -> Vec<String> {
        tags.iter()
            .map(|t| format!("data:image/png;base64,{}", t))
            .collect()
    }

    #[test]
    fn blank_prompt_has_no_pending_config() {
        let mut state = WorkflowState::new();
        assert!(state.pending_config(false).is_none());

        state.prompt = " \t\n".into();
        assert!(state.pending_config(false).is_none());
    }

    #[test]
    fn pending_config_mirrors_state() {
        let mut state = WorkflowState::new();
        state.prompt = "a red bicycle".into();
        state.aspect_ratio = AspectRatio::Landscape16x9;
        state.model = ImageModel::Pro;
        state.add_attachments([ReferenceFile::new("a.png", "image/png", vec![1])]);

        let config = state.pending_config(false).unwrap();
        assert_eq!(config.prompt, "a red bicycle");
        assert_eq!(config.aspect_ratio, AspectRatio::Landscape16x9);
        assert_eq!(config.model, ImageModel::Pro);
        assert!(config.reference_images.is_empty());

        let forwarded = state.pending_config(true).unwrap();
        assert_eq!(forwarded.reference_images.len(), 1);
    }

    #[test]
    fn batches_are_prepended_in_order() {
        let mut state = WorkflowState::new();
        let first = Utc::now();
        assert_eq!(state.record_batch("old", ImageModel::Flash, urls(&["A", "B"]), first), 2);

        let second = Utc::now();
        state.record_batch("new", ImageModel::Flash, urls(&["C", "D", "E"]), second);

        let order: Vec<&str> = state.history.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "data:image/png;base64,C",
                "data:image/png;base64,D",
                "data:image/png;base64,E",
                "data:image/png;base64,A",
                "data:image/png;base64,B",
            ]
        );
        assert!(state.history[..3]
            .iter()
            .all(|i| i.prompt == "new" && i.timestamp == second));
    }

    #[test]
    fn empty_batch_leaves_history_alone() {
        let mut state = WorkflowState::new();
        state.record_batch("p", ImageModel::Flash, urls(&["A"]), Utc::now());
        assert_eq!(state.record_batch("q", ImageModel::Flash, Vec::new(), Utc::now()), 0);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn failure_sets_notice_without_touching_history() {
        let mut state = WorkflowState::new();
        state.record_batch("p", ImageModel::Flash, urls(&["A"]), Utc::now());
        let before = state.history.clone();

        state.record_failure();
        assert_eq!(state.notice.as_deref(), Some(FAILURE_NOTICE));
        assert_eq!(state.history, before);

        state.clear_notice();
        assert!(state.notice.is_none());
    }

    #[test]
    fn from_config_uses_defaults() {
        let config = StudioConfig::new()
            .with_model(ImageModel::Pro)
            .with_aspect_ratio(AspectRatio::Portrait9x16);
        let state = WorkflowState::from_config(&config);
        assert_eq!(state.model, ImageModel::Pro);
        assert_eq!(state.aspect_ratio, AspectRatio::Portrait9x16);
        assert!(state.history.is_empty());
    }
}
