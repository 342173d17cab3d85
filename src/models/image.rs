use crate::{
    data_uri,
    error::Result,
    models::{AspectRatio, ImageModel},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub model: ImageModel,
    pub negative_prompt: Option<String>,
    pub num_images: Option<u32>,
    #[serde(default)]
    pub reference_images: Vec<ReferenceFile>,
}

impl GenerationConfig {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            model: ImageModel::default(),
            negative_prompt: None,
            num_images: None,
            reference_images: Vec::new(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_num_images(mut self, num_images: u32) -> Self {
        self.num_images = Some(num_images);
        self
    }

    pub fn with_reference_images(mut self, references: Vec<ReferenceFile>) -> Self {
        self.reference_images = references;
        self
    }
}

/// A user-selected reference image held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ReferenceFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a reference image from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(mime_for_extension)
            .unwrap_or("application/octet-stream");

        Ok(Self::new(name, mime_type, bytes))
    }

    /// Data URI for previews. Built on demand; nothing outlives the entry.
    pub fn preview_url(&self) -> String {
        data_uri::from_bytes(&self.mime_type, &self.bytes)
    }
}

/// One entry in the generation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub model: ImageModel,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(
        url: String,
        prompt: impl Into<String>,
        model: ImageModel,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url,
            prompt: prompt.into(),
            model,
            timestamp,
        }
    }

    pub fn mime_type(&self) -> Result<&str> {
        Ok(data_uri::split(&self.url)?.0)
    }

    pub fn decode(&self) -> Result<DecodedImage> {
        let (mime_type, bytes) = data_uri::decode(&self.url)?;
        Ok(DecodedImage { mime_type, bytes })
    }

    pub fn file_extension(&self) -> Result<&'static str> {
        Ok(extension_for_mime(self.mime_type()?))
    }

    /// Write the decoded image into `dir` as `<id>.<ext>` and return the path.
    pub async fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let decoded = self.decode()?;
        let path = dir
            .as_ref()
            .join(format!("{}.{}", self.id, extension_for_mime(&decoded.mime_type)));
        tokio::fs::write(&path, &decoded.bytes).await?;
        log::debug!("Saved {} bytes to {}", decoded.bytes.len(), path.display());
        Ok(path)
    }

    pub fn to_reference(&self) -> Result<ReferenceFile> {
        let decoded = self.decode()?;
        let name = format!("{}.{}", self.id, extension_for_mime(&decoded.mime_type));
        Ok(ReferenceFile::new(name, decoded.mime_type, decoded.bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "bin",
    }
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
