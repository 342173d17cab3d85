//! Request and response bodies for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A content fragment. Either field may be absent; parts with neither are
/// skipped when reading a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: Some(mime_type.into()),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

impl InlineData {
    /// MIME type and payload, if both are present and non-empty.
    pub fn image(&self) -> Option<(&str, &str)> {
        let mime_type = self.mime_type.as_deref().filter(|m| !m.trim().is_empty())?;
        if self.data.is_empty() {
            return None;
        }
        Some((mime_type, self.data.as_str()))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// `(mime_type, data)` of the first candidate's inline-data parts, in
    /// response order. Parts without a declared MIME type are skipped.
    pub fn inline_images(&self) -> impl Iterator<Item = (&str, &str)> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .filter_map(InlineData::image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part::text("a red bicycle")],
            }],
            generation_config: GeminiGenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: "16:9".into(),
                },
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{"role": "user", "parts": [{"text": "a red bicycle"}]}],
                "generationConfig": {"imageConfig": {"aspectRatio": "16:9"}}
            })
        );
    }

    #[test]
    fn only_first_candidate_is_scanned() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [
                    {"text": "here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "QQ=="}}
                ]}},
                {"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "Qg=="}}
                ]}}
            ]
        }))
        .unwrap();

        let images: Vec<_> = response.inline_images().map(|(_, data)| data).collect();
        assert_eq!(images, vec!["QQ=="]);
    }

    #[test]
    fn parts_without_mime_type_are_skipped() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"data": "QUFB"}},
                {"inlineData": {"mimeType": "", "data": "Q0ND"}},
                {"inlineData": {"mimeType": "image/png", "data": ""}},
                {"inlineData": {"mimeType": "image/png", "data": "QkJC"}}
            ]}}]
        }))
        .unwrap();

        let images: Vec<_> = response.inline_images().collect();
        assert_eq!(images, vec![("image/png", "QkJC")]);
    }

    #[test]
    fn missing_candidates_and_content_are_tolerated() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.inline_images().count(), 0);

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert_eq!(blocked.inline_images().count(), 0);
    }
}
