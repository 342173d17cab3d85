use crate::{
    error::{Result, StudioError},
    models::{AspectRatio, ImageModel},
};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Where the Gemini client sends requests and how it finds its access key.
///
/// The key is looked up when a request is made, not when the config is built:
/// an explicit `api_key` wins, otherwise the variable named by `api_key_var`
/// is read from the process environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_key_var: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key_var =
            env::var("GEMINI_API_KEY_VAR").unwrap_or_else(|_| DEFAULT_API_KEY_VAR.to_string());

        GeminiConfig {
            base_url,
            api_key: None,
            api_key_var,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_key_var(mut self, name: impl Into<String>) -> Self {
        self.api_key_var = name.into();
        self
    }

    /// Resolve the access key. Blank values count as absent.
    pub fn resolve_api_key(&self) -> Result<String> {
        let key = match &self.api_key {
            Some(key) => Some(key.clone()),
            None => env::var(&self.api_key_var).ok(),
        };

        match key {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(StudioError::MissingCredential(format!(
                "{} is not set",
                self.api_key_var
            ))),
        }
    }

    pub(crate) fn endpoint_for(&self, model: ImageModel) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model.as_str()
        )
    }
}

/// Defaults and switches for the generation workflow.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub default_model: ImageModel,
    pub default_aspect_ratio: AspectRatio,
    pub forward_attachments: bool,
    pub gemini: GeminiConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            default_model: ImageModel::default(),
            default_aspect_ratio: AspectRatio::default(),
            forward_attachments: false,
            gemini: GeminiConfig::default(),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let default_model = match env::var("GENSTUDIO_DEFAULT_MODEL") {
            Ok(value) => value.parse()?,
            Err(_) => ImageModel::default(),
        };
        let default_aspect_ratio = match env::var("GENSTUDIO_DEFAULT_ASPECT_RATIO") {
            Ok(value) => value.parse()?,
            Err(_) => AspectRatio::default(),
        };
        let forward_attachments = env::var("GENSTUDIO_FORWARD_ATTACHMENTS")
            .ok()
            .map_or(false, |val| val == "true");

        Ok(StudioConfig {
            default_model,
            default_aspect_ratio,
            forward_attachments,
            gemini: GeminiConfig::from_env(),
        })
    }

    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.default_model = model;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.default_aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_forwarded_attachments(mut self, enabled: bool) -> Self {
        self.forward_attachments = enabled;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Removes the named variables when dropped, so a failed assertion
    /// cannot leak them into later tests.
    struct EnvCleanup(&'static [&'static str]);

    impl Drop for EnvCleanup {
        fn drop(&mut self) {
            for name in self.0 {
                env::remove_var(name);
            }
        }
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let config = GeminiConfig::new()
            .with_api_key_var("GENSTUDIO_TEST_UNSET_KEY")
            .with_api_key("explicit");
        assert_eq!(config.resolve_api_key().unwrap(), "explicit");
    }

    #[test]
    fn missing_key_is_reported_with_variable_name() {
        let config = GeminiConfig::new().with_api_key_var("GENSTUDIO_TEST_NEVER_SET");
        match config.resolve_api_key() {
            Err(StudioError::MissingCredential(msg)) => {
                assert!(msg.contains("GENSTUDIO_TEST_NEVER_SET"))
            }
            other => panic!("expected missing credential, got {:?}", other),
        }
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = GeminiConfig::new().with_api_key("   ");
        assert!(matches!(
            config.resolve_api_key(),
            Err(StudioError::MissingCredential(_))
        ));
    }

    #[test]
    #[serial]
    fn key_is_read_from_environment_at_call_time() {
        let _cleanup = EnvCleanup(&["GENSTUDIO_TEST_LATE_KEY"]);
        let config = GeminiConfig::new().with_api_key_var("GENSTUDIO_TEST_LATE_KEY");
        env::remove_var("GENSTUDIO_TEST_LATE_KEY");
        assert!(config.resolve_api_key().is_err());

        env::set_var("GENSTUDIO_TEST_LATE_KEY", "late");
        assert_eq!(config.resolve_api_key().unwrap(), "late");
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let config = GeminiConfig::new().with_base_url("http://localhost:1234/");
        assert_eq!(
            config.endpoint_for(ImageModel::Flash),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    #[serial]
    fn studio_config_reads_environment() {
        let _cleanup = EnvCleanup(&[
            "GENSTUDIO_DEFAULT_MODEL",
            "GENSTUDIO_DEFAULT_ASPECT_RATIO",
            "GENSTUDIO_FORWARD_ATTACHMENTS",
        ]);
        env::set_var("GENSTUDIO_DEFAULT_MODEL", "gemini-3-pro-image-preview");
        env::set_var("GENSTUDIO_DEFAULT_ASPECT_RATIO", "16:9");
        env::set_var("GENSTUDIO_FORWARD_ATTACHMENTS", "true");

        let config = StudioConfig::from_env().unwrap();
        assert_eq!(config.default_model, ImageModel::Pro);
        assert_eq!(config.default_aspect_ratio, AspectRatio::Landscape16x9);
        assert!(config.forward_attachments);

        env::set_var("GENSTUDIO_DEFAULT_MODEL", "dall-e-3");
        assert!(matches!(StudioConfig::from_env(), Err(StudioError::Config(_))));
    }

    #[test]
    #[serial]
    fn cleanup_removes_variables_on_drop() {
        {
            let _cleanup = EnvCleanup(&["GENSTUDIO_TEST_SCOPED"]);
            env::set_var("GENSTUDIO_TEST_SCOPED", "1");
        }
        assert!(env::var("GENSTUDIO_TEST_SCOPED").is_err());
    }
}
