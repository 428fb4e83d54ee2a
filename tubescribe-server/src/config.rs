use std::path::PathBuf;

use tubescribe::{Model, TranscribeOptions};

/// Server configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub model: String,
    pub language: String,
    pub gpu: bool,
    pub cache_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5174);
        let model = std::env::var("WHISPER_MODEL").unwrap_or_else(|_| "base".to_string());
        let language = std::env::var("WHISPER_LANGUAGE").unwrap_or_else(|_| "auto".to_string());
        let gpu = std::env::var("WHISPER_NO_GPU").is_err();
        let cache_dir = std::env::var("MODEL_CACHE_DIR").ok().map(PathBuf::from);

        Self {
            port,
            model,
            language,
            gpu,
            cache_dir,
        }
    }

    /// Engine options derived from this config.
    pub fn transcribe_options(&self) -> anyhow::Result<TranscribeOptions> {
        let model = Model::parse_name(&self.model)
            .ok_or_else(|| anyhow::anyhow!("unknown whisper model: {}", self.model))?;

        let mut options = TranscribeOptions::new()
            .model(model)
            .gpu(self.gpu)
            .language(&self.language)?;

        if let Some(dir) = &self.cache_dir {
            options = options.cache_dir(dir.clone());
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcribe_options_rejects_unknown_model() {
        let config = ServerConfig {
            port: 5174,
            model: "gigantic".to_string(),
            language: "auto".to_string(),
            gpu: true,
            cache_dir: None,
        };
        assert!(config.transcribe_options().is_err());
    }

    #[test]
    fn test_transcribe_options_accepts_defaults() {
        let config = ServerConfig {
            port: 5174,
            model: "base".to_string(),
            language: "auto".to_string(),
            gpu: false,
            cache_dir: Some(PathBuf::from("/tmp/models")),
        };
        let options = config.transcribe_options().unwrap();
        assert_eq!(options.model.name(), "base");
        assert!(!options.gpu);
        assert_eq!(options.resolve_cache_dir(), PathBuf::from("/tmp/models"));
    }
}
