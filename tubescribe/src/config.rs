use std::fmt;
use std::path::PathBuf;

use crate::error::Error;

/// A validated transcription language.
///
/// Wraps a code checked against whisper.cpp's supported language list. Accepts
/// short codes ("en", "de") and full names ("english", "german"), or `Auto` to
/// let the model detect the language from the audio.
#[derive(Debug, Clone)]
pub enum Language {
    /// Auto-detect language from audio.
    Auto,
    /// A validated language code (e.g. "en", "de", "ja").
    Code {
        /// Short code as whisper expects it.
        code: String,
        /// Whisper internal language ID.
        id: i32,
    },
}

impl Language {
    /// Create a language from a code or full name, validating against whisper.cpp.
    pub fn new(lang: &str) -> Result<Self, Error> {
        let lower = lang.to_lowercase();
        if lower == "auto" {
            return Ok(Language::Auto);
        }

        match whisper_rs::get_lang_id(&lower) {
            Some(id) => {
                // Normalize full names to the short code
                let code = whisper_rs::get_lang_str(id).unwrap_or(&lower).to_string();
                Ok(Language::Code { code, id })
            }
            None => Err(Error::UnsupportedLanguage(lang.to_string())),
        }
    }

    /// List all supported languages as (code, full_name) pairs.
    pub fn supported() -> Vec<(&'static str, &'static str)> {
        let max = whisper_rs::get_lang_max_id();
        (0..=max)
            .filter_map(|id| {
                let code = whisper_rs::get_lang_str(id)?;
                let name = whisper_rs::get_lang_str_full(id)?;
                Some((code, name))
            })
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Auto => write!(f, "auto"),
            Language::Code { code, .. } => write!(f, "{code}"),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Auto
    }
}

/// Whisper model sizes.
#[derive(Debug, Clone)]
pub enum Model {
    Tiny,
    TinyEn,
    Base,
    BaseEn,
    Small,
    SmallEn,
    Medium,
    MediumEn,
    LargeV2,
    LargeV3,
    LargeV3Turbo,
    /// User-provided .ggml file path.
    Custom(PathBuf),
}

impl Model {
    /// Model filename as used by HuggingFace / whisper.cpp.
    pub fn filename(&self) -> String {
        match self {
            Model::Tiny => "ggml-tiny.bin".into(),
            Model::TinyEn => "ggml-tiny.en.bin".into(),
            Model::Base => "ggml-base.bin".into(),
            Model::BaseEn => "ggml-base.en.bin".into(),
            Model::Small => "ggml-small.bin".into(),
            Model::SmallEn => "ggml-small.en.bin".into(),
            Model::Medium => "ggml-medium.bin".into(),
            Model::MediumEn => "ggml-medium.en.bin".into(),
            Model::LargeV2 => "ggml-large-v2.bin".into(),
            Model::LargeV3 => "ggml-large-v3.bin".into(),
            Model::LargeV3Turbo => "ggml-large-v3-turbo.bin".into(),
            Model::Custom(path) => path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom-model".into()),
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        match self {
            Model::Tiny => "tiny",
            Model::TinyEn => "tiny.en",
            Model::Base => "base",
            Model::BaseEn => "base.en",
            Model::Small => "small",
            Model::SmallEn => "small.en",
            Model::Medium => "medium",
            Model::MediumEn => "medium.en",
            Model::LargeV2 => "large-v2",
            Model::LargeV3 => "large-v3",
            Model::LargeV3Turbo => "large-v3-turbo",
            Model::Custom(_) => "custom",
        }
    }

    /// Parse a size name (e.g. from a CLI argument or environment variable).
    pub fn parse_name(s: &str) -> Option<Self> {
        match s {
            "tiny" => Some(Model::Tiny),
            "tiny.en" => Some(Model::TinyEn),
            "base" => Some(Model::Base),
            "base.en" => Some(Model::BaseEn),
            "small" => Some(Model::Small),
            "small.en" => Some(Model::SmallEn),
            "medium" => Some(Model::Medium),
            "medium.en" => Some(Model::MediumEn),
            "large-v2" => Some(Model::LargeV2),
            "large-v3" => Some(Model::LargeV3),
            "large-v3-turbo" => Some(Model::LargeV3Turbo),
            _ => None,
        }
    }

    /// All named sizes, smallest first.
    pub fn all() -> &'static [&'static str] {
        &[
            "tiny",
            "tiny.en",
            "base",
            "base.en",
            "small",
            "small.en",
            "medium",
            "medium.en",
            "large-v2",
            "large-v3",
            "large-v3-turbo",
        ]
    }
}

/// Options for loading and running the transcription engine.
pub struct TranscribeOptions {
    pub model: Model,
    pub language: Language,
    pub translate: bool,
    pub n_threads: Option<u32>,
    pub gpu: bool,
    pub gpu_device: u32,
    pub temperature: f32,
    pub cache_dir: Option<PathBuf>,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            model: Model::Base,
            language: Language::Auto,
            translate: false,
            n_threads: None,
            gpu: true,
            gpu_device: 0,
            temperature: 0.0,
            cache_dir: None,
        }
    }
}

impl TranscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set the language. Validates against whisper's supported languages.
    pub fn language(mut self, lang: &str) -> Result<Self, Error> {
        self.language = Language::new(lang)?;
        Ok(self)
    }

    pub fn translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    pub fn n_threads(mut self, n: u32) -> Self {
        self.n_threads = Some(n);
        self
    }

    pub fn gpu(mut self, enabled: bool) -> Self {
        self.gpu = enabled;
        self
    }

    pub fn gpu_device(mut self, device: u32) -> Self {
        self.gpu_device = device;
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }

    /// Resolve the cache directory, defaulting to ~/.cache/tubescribe/models.
    pub fn resolve_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("tubescribe")
                .join("models")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_roundtrip() {
        for name in Model::all() {
            let model = Model::parse_name(name).expect("known size");
            assert_eq!(model.name(), *name);
        }
    }

    #[test]
    fn test_parse_name_rejects_unknown() {
        assert!(Model::parse_name("gigantic").is_none());
        assert!(Model::parse_name("").is_none());
    }

    #[test]
    fn test_custom_model_filename() {
        let model = Model::Custom(PathBuf::from("/models/ggml-finetuned.bin"));
        assert_eq!(model.filename(), "ggml-finetuned.bin");
        assert_eq!(model.name(), "custom");
    }

    #[test]
    fn test_language_accepts_code_and_full_name() {
        assert!(matches!(
            Language::new("en"),
            Ok(Language::Code { ref code, .. }) if code == "en"
        ));
        assert!(matches!(
            Language::new("english"),
            Ok(Language::Code { ref code, .. }) if code == "en"
        ));
        assert!(matches!(Language::new("auto"), Ok(Language::Auto)));
    }

    #[test]
    fn test_language_rejects_unknown() {
        assert!(Language::new("klingon").is_err());
    }
}
