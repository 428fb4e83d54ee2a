use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::config::{Language, TranscribeOptions};
use crate::error::{Error, Result};
use crate::model;
use crate::types::{Segment, Transcript};

/// A whisper model loaded into memory and ready to serve transcriptions.
///
/// Loading the model is the expensive part; construct the engine once at
/// startup and share it for the life of the process. Each call runs on a fresh
/// `WhisperState`, so a shared engine needs no locking and inference never
/// mutates the loaded weights.
pub struct WhisperEngine {
    ctx: WhisperContext,
    options: TranscribeOptions,
}

impl WhisperEngine {
    /// Fetch the model if it isn't cached yet and load it into memory.
    pub async fn load(options: TranscribeOptions) -> Result<Self> {
        let cache_dir = options.resolve_cache_dir();
        let model_path = model::ensure_model(&options.model, &cache_dir).await?;

        info!(model = %model_path.display(), "loading whisper model");

        let mut ctx_params = WhisperContextParameters::new();
        ctx_params.use_gpu(options.gpu);
        ctx_params.gpu_device(options.gpu_device as i32);

        let ctx = WhisperContext::new_with_params(
            model_path
                .to_str()
                .ok_or_else(|| Error::Model("model path contains invalid UTF-8".into()))?,
            ctx_params,
        )?;

        Ok(Self { ctx, options })
    }

    /// Name of the loaded model ("base", "large-v3", ...).
    pub fn model_name(&self) -> &str {
        self.options.model.name()
    }

    /// Decode a local audio/video file and transcribe it.
    ///
    /// Blocking: decoding shells out to ffmpeg and inference occupies the
    /// calling thread until the whole file is processed. One attempt, no retry.
    pub fn transcribe_file(&self, path: &Path) -> Result<Transcript> {
        let samples = audio::load_audio(path)?;
        self.transcribe_samples(&samples)
    }

    fn transcribe_samples(&self, samples: &[f32]) -> Result<Transcript> {
        let mut state = self.ctx.create_state()?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });

        match &self.options.language {
            Language::Auto => params.set_detect_language(true),
            Language::Code { code, .. } => params.set_language(Some(code)),
        }

        params.set_translate(self.options.translate);
        params.set_temperature(self.options.temperature);
        if let Some(n) = self.options.n_threads {
            params.set_n_threads(n as i32);
        }

        // Keep whisper.cpp off our stdout/stderr
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        info!(samples = samples.len(), "running transcription");
        state.full(params, samples)?;

        let num_segments = state.full_n_segments();
        debug!(num_segments, "transcription complete");

        let mut segments = Vec::with_capacity(num_segments as usize);

        for i in 0..num_segments {
            let segment = state.get_segment(i).ok_or_else(|| {
                Error::Transcription(format!("segment {i} missing from whisper state"))
            })?;

            let text = segment
                .to_str_lossy()
                .map_err(|e| Error::Transcription(format!("segment text error: {e}")))?
                .into_owned();

            segments.push(Segment {
                start: segment.start_timestamp() as f64 / 100.0,
                end: segment.end_timestamp() as f64 / 100.0,
                text,
            });
        }

        let language = whisper_rs::get_lang_str(state.full_lang_id_from_state())
            .unwrap_or("unknown")
            .to_string();

        Ok(Transcript {
            segments,
            language,
            duration: samples.len() as f64 / audio::WHISPER_SAMPLE_RATE as f64,
            model: self.options.model.name().to_string(),
            source_url: None,
        })
    }
}
