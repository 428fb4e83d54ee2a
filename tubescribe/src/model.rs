use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Model;
use crate::error::{Error, Result};

const HUGGINGFACE_BASE: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Anything smaller than this is an error page, not a ggml model.
const MIN_MODEL_BYTES: u64 = 1_000_000;

/// Ensure a model file is available locally, downloading it on first use.
/// Returns the path to the model file.
pub async fn ensure_model(model: &Model, cache_dir: &Path) -> Result<PathBuf> {
    if let Model::Custom(path) = model {
        return if path.exists() {
            Ok(path.clone())
        } else {
            Err(Error::ModelNotFound { path: path.clone() })
        };
    }

    let filename = model.filename();
    let model_path = cache_dir.join(&filename);

    if model_path.exists() {
        info!(path = %model_path.display(), "model already cached");
        return Ok(model_path);
    }

    std::fs::create_dir_all(cache_dir).map_err(|e| {
        Error::Model(format!(
            "failed to create cache dir {}: {e}",
            cache_dir.display()
        ))
    })?;

    let url = format!("{HUGGINGFACE_BASE}/{filename}");
    info!(%url, "downloading model");
    fetch_model(&url, &model_path).await?;

    Ok(model_path)
}

async fn fetch_model(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::ModelDownload(format!("HTTP error: {e}")))?;

    let total_size = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb.set_message(format!(
        "Downloading {}",
        dest.file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    ));

    // Write to a temp file first, then rename into place
    let tmp_path = dest.with_extension("bin.part");
    let mut file = std::fs::File::create(&tmp_path)?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    use std::io::Write;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);

    let file_size = std::fs::metadata(&tmp_path)?.len();
    if file_size < MIN_MODEL_BYTES {
        std::fs::remove_file(&tmp_path).ok();
        return Err(Error::ModelDownload(format!(
            "downloaded file too small ({file_size} bytes), likely an error page"
        )));
    }

    std::fs::rename(&tmp_path, dest)?;
    pb.finish_with_message("Download complete");

    if total_size > 0 && file_size != total_size {
        warn!(
            expected = total_size,
            actual = file_size,
            "file size mismatch, model may be corrupt"
        );
    }

    info!(path = %dest.display(), size = file_size, "model saved");
    Ok(())
}

/// List all cached model files.
pub fn list_cached_models(cache_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(cache_dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "bin"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_model_custom_path_must_exist() {
        let missing = Model::Custom(PathBuf::from("/nonexistent/ggml-custom.bin"));
        let cache = tempfile::tempdir().unwrap();
        assert!(matches!(
            ensure_model(&missing, cache.path()).await,
            Err(Error::ModelNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_ensure_model_cached_file_skips_download() {
        let cache = tempfile::tempdir().unwrap();
        let cached = cache.path().join("ggml-base.bin");
        std::fs::write(&cached, b"stub").unwrap();

        let path = ensure_model(&Model::Base, cache.path()).await.unwrap();
        assert_eq!(path, cached);
    }

    #[test]
    fn test_list_cached_models_filters_bin() {
        let cache = tempfile::tempdir().unwrap();
        std::fs::write(cache.path().join("ggml-base.bin"), b"x").unwrap();
        std::fs::write(cache.path().join("ggml-base.bin.part"), b"x").unwrap();
        std::fs::write(cache.path().join("readme.md"), b"x").unwrap();

        let cached = list_cached_models(cache.path());
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0], cache.path().join("ggml-base.bin"));
    }

    #[test]
    fn test_list_cached_models_missing_dir() {
        assert!(list_cached_models(Path::new("/nonexistent/cache")).is_empty());
    }
}
