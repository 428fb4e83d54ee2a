use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// A downloaded audio track sitting inside the caller's scoped directory.
///
/// The caller owns the directory (and with it this file); nothing here
/// outlives the request that asked for the download.
pub struct FetchedAudio {
    pub path: PathBuf,
    /// Container extension as reported by the downloader ("webm", "m4a", ...).
    pub format: String,
}

/// Container extensions yt-dlp commonly leaves behind with `bestaudio/best`.
const MEDIA_EXTENSIONS: &[&str] = &[
    "webm", "m4a", "mp4", "opus", "ogg", "mp3", "wav", "flac", "mkv",
];

/// Cap on how much of yt-dlp's stderr ends up in an error message.
const MAX_STDERR_CHARS: usize = 1000;

/// Validate that a string looks like a URL.
/// Rejects anything that isn't http:// or https://.
fn validate_url(url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::Download(format!(
            "invalid URL (must start with http:// or https://): {trimmed}"
        )))
    }
}

/// Download the best available audio stream for a URL into `dest_dir`.
///
/// Runs yt-dlp with `bestaudio/best` format selection (audio-only stream when
/// one exists, full audio+video otherwise) and an output template keyed by the
/// media id and container extension. Returns the final local path.
///
/// # Security
/// - URL is validated to start with http:// or https://
/// - Arguments are passed via `.arg()` (no shell expansion)
/// - `--no-exec` stops yt-dlp from running post-processing commands
/// - The reported file path must resolve inside `dest_dir`
pub async fn fetch_audio(url: &str, dest_dir: &Path) -> Result<FetchedAudio> {
    validate_url(url)?;

    info!(%url, "downloading audio");

    let probe = tokio::process::Command::new("yt-dlp")
        .arg("--version")
        .output()
        .await;
    if probe.is_err() {
        return Err(Error::YtDlpNotFound);
    }

    tokio::fs::create_dir_all(dest_dir).await?;

    let template = dest_dir
        .join("%(id)s.%(ext)s")
        .to_str()
        .ok_or_else(|| Error::Download("destination path contains invalid UTF-8".into()))?
        .to_string();

    let output = tokio::process::Command::new("yt-dlp")
        .args([
            "--format",
            "bestaudio/best",
            "--no-playlist",
            "--no-exec",
            "--output",
            &template,
            "--print",
            "after_move:filepath",
        ])
        .arg(url)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail: String = stderr.chars().take(MAX_STDERR_CHARS).collect();
        return Err(Error::Download(format!(
            "yt-dlp failed: {}",
            detail.trim()
        )));
    }

    let reported = String::from_utf8_lossy(&output.stdout).trim().to_string();

    let path = if reported.is_empty() {
        // Older yt-dlp builds don't support after_move printing
        newest_media_file(dest_dir)?
    } else {
        let candidate = PathBuf::from(&reported);
        ensure_within(&candidate, dest_dir)?;
        candidate
    };

    if !path.exists() {
        return Err(Error::Download(format!(
            "downloaded file missing at {}",
            path.display()
        )));
    }

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_string();

    debug!(path = %path.display(), %format, "audio downloaded");

    Ok(FetchedAudio { path, format })
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir => {}
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Reject paths that escape the scoped download directory.
fn ensure_within(path: &Path, dir: &Path) -> Result<()> {
    let canonical_dir = dir.canonicalize().unwrap_or_else(|_| normalize_path(dir));
    let canonical_path = path.canonicalize().unwrap_or_else(|_| normalize_path(path));

    if canonical_path.starts_with(&canonical_dir) {
        Ok(())
    } else {
        warn!(
            path = %path.display(),
            dir = %dir.display(),
            "downloaded file path outside scoped directory"
        );
        Err(Error::Download(
            "downloaded file path is outside the download directory".into(),
        ))
    }
}

/// Most recently modified media file in a directory.
fn newest_media_file(dir: &Path) -> Result<PathBuf> {
    let mut best: Option<(PathBuf, std::time::SystemTime)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !MEDIA_EXTENSIONS.contains(&ext) {
            continue;
        }
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            if best.as_ref().is_none_or(|(_, t)| modified > *t) {
                best = Some((path, modified));
            }
        }
    }

    best.map(|(p, _)| p)
        .ok_or_else(|| Error::Download("no audio file found after download".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert!(validate_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
        assert!(validate_url("http://example.com/clip.mp4").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_bare_host() {
        assert!(validate_url("youtube.com/watch?v=dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn test_validate_url_rejects_file_scheme() {
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_validate_url_rejects_empty_and_shelly_input() {
        assert!(validate_url("").is_err());
        assert!(validate_url("$(whoami)").is_err());
        assert!(validate_url("| cat /etc/passwd").is_err());
    }

    #[test]
    fn test_ensure_within_accepts_child() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dQw4w9WgXcQ.webm");
        assert!(ensure_within(&path, dir.path()).is_ok());
    }

    #[test]
    fn test_ensure_within_rejects_absolute_escape() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_within(Path::new("/etc/passwd"), dir.path()).is_err());
    }

    #[test]
    fn test_ensure_within_rejects_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("..").join("..").join("etc").join("passwd");
        assert!(ensure_within(&path, dir.path()).is_err());
    }

    #[test]
    fn test_newest_media_file_picks_media() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("abc123.webm"), b"x").unwrap();

        let found = newest_media_file(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("abc123.webm"));
    }

    #[test]
    fn test_newest_media_file_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(newest_media_file(dir.path()).is_err());
    }
}
