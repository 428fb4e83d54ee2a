use serde::{Deserialize, Serialize};

/// A transcript segment (sentence/phrase) with timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Complete transcription result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    pub language: String,
    pub duration: f64,
    pub model: String,
    pub source_url: Option<String>,
}

impl Transcript {
    /// Full text, exactly as the model produced it.
    ///
    /// Segments are concatenated without trimming or separators. Whisper emits
    /// each segment with its own leading space, so the concatenation is the
    /// model's raw output string.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(texts: &[&str]) -> Transcript {
        Transcript {
            segments: texts
                .iter()
                .enumerate()
                .map(|(i, t)| Segment {
                    start: i as f64,
                    end: i as f64 + 1.0,
                    text: (*t).to_string(),
                })
                .collect(),
            language: "en".to_string(),
            duration: texts.len() as f64,
            model: "base".to_string(),
            source_url: None,
        }
    }

    #[test]
    fn test_text_is_verbatim_concatenation() {
        let t = transcript(&[" So this is a test.", " Thanks for watching."]);
        assert_eq!(t.text(), " So this is a test. Thanks for watching.");
    }

    #[test]
    fn test_text_preserves_whitespace() {
        let t = transcript(&["  double lead", "no lead "]);
        assert_eq!(t.text(), "  double leadno lead ");
    }

    #[test]
    fn test_text_empty_transcript() {
        let t = transcript(&[]);
        assert_eq!(t.text(), "");
    }
}
