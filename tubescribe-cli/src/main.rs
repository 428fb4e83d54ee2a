use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tubescribe::{Language, Model, TranscribeOptions, WhisperEngine};

#[derive(Parser)]
#[command(name = "tubescribe", about = "Transcribe audio/video from URL or file")]
struct Cli {
    /// URL or local file path to transcribe.
    #[arg(required_unless_present_any = ["list_models", "download_model", "list_languages"])]
    input: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Write output to file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Whisper model to use.
    #[arg(short, long, default_value = "base")]
    model: String,

    /// Language code (e.g. "en", "de") or "auto" for detection.
    #[arg(short, long, default_value = "auto")]
    language: String,

    /// Translate to English.
    #[arg(long)]
    translate: bool,

    /// Disable GPU acceleration.
    #[arg(long)]
    no_gpu: bool,

    /// GPU device ID.
    #[arg(long, default_value = "0")]
    gpu_device: u32,

    /// Number of threads (default: auto).
    #[arg(long)]
    threads: Option<u32>,

    /// Sampling temperature.
    #[arg(long, default_value = "0.0")]
    temperature: f32,

    /// Model cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// List available models.
    #[arg(long)]
    list_models: bool,

    /// Download a model without transcribing.
    #[arg(long)]
    download_model: Option<String>,

    /// List supported languages.
    #[arg(long)]
    list_languages: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tubescribe=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.list_languages {
        println!("{:<6} {}", "CODE", "LANGUAGE");
        println!("{:<6} {}", "----", "--------");
        for (code, name) in Language::supported() {
            println!("{code:<6} {name}");
        }
        return;
    }

    if cli.list_models {
        println!("Available models:");
        for name in Model::all() {
            println!("  {name}");
        }

        let cache_dir = cli
            .cache_dir
            .clone()
            .unwrap_or_else(|| TranscribeOptions::default().resolve_cache_dir());
        let cached = tubescribe::model::list_cached_models(&cache_dir);
        if !cached.is_empty() {
            println!("\nCached in {}:", cache_dir.display());
            for path in cached {
                println!(
                    "  {}",
                    path.file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_default()
                );
            }
        }
        return;
    }

    if let Some(model_name) = &cli.download_model {
        let model = match Model::parse_name(model_name) {
            Some(m) => m,
            None => {
                eprintln!("Unknown model: {model_name}");
                eprintln!("Use --list-models to see available models");
                std::process::exit(1);
            }
        };
        let cache_dir = cli
            .cache_dir
            .unwrap_or_else(|| TranscribeOptions::default().resolve_cache_dir());
        match tubescribe::model::ensure_model(&model, &cache_dir).await {
            Ok(path) => println!("Model ready: {}", path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let input = cli.input.unwrap();

    let model = match Model::parse_name(&cli.model) {
        Some(m) => m,
        None => {
            // Fall back to treating the argument as a path to a .ggml file
            let path = PathBuf::from(&cli.model);
            if path.exists() {
                Model::Custom(path)
            } else {
                eprintln!("Unknown model: {}", cli.model);
                eprintln!("Use --list-models to see available models, or provide a path to a .ggml file");
                std::process::exit(1);
            }
        }
    };

    let mut options = match TranscribeOptions::new()
        .model(model)
        .translate(cli.translate)
        .gpu(!cli.no_gpu)
        .gpu_device(cli.gpu_device)
        .temperature(cli.temperature)
        .language(&cli.language)
    {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --list-languages to see supported languages");
            std::process::exit(1);
        }
    };

    if let Some(n) = cli.threads {
        options = options.n_threads(n);
    }
    if let Some(dir) = cli.cache_dir {
        options = options.cache_dir(dir);
    }

    let engine = match WhisperEngine::load(options).await {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let is_url = input.starts_with("http://") || input.starts_with("https://");

    let result = if is_url {
        tubescribe::transcribe_url(&engine, &input).await
    } else {
        engine.transcribe_file(input.as_ref())
    };

    let transcript = match result {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    eprintln!(
        "Transcription complete: {:.1}s of audio, {} segments, language: {}",
        transcript.duration,
        transcript.segments.len(),
        transcript.language,
    );

    let output_text = match cli.format {
        OutputFormat::Text => transcript.text(),
        OutputFormat::Json => match serde_json::to_string_pretty(&transcript) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("JSON error: {e}");
                std::process::exit(1);
            }
        },
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &output_text) {
                eprintln!("Error writing to {}: {e}", path.display());
                std::process::exit(1);
            }
            eprintln!("Written to {}", path.display());
        }
        None => print!("{output_text}"),
    }
}
