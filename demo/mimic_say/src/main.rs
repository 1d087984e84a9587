use clap::Parser;
use satellite_tts::{MimicTts, TtsConfig, TtsValidator};
use std::path::PathBuf;
use tracing::{error, info};

/// Speak one utterance with mimic and print the synthesis result (wav path,
/// phoneme transcript, viseme timeline) as JSON
#[derive(Parser)]
#[command(name = "mimic_say")]
#[command(version)]
struct Cli {
    /// Where mimic writes the WAV file (default: <temp dir>/mimic_say.wav)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Override the configured voice
    #[arg(long)]
    voice: Option<String>,

    /// Text or SSML to speak
    #[arg(required = true)]
    text: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,satellite_tts=info,mimic_say=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Configuration (optional TOML, see MIMIC_TTS_CONFIG)
    let mut cfg = TtsConfig::load();
    if let Some(voice) = cli.voice {
        cfg.set("voice", voice);
    }
    if cfg.get_str("voice").is_none() {
        cfg.set("voice", "ap");
    }
    let lang = cfg.get_str_or("lang", "en-us");

    let tts = MimicTts::new(lang, cfg)?;
    if let Err(e) = tts.validator().validate() {
        error!(target = "mimic_say", error = %e, "mimic is not usable");
        return Err(e.into());
    }

    let wav = cli
        .out
        .unwrap_or_else(|| std::env::temp_dir().join("mimic_say.wav"));
    let utterance = cli.text.join(" ");
    info!(target = "mimic_say", wav = ?wav, voice = tts.voice(), "Synthesizing");

    let out = tts.synthesize(&utterance, &wav)?;
    let total: f64 = out.visemes.iter().map(|v| v.duration).sum();
    info!(
        target = "mimic_say",
        visemes = out.visemes.len(),
        seconds = total,
        "Synthesis done"
    );

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
