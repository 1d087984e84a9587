//! Mimic speech synthesis engine
//!
//! Drives the `mimic` command-line engine as a blocking subprocess:
//! - writes WAV audio to the requested path
//! - prints `phoneme:duration` pairs on stdout (`-psdur`), decoded into visemes
//!
//! Config keys:
//! - bin: path to the mimic executable (default: `mimic` searched on PATH)
//! - voice: mimic voice name (required)
//! - duration_stretch: optional speed tuning passed as `--setf duration_stretch=<v>`

use crate::config::TtsConfig;
use crate::error::{Result, TtsError};
use crate::plugin::{Tts, TtsValidator};
use crate::ssml;
use crate::utils::find_executable_in;
use crate::viseme::{decode_visemes, TimedViseme};
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

const DEFAULT_BIN: &str = "mimic";

pub const MIMIC_SSML_TAGS: &[&str] = &["speak", "ssml", "phoneme", "voice", "audio", "prosody"];

/// A fully built mimic command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl EngineInvocation {
    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for EngineInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Output of one synthesis call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Synthesis {
    pub wav_file: PathBuf,
    pub phonemes: String,
    pub visemes: Vec<TimedViseme>,
}

pub struct MimicTts {
    lang: String,
    config: TtsConfig,
    bin: Option<PathBuf>,
    voice: String,
    duration_stretch: Option<String>,
}

impl MimicTts {
    pub fn new(lang: impl Into<String>, config: TtsConfig) -> Result<Self> {
        Self::with_search_path(lang, config, std::env::var_os("PATH").as_deref())
    }

    /// Like [`MimicTts::new`], searching `paths` instead of the process `PATH`
    /// when `bin` is not configured.
    pub(crate) fn with_search_path(
        lang: impl Into<String>,
        config: TtsConfig,
        paths: Option<&OsStr>,
    ) -> Result<Self> {
        let voice = config
            .get_str("voice")
            .ok_or_else(|| TtsError::InvalidConfig("mimic requires a `voice`".into()))?;
        let duration_stretch = config.get_str("duration_stretch");

        let bin = match config.get_str("bin") {
            Some(bin) => Some(PathBuf::from(bin)),
            None => find_executable_in(DEFAULT_BIN, paths),
        };
        match &bin {
            Some(p) => info!(target = "tts", bin = ?p, "Using mimic binary"),
            None => warn!(target = "tts", "mimic binary not configured and not found on PATH"),
        }

        Ok(Self {
            lang: lang.into(),
            config,
            bin,
            voice,
            duration_stretch,
        })
    }

    pub fn bin(&self) -> Option<&Path> {
        self.bin.as_deref()
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn validator(&self) -> MimicValidator<'_> {
        MimicValidator::new(self)
    }

    fn resolved_bin(&self) -> Result<&Path> {
        self.bin().ok_or_else(|| TtsError::BinaryNotFound {
            path: PathBuf::from(DEFAULT_BIN),
        })
    }

    /// Build the mimic command line for one sentence.
    pub fn invocation(&self, sentence: &str, wav_file: &Path) -> Result<EngineInvocation> {
        let program = self.resolved_bin()?.to_path_buf();

        let mut args = vec![
            "-voice".to_string(),
            self.voice.clone(),
            "-psdur".to_string(),
            "-ssml".to_string(),
        ];
        if let Some(stretch) = &self.duration_stretch {
            args.push("--setf".to_string());
            args.push(format!("duration_stretch={}", stretch));
        }
        args.push("-o".to_string());
        args.push(wav_file.to_string_lossy().into_owned());
        args.push("-t".to_string());
        args.push(sentence.to_string());

        Ok(EngineInvocation { program, args })
    }

    /// SSML cleanup, synthesis and viseme decoding in one call.
    pub fn synthesize(&self, utterance: &str, wav_file: &Path) -> Result<Synthesis> {
        let sentence = self.validate_ssml(utterance);
        let (wav_file, phonemes) = self.get_tts(&sentence, wav_file)?;
        let visemes = self.viseme(&phonemes)?;
        Ok(Synthesis {
            wav_file,
            phonemes,
            visemes,
        })
    }
}

impl Tts for MimicTts {
    fn lang(&self) -> &str {
        &self.lang
    }

    fn config(&self) -> &TtsConfig {
        &self.config
    }

    fn ssml_tags(&self) -> &[&'static str] {
        MIMIC_SSML_TAGS
    }

    fn audio_ext(&self) -> &str {
        "wav"
    }

    fn modify_tag(&self, tag: &str) -> String {
        ssml::modify_tag(tag)
    }

    fn get_tts(&self, sentence: &str, wav_file: &Path) -> Result<(PathBuf, String)> {
        let invocation = self.invocation(sentence, wav_file)?;
        debug!(target = "tts", command = %invocation, "Running mimic");

        let output = invocation
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TtsError::BinaryNotFound {
                    path: invocation.program.clone(),
                },
                _ => TtsError::ProcessExecutionFailure {
                    command: invocation.to_string(),
                    reason: e.to_string(),
                },
            })?;

        if !output.status.success() {
            return Err(TtsError::ProcessExecutionFailure {
                command: invocation.to_string(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok((
            wav_file.to_path_buf(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }

    fn viseme(&self, phonemes: &str) -> Result<Vec<TimedViseme>> {
        decode_visemes(phonemes)
    }
}

/// Liveness probe for the mimic binary.
pub struct MimicValidator<'a> {
    tts: &'a MimicTts,
}

impl<'a> MimicValidator<'a> {
    pub fn new(tts: &'a MimicTts) -> Self {
        Self { tts }
    }
}

impl TtsValidator for MimicValidator<'_> {
    fn validate_lang(&self) -> Result<()> {
        // TODO: check the installed mimic build ships a voice for `self.tts.lang()`
        Ok(())
    }

    fn validate_connection(&self) -> Result<()> {
        let bin = self.tts.resolved_bin().inspect_err(|_| {
            info!(target = "tts", "Failed to find mimic on PATH");
        })?;

        Command::new(bin)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|_| ())
            .map_err(|e| {
                info!(target = "tts", bin = ?bin, error = %e, "Failed to find mimic");
                TtsError::BinaryNotFound {
                    path: bin.to_path_buf(),
                }
            })
    }
}
