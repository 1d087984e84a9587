// TTS plugin boundary
use crate::config::TtsConfig;
use crate::error::Result;
use crate::ssml;
use crate::viseme::TimedViseme;
use std::path::{Path, PathBuf};

/// A speech synthesis engine as seen by the synthesis pipeline.
///
/// The pipeline owns caching and playback; an engine only turns one sentence
/// into an audio file plus an optional phoneme transcript.
pub trait Tts: Send + Sync {
    /// Language code the engine was configured for (e.g. "en-us")
    fn lang(&self) -> &str;

    fn config(&self) -> &TtsConfig;

    /// SSML tag names the engine understands; other tags are stripped.
    fn ssml_tags(&self) -> &[&'static str];

    /// File extension of the produced audio (e.g. "wav")
    fn audio_ext(&self) -> &str;

    /// Engine specific rewrite of a supported SSML tag.
    fn modify_tag(&self, tag: &str) -> String {
        tag.to_string()
    }

    /// Reduce `utterance` to the SSML subset this engine accepts.
    fn validate_ssml(&self, utterance: &str) -> String {
        ssml::validate_ssml(utterance, self.ssml_tags(), |tag| self.modify_tag(tag))
    }

    /// Synthesize `sentence` into `wav_file`, returning the audio path and
    /// the raw phoneme transcript.
    fn get_tts(&self, sentence: &str, wav_file: &Path) -> Result<(PathBuf, String)>;

    /// Timed mouth shapes for a transcript returned by [`Tts::get_tts`].
    fn viseme(&self, _phonemes: &str) -> Result<Vec<TimedViseme>> {
        Ok(Vec::new())
    }
}

/// Pre-flight checks run before an engine is accepted as usable.
pub trait TtsValidator {
    fn validate_lang(&self) -> Result<()>;

    fn validate_connection(&self) -> Result<()>;

    fn validate(&self) -> Result<()> {
        self.validate_lang()?;
        self.validate_connection()
    }
}
