//! Phoneme to viseme classification and transcript decoding.
//!
//! Mimic run with `-psdur` prints `phoneme:duration` pairs on stdout. Each
//! phoneme is classified into one of seven mouth shapes for lip-sync.
//!
//! The grouping follows Jeffers' phoneme-to-viseme map, reduced to the mouth
//! unit images of the satellite face:
//! - /A `v f` → 5
//! - /B `uh w uw er r ow` → 2
//! - /C `b p m` (and silence) → 4
//! - /D `aw` → 1
//! - /E-/F, /H, /J-/K dental, sibilant and velar consonants → 3
//! - /G `oy ao` → 6
//! - /I open vowels → 0

use crate::error::{Result, TtsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::debug;

/// Mouth shape code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Viseme(u8);

impl Viseme {
    /// Closed mouth; also used for pauses and unknown phonemes.
    pub const CLOSED: Viseme = Viseme(4);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub const fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One mouth shape held for `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedViseme {
    pub viseme: Viseme,
    pub duration: f64,
}

pub const PHONEME_VISEMES: &[(&str, Viseme)] = &[
    // /A
    ("v", Viseme(5)),
    ("f", Viseme(5)),
    // /B
    ("uh", Viseme(2)),
    ("w", Viseme(2)),
    ("uw", Viseme(2)),
    ("er", Viseme(2)),
    ("r", Viseme(2)),
    ("ow", Viseme(2)),
    // /C
    ("b", Viseme(4)),
    ("p", Viseme(4)),
    ("m", Viseme(4)),
    // /D
    ("aw", Viseme(1)),
    // /E
    ("th", Viseme(3)),
    ("dh", Viseme(3)),
    // /F
    ("zh", Viseme(3)),
    ("ch", Viseme(3)),
    ("sh", Viseme(3)),
    ("jh", Viseme(3)),
    // /G
    ("oy", Viseme(6)),
    ("ao", Viseme(6)),
    // /H
    ("z", Viseme(3)),
    ("s", Viseme(3)),
    // /I
    ("ae", Viseme(0)),
    ("eh", Viseme(0)),
    ("ey", Viseme(0)),
    ("ah", Viseme(0)),
    ("ih", Viseme(0)),
    ("y", Viseme(0)),
    ("iy", Viseme(0)),
    ("aa", Viseme(0)),
    ("ay", Viseme(0)),
    ("ax", Viseme(0)),
    ("hh", Viseme(0)),
    // /J
    ("n", Viseme(3)),
    ("t", Viseme(3)),
    ("d", Viseme(3)),
    ("l", Viseme(3)),
    // /K
    ("g", Viseme(3)),
    ("ng", Viseme(3)),
    ("k", Viseme(3)),
    // blank mouth
    ("pau", Viseme::CLOSED),
];

static VISEMES: LazyLock<HashMap<&'static str, Viseme>> =
    LazyLock::new(|| PHONEME_VISEMES.iter().copied().collect());

/// Look up the mouth shape for a phoneme. Unknown phonemes map to
/// [`Viseme::CLOSED`].
pub fn viseme_for(phoneme: &str) -> Viseme {
    VISEMES.get(phoneme).copied().unwrap_or(Viseme::CLOSED)
}

/// Seconds as printed by mimic: a finite, non-negative decimal.
fn parse_duration(s: &str) -> std::result::Result<f64, String> {
    let d = s.parse::<f64>().map_err(|e| e.to_string())?;
    if !d.is_finite() || d < 0.0 {
        return Err(format!("{} is not a non-negative number of seconds", s));
    }
    Ok(d)
}

/// Decode a `phoneme:duration` transcript into timed visemes, in input order.
///
/// Tokens that do not split into exactly two `:` parts are skipped. A token of
/// the right shape whose duration is not a finite, non-negative number fails
/// the whole decode.
pub fn decode_visemes(transcript: &str) -> Result<Vec<TimedViseme>> {
    let start = Instant::now();
    let mut visemes = Vec::new();

    for pair in transcript.split_whitespace() {
        let mut parts = pair.split(':');
        let (Some(phoneme), Some(duration), None) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let duration = parse_duration(duration).map_err(|reason| {
            TtsError::MalformedTranscriptValue {
                token: pair.to_string(),
                reason,
            }
        })?;
        visemes.push(TimedViseme {
            viseme: viseme_for(phoneme),
            duration,
        });
    }

    debug!(
        target = "tts",
        count = visemes.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Decoded viseme transcript"
    );
    Ok(visemes)
}
