//! Tests for mimic argument construction, validation and synthesis

use satellite_tts::{MimicTts, Tts, TtsConfig, TtsError, TtsValidator};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

// Writing a script while another test thread forks can leave the file busy
// (ETXTBSY); every test that writes a script or spawns a process holds this.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn spawn_guard() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn mimic(bin: &str, stretch: Option<&str>) -> MimicTts {
    let mut cfg = TtsConfig::new();
    cfg.set("bin", bin).set("voice", "ap");
    if let Some(s) = stretch {
        cfg.set("duration_stretch", s);
    }
    MimicTts::new("en-us", cfg).unwrap()
}

#[test]
fn test_args_without_stretch() {
    let tts = mimic("/usr/bin/mimic", None);
    let inv = tts
        .invocation("hello world", Path::new("/tmp/out.wav"))
        .unwrap();
    assert_eq!(
        inv.argv(),
        vec![
            "/usr/bin/mimic",
            "-voice",
            "ap",
            "-psdur",
            "-ssml",
            "-o",
            "/tmp/out.wav",
            "-t",
            "hello world"
        ]
    );
    assert!(!inv.args.iter().any(|a| a == "--setf"));
}

#[test]
fn test_args_with_stretch() {
    let tts = mimic("/usr/bin/mimic", Some("1.2"));
    let inv = tts.invocation("hi", Path::new("/tmp/out.wav")).unwrap();
    assert_eq!(
        inv.argv(),
        vec![
            "/usr/bin/mimic",
            "-voice",
            "ap",
            "-psdur",
            "-ssml",
            "--setf",
            "duration_stretch=1.2",
            "-o",
            "/tmp/out.wav",
            "-t",
            "hi"
        ]
    );
}

#[test]
fn test_empty_stretch_is_ignored() {
    let tts = mimic("/usr/bin/mimic", Some(""));
    let inv = tts.invocation("hi", Path::new("out.wav")).unwrap();
    assert_eq!(inv.args.len(), 8);
}

#[test]
fn test_validator_reports_missing_binary() {
    let _guard = spawn_guard();
    let tts = mimic("/nonexistent/dir/mimic", None);
    let err = tts.validator().validate().unwrap_err();
    assert!(matches!(err, TtsError::BinaryNotFound { .. }));
    let msg = err.to_string();
    assert!(msg.contains("install"), "message lacks install hint: {}", msg);
    assert!(msg.contains("/nonexistent/dir/mimic"));
}

#[test]
fn test_synthesis_with_missing_binary() {
    let _guard = spawn_guard();
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("out.wav");
    let tts = mimic("/nonexistent/dir/mimic", None);

    let err = tts.get_tts("hello", &wav).unwrap_err();
    assert!(matches!(err, TtsError::BinaryNotFound { .. }));
    assert!(!wav.exists());
}

#[test]
fn test_unresolved_binary_fails_before_running() {
    let _guard = spawn_guard();
    let mut cfg = TtsConfig::new();
    cfg.set("voice", "ap");
    let tts = MimicTts::new("en-us", cfg).unwrap();
    if tts.bin().is_some() {
        // mimic is installed on this machine; nothing to check
        return;
    }

    let err = tts.invocation("hello", Path::new("out.wav")).unwrap_err();
    assert!(matches!(err, TtsError::BinaryNotFound { .. }));
    assert!(tts.validator().validate_connection().is_err());
}

#[test]
fn test_viseme_uses_decoder() {
    let tts = mimic("/usr/bin/mimic", None);
    let visemes = tts.viseme("f:0.2 junk").unwrap();
    assert_eq!(visemes.len(), 1);
    assert_eq!(visemes[0].viseme.code(), 5);
}

#[cfg(unix)]
mod fake_engine {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Stand-in for mimic: records its arguments, writes a tiny file to the
    /// `-o` path and prints a fixed transcript.
    fn fake_mimic(dir: &Path) -> PathBuf {
        let args_file = dir.join("args.txt");
        write_script(
            dir,
            "mimic",
            &format!(
                r#"if [ "$1" = "--version" ]; then echo "mimic 1.3.0.1"; exit 0; fi
printf '%s\n' "$@" > "{}"
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf 'RIFF' > "$out"
echo "pau:0.1 hh:0.05 ah:0.1 l:0.07 ow:0.2 pau:0.1"
"#,
                args_file.display()
            ),
        )
    }

    #[test]
    fn test_synthesize_end_to_end() {
        let _guard = spawn_guard();
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_mimic(dir.path());
        let wav = dir.path().join("hello.wav");

        let tts = mimic(bin.to_str().unwrap(), Some("1.1"));
        tts.validator().validate().unwrap();

        let out = tts
            .synthesize(r#"<prosody speed="slow">hello</prosody><break/>"#, &wav)
            .unwrap();
        assert_eq!(out.wav_file, wav);
        assert_eq!(std::fs::read(&wav).unwrap(), b"RIFF");
        assert_eq!(out.phonemes.trim(), "pau:0.1 hh:0.05 ah:0.1 l:0.07 ow:0.2 pau:0.1");
        let codes: Vec<u8> = out.visemes.iter().map(|v| v.viseme.code()).collect();
        assert_eq!(codes, vec![4, 0, 0, 3, 2, 4]);

        let recorded = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        let recorded: Vec<&str> = recorded.lines().collect();
        assert_eq!(
            recorded,
            vec![
                "-voice",
                "ap",
                "-psdur",
                "-ssml",
                "--setf",
                "duration_stretch=1.1",
                "-o",
                wav.to_str().unwrap(),
                "-t",
                r#"<prosody rate="0.7">hello</prosody>"#,
            ]
        );
    }

    #[test]
    fn test_non_zero_exit_is_execution_failure() {
        let _guard = spawn_guard();
        let dir = tempfile::tempdir().unwrap();
        let bin = write_script(dir.path(), "mimic", "echo 'voice not found' >&2\nexit 3\n");

        let tts = mimic(bin.to_str().unwrap(), None);
        // The version probe only checks that the binary starts
        tts.validator().validate_connection().unwrap();

        let err = tts.get_tts("hello", &dir.path().join("x.wav")).unwrap_err();
        match err {
            TtsError::ProcessExecutionFailure { command, reason } => {
                assert!(command.starts_with(bin.to_str().unwrap()));
                assert!(command.contains("-voice ap"));
                assert!(reason.contains("voice not found"), "reason: {}", reason);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_garbage_transcript_surfaces_decode_error() {
        let _guard = spawn_guard();
        let dir = tempfile::tempdir().unwrap();
        let bin = write_script(dir.path(), "mimic", "echo 'pau:0.1 ey:fast'\n");

        let tts = mimic(bin.to_str().unwrap(), None);
        let err = tts.synthesize("hi", &dir.path().join("x.wav")).unwrap_err();
        assert!(matches!(err, TtsError::MalformedTranscriptValue { .. }));
    }
}
