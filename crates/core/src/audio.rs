//! Pre-analysis validation of uploaded audio.
//!
//! [`validate_audio`] rejects uploads with a bad declared type or size
//! BEFORE any session state changes, so the client can retry the same
//! session. [`is_corrupt`] detects payloads that cannot possibly be
//! analyzed; the engine fails the session for those (the only path to the
//! `failed` status). Provider errors never fail a session; they degrade.

use crate::error::CoreError;

/// Maximum accepted audio payload.
pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Content types the recorder clients produce.
pub const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/wav",
    "audio/mp3",
    "audio/mp4",
    "audio/mpeg",
    "audio/webm",
];

/// Sessions are capped at one hour of audio.
pub const MAX_DURATION_SECS: i64 = 3600;

/// Validate an uploaded audio part's declared type and size.
/// `content_type` is the multipart part's declared type, if any.
pub fn validate_audio(content_type: Option<&str>, bytes: &[u8]) -> Result<(), CoreError> {
    let ct = content_type
        .ok_or_else(|| CoreError::Validation("Audio content type is required".into()))?;

    if !ALLOWED_AUDIO_TYPES.contains(&ct) {
        return Err(CoreError::Validation(format!(
            "Invalid file type '{ct}'. Only audio files are allowed."
        )));
    }

    if bytes.len() > MAX_AUDIO_BYTES {
        return Err(CoreError::Validation(format!(
            "Audio file exceeds the {} MB limit",
            MAX_AUDIO_BYTES / (1024 * 1024)
        )));
    }

    Ok(())
}

/// An empty payload is unrecoverable: there is nothing to analyze and
/// nothing a retry of the same bytes would fix.
pub fn is_corrupt(bytes: &[u8]) -> bool {
    bytes.is_empty()
}

/// Clamp a client-reported duration to sane bounds. The server does not
/// trust the reported value beyond this.
pub fn clamp_duration(reported_secs: i64) -> i32 {
    reported_secs.clamp(0, MAX_DURATION_SECS) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_allowed_types() {
        for ct in ALLOWED_AUDIO_TYPES {
            assert!(validate_audio(Some(ct), b"riff").is_ok());
        }
    }

    #[test]
    fn rejects_missing_and_unknown_types() {
        assert!(matches!(
            validate_audio(None, b"data"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_audio(Some("video/mp4"), b"data"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn rejects_oversized_payload() {
        let big = vec![0u8; MAX_AUDIO_BYTES + 1];
        assert!(validate_audio(Some("audio/wav"), &big).is_err());
    }

    #[test]
    fn empty_payload_is_corrupt_not_invalid() {
        // Type/size validation passes; corruption is a separate check so
        // the engine can fail the session rather than reject the request.
        assert!(validate_audio(Some("audio/wav"), b"").is_ok());
        assert!(is_corrupt(b""));
        assert!(!is_corrupt(b"riff"));
    }

    #[test]
    fn duration_is_clamped_to_bounds() {
        assert_eq!(clamp_duration(-5), 0);
        assert_eq!(clamp_duration(90), 90);
        assert_eq!(clamp_duration(86_400), 3600);
    }
}
