//! Pronunciation helpers around the [`SpeechSynthesizer`] collaborator.

use crate::error::SpeechError;
use crate::model::SourceRecord;
use crate::traits::SpeechSynthesizer;

/// Text to speak for a record: the native script when present, otherwise
/// the prompt, without a trailing parenthetical transliteration.
pub fn speech_text(record: &SourceRecord) -> &str {
    let text = record.script().unwrap_or(record.prompt());
    match text.find('(') {
        Some(idx) if idx > 0 => text[..idx].trim(),
        _ => text.trim(),
    }
}

/// Synthesize the pronunciation for a record.
///
/// Returns `Ok(None)` without touching the synthesizer when the record has
/// no audio code.
pub async fn pronounce(
    synth: &dyn SpeechSynthesizer,
    record: &SourceRecord,
) -> Result<Option<Vec<u8>>, SpeechError> {
    let Some(code) = record.audio_code() else {
        tracing::debug!("no audio code for '{}', skipping speech", record.prompt());
        return Ok(None);
    };

    let audio = synth.synthesize(speech_text(record), code).await?;
    Ok(Some(audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordDraft;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSynth {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynth {
        async fn synthesize(&self, text: &str, audio_code: &str) -> Result<Vec<u8>, SpeechError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), audio_code.to_string()));
            Ok(b"ID3".to_vec())
        }
    }

    fn record(prompt: &str, script: Option<&str>, audio: Option<&str>) -> SourceRecord {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        SourceRecord::from_draft(
            RecordDraft {
                prompt: prompt.into(),
                script: script.map(String::from),
                answer: "Peace / Hello".into(),
                distractors: ["Goodbye".into(), "Water".into(), "Bread".into()],
                audio_code: audio.map(String::from),
                ..Default::default()
            },
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn strips_parenthetical_transliteration() {
        let r = record("שָׁלוֹם (Shalom)", None, Some("iw"));
        assert_eq!(speech_text(&r), "שָׁלוֹם");
    }

    #[test]
    fn prefers_script_over_prompt() {
        let r = record("Shalom", Some("שָׁלוֹם"), Some("iw"));
        assert_eq!(speech_text(&r), "שָׁלוֹם");
    }

    #[test]
    fn leading_parenthesis_is_kept() {
        let r = record("(informal) hola", None, Some("es"));
        assert_eq!(speech_text(&r), "(informal) hola");
    }

    #[tokio::test]
    async fn absent_audio_code_skips_synthesizer() {
        let synth = RecordingSynth::default();
        let r = record("Jambo", None, None);
        assert!(pronounce(&synth, &r).await.unwrap().is_none());
        assert!(synth.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pronounce_passes_text_and_code() {
        let synth = RecordingSynth::default();
        let r = record("שָׁלוֹם (Shalom)", None, Some("iw"));
        let audio = pronounce(&synth, &r).await.unwrap().unwrap();
        assert_eq!(audio, b"ID3");
        assert_eq!(
            synth.calls.lock().unwrap().as_slice(),
            &[("שָׁלוֹם".to_string(), "iw".to_string())]
        );
    }
}
