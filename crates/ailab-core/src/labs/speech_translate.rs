//! Speech translation: transcribe a recorded utterance, translate it into
//! the language the user picks, and speak the translation.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::prompt_line;
use crate::error::Result;
use crate::services::speech::{plain_ssml, SpeechClient, WavAudio};
use crate::services::TranslatorClient;

/// Target languages and the voice each translation is spoken with.
pub const TARGET_VOICES: &[(&str, &str)] = &[
    ("fr", "fr-FR-HenriNeural"),
    ("es", "es-ES-ElviraNeural"),
    ("hi", "hi-IN-MadhurNeural"),
];

pub const PROMPT: &str =
    "\nEnter a target language\n fr = French\n es = Spanish\n hi = Hindi\n Enter anything else to stop\n\n";

/// Voice for a target language code, if it is one of [`TARGET_VOICES`].
pub fn voice_for(language: &str) -> Option<&'static str> {
    TARGET_VOICES
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, voice)| *voice)
}

/// A translation that was spoken into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenTranslation {
    pub language: String,
    pub text: String,
    pub path: PathBuf,
}

/// Repeatedly ask for a target language and translate `command_wav` into it,
/// writing `translation-N-<lang>.wav` files into `output_dir`.
///
/// Stops at end of input or on anything that is not a target language.
/// The recording is transcribed once, on the first valid target.
pub async fn run_speech_translation<I: BufRead, W: Write>(
    speech: &SpeechClient,
    translator: &TranslatorClient,
    command_wav: &Path,
    output_dir: &Path,
    input: &mut I,
    out: &mut W,
) -> Result<Vec<SpokenTranslation>> {
    writeln!(out, "Ready to translate from {}", speech.language())?;

    let mut heard: Option<String> = None;
    let mut spoken = Vec::new();

    while let Some(line) = prompt_line(input, out, PROMPT)? {
        let language = line.trim().to_lowercase();
        let Some(voice) = voice_for(&language) else {
            break;
        };

        writeln!(out, "Speak now...")?;
        let text = match heard.clone() {
            Some(text) => text,
            None => {
                let audio = WavAudio::load(command_wav)?;
                let recognition = speech.recognize(&audio).await?;
                let Some(text) = recognition.text().map(str::to_string) else {
                    writeln!(out, "{}", recognition.recognition_status)?;
                    break;
                };
                heard = Some(text.clone());
                text
            }
        };
        writeln!(out, "Translating '{text}'")?;

        let translated = match translator.translate(&language, &text).await {
            Ok(result) => result.first().map(|t| t.text.clone()).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, %language, "translation failed");
                writeln!(out, "{e}")?;
                continue;
            }
        };
        writeln!(out, "{translated}")?;

        let path = output_dir.join(format!("translation-{}-{language}.wav", spoken.len() + 1));
        match speech
            .synthesize_to_file(&plain_ssml(voice, &translated), &path)
            .await
        {
            Ok(()) => spoken.push(SpokenTranslation {
                language,
                text: translated,
                path,
            }),
            Err(e) => {
                tracing::warn!(error = %e, %voice, "synthesis failed");
                writeln!(out, "{e}")?;
            }
        }
    }

    Ok(spoken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_target_has_a_voice_in_its_locale() {
        assert_eq!(voice_for("fr"), Some("fr-FR-HenriNeural"));
        assert_eq!(voice_for("es"), Some("es-ES-ElviraNeural"));
        assert_eq!(voice_for("hi"), Some("hi-IN-MadhurNeural"));
        for (code, voice) in TARGET_VOICES {
            assert!(voice.starts_with(code));
        }
    }

    #[test]
    fn other_languages_have_no_voice() {
        assert_eq!(voice_for("de"), None);
        assert_eq!(voice_for("FR"), None);
        assert_eq!(voice_for(""), None);
    }
}
