//! Speech-to-text and text-to-speech over the Speech service REST endpoints.
//!
//! Audio goes in and out as WAV files: recognition expects 16-bit PCM mono,
//! synthesis produces `riff-24khz-16bit-mono-pcm`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{
    endpoint_url, http_client, read_json, status_error, CognitiveService, SUBSCRIPTION_KEY_HEADER,
};
use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

const SERVICE: &str = "speech";
const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

pub struct SpeechClient {
    http: Client,
    key: String,
    region: String,
    language: String,
    stt_base: String,
    tts_base: String,
}

/// Outcome of a single-shot recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeechRecognition {
    /// `Success`, `NoMatch`, `InitialSilenceTimeout`, `BabbleTimeout`, `Error`.
    pub recognition_status: String,
    #[serde(default)]
    pub display_text: Option<String>,
}

impl SpeechRecognition {
    /// Recognized text when recognition succeeded.
    pub fn text(&self) -> Option<&str> {
        if self.recognition_status == "Success" {
            self.display_text.as_deref()
        } else {
            None
        }
    }
}

/// A validated WAV file ready to upload.
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub bytes: Vec<u8>,
}

impl WavAudio {
    /// Read and validate a 16-bit PCM mono WAV file.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let audio_error = |message: String| ServiceError::Audio {
            path: path.to_path_buf(),
            message,
        };
        let reader = hound::WavReader::open(path).map_err(|e| audio_error(e.to_string()))?;
        let spec = reader.spec();
        if spec.channels != 1
            || spec.bits_per_sample != 16
            || spec.sample_format != hound::SampleFormat::Int
        {
            return Err(audio_error(format!(
                "expected 16-bit PCM mono, got {} channel(s) of {}-bit {:?}",
                spec.channels, spec.bits_per_sample, spec.sample_format
            )));
        }
        drop(reader);

        let bytes = std::fs::read(path).map_err(|e| audio_error(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            sample_rate: spec.sample_rate,
            bytes,
        })
    }
}

/// Escape text for inclusion in SSML.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Locale prefix of a voice name: `en-GB-LibbyNeural` -> `en-GB`.
fn voice_locale(voice: &str) -> &str {
    let mut dashes = voice.match_indices('-').map(|(i, _)| i);
    match (dashes.next(), dashes.next()) {
        (Some(_), Some(second)) => &voice[..second],
        _ => "en-US",
    }
}

fn speak_document(voice: &str, inner: &str) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{}'>\
         <voice name='{}'>{}</voice></speak>",
        voice_locale(voice),
        escape_xml(voice),
        inner
    )
}

/// SSML that speaks `text` with `voice`.
pub fn plain_ssml(voice: &str, text: &str) -> String {
    speak_document(voice, &escape_xml(text))
}

/// SSML that speaks `text`, pauses briefly, then speaks `closing`.
pub fn announcement_ssml(voice: &str, text: &str, closing: &str) -> String {
    let inner = format!(
        "{}<break strength='weak'/>{}",
        escape_xml(text),
        escape_xml(closing)
    );
    speak_document(voice, &inner)
}

impl SpeechClient {
    pub fn new(
        key: impl Into<String>,
        region: &str,
        language: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, ServiceError> {
        let region = region.trim();
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            key: key.into(),
            region: region.to_string(),
            language: language.into(),
            stt_base: format!("https://{region}.stt.speech.microsoft.com"),
            tts_base: format!("https://{region}.tts.speech.microsoft.com"),
        })
    }

    /// Point recognition and synthesis at other hosts.
    pub fn with_base_urls(mut self, stt_base: impl Into<String>, tts_base: impl Into<String>) -> Self {
        self.stt_base = stt_base.into();
        self.tts_base = tts_base.into();
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Recognition locale, such as `en-US`.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Transcribe one utterance.
    pub async fn recognize(&self, audio: &WavAudio) -> Result<SpeechRecognition, ServiceError> {
        let mut url = endpoint_url(
            &self.stt_base,
            "speech/recognition/conversation/cognitiveservices/v1",
        )?;
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("format", "simple");

        tracing::debug!(%url, path = %audio.path.display(), "recognizing speech");
        let resp = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/wav; codecs=audio/pcm; samplerate={}", audio.sample_rate),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .body(audio.bytes.clone())
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        read_json(SERVICE, resp).await
    }

    /// Render SSML to WAV bytes.
    pub async fn synthesize(&self, ssml: &str) -> Result<Vec<u8>, ServiceError> {
        let url = endpoint_url(&self.tts_base, "cognitiveservices/v1")?;

        tracing::debug!(%url, "synthesizing speech");
        let resp = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml.to_string())
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(SERVICE, status.as_u16(), &body));
        }
        let audio = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;
        Ok(audio.to_vec())
    }

    /// Render SSML and write the audio to `path`.
    pub async fn synthesize_to_file(&self, ssml: &str, path: &Path) -> Result<(), ServiceError> {
        let audio = self.synthesize(ssml).await?;
        std::fs::write(path, audio).map_err(|e| ServiceError::Audio {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl CognitiveService for SpeechClient {
    const NAME: &'static str = "Speech";
    const REQUIRED_SETTINGS: &'static [&'static str] =
        &["speech.key", "speech.region", "speech.language"];

    fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Ok(Self::new(
            settings.require("speech.key")?,
            &settings.require("speech.region")?,
            settings.require("speech.language")?,
            settings.timeout(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(path: &Path, channels: u16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..160 * channels as i32 {
            writer.write_sample((i % 64) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn loads_mono_pcm() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("command.wav");
        write_wav(&path, 1);

        let audio = WavAudio::load(&path).unwrap();
        assert_eq!(audio.sample_rate, 16_000);
        assert!(audio.bytes.starts_with(b"RIFF"));
    }

    #[test]
    fn rejects_stereo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2);
        assert!(matches!(WavAudio::load(&path), Err(ServiceError::Audio { .. })));
    }

    #[test]
    fn rejects_non_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.wav");
        std::fs::write(&path, "definitely not audio").unwrap();
        assert!(WavAudio::load(&path).is_err());
    }

    #[test]
    fn ssml_escapes_text_and_uses_voice_locale() {
        let ssml = plain_ssml("fr-FR-HenriNeural", "Tom & Jerry <3");
        assert!(ssml.contains("xml:lang='fr-FR'"));
        assert!(ssml.contains("<voice name='fr-FR-HenriNeural'>Tom &amp; Jerry &lt;3</voice>"));
    }

    #[test]
    fn announcement_has_weak_break() {
        let ssml = announcement_ssml("en-GB-LibbyNeural", "The time is 9:05", "Time to end this lab!");
        assert!(ssml.contains("The time is 9:05<break strength='weak'/>Time to end this lab!"));
        assert!(ssml.contains("xml:lang='en-GB'"));
    }

    #[test]
    fn voice_locale_falls_back_for_odd_names() {
        assert_eq!(voice_locale("custom"), "en-US");
        assert_eq!(voice_locale("hi-IN-MadhurNeural"), "hi-IN");
    }

    #[test]
    fn recognition_text_requires_success() {
        let ok: SpeechRecognition =
            serde_json::from_str(r#"{"RecognitionStatus":"Success","DisplayText":"What time is it?"}"#)
                .unwrap();
        assert_eq!(ok.text(), Some("What time is it?"));

        let miss: SpeechRecognition =
            serde_json::from_str(r#"{"RecognitionStatus":"NoMatch"}"#).unwrap();
        assert_eq!(miss.text(), None);
    }
}
