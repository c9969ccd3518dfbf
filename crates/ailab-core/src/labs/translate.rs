//! Interactive text translation.

use std::io::{BufRead, Write};

use super::prompt_line;
use crate::error::Result;
use crate::services::{TextTranslation, TranslatorClient};

const LANGUAGE_SUPPORT_URL: &str =
    "https://learn.microsoft.com/azure/ai-services/translator/language-support#translation";

/// Pick a target language, then translate each line until `quit`.
///
/// Returns the number of texts translated. Ends early, with zero, when input
/// runs out before a supported language is chosen.
pub async fn run_translation<I: BufRead, W: Write>(
    client: &TranslatorClient,
    input: &mut I,
    out: &mut W,
) -> Result<usize> {
    let languages = client.supported_languages().await?;
    writeln!(out, "{} languages available.\n(See {LANGUAGE_SUPPORT_URL})", languages.len())?;
    writeln!(out, "Enter a target language code for translation (for example, 'en'):")?;

    let target = loop {
        let Some(code) = prompt_line(input, out, "")? else {
            return Ok(0);
        };
        let code = code.trim().to_string();
        if languages.contains_key(&code) {
            break code;
        }
        writeln!(out, "{code} is not a supported language.")?;
    };
    tracing::debug!(%target, "target language selected");

    let mut translated = 0;
    while let Some(text) = prompt_line(input, out, "Enter text to translate ('quit' to exit)\n")? {
        match client.translate(&target, &text).await {
            Ok(translation) => {
                writeln!(out, "{}", describe(&text, &translation))?;
                translated += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "translation failed");
                writeln!(out, "{e}")?;
            }
        }
    }
    Ok(translated)
}

/// `'{input}' translated from {source} to {target} as '{text}'.`
pub fn describe(input: &str, translation: &TextTranslation) -> String {
    let source = translation.source_language().unwrap_or("unknown");
    let (to, text) = translation
        .first()
        .map(|t| (t.to.as_str(), t.text.as_str()))
        .unwrap_or(("", ""));
    format!("'{input}' translated from {source} to {to} as '{text}'.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_detected_source_and_target() {
        let translation: TextTranslation = serde_json::from_str(
            r#"{"detectedLanguage":{"language":"en","score":1.0},"translations":[{"text":"Bonjour","to":"fr"}]}"#,
        )
        .unwrap();
        assert_eq!(
            describe("Hello", &translation),
            "'Hello' translated from en to fr as 'Bonjour'."
        );
    }

    #[test]
    fn missing_detection_reads_unknown() {
        let translation: TextTranslation =
            serde_json::from_str(r#"{"translations":[{"text":"Hallo","to":"de"}]}"#).unwrap();
        assert_eq!(
            describe("Hello", &translation),
            "'Hello' translated from unknown to de as 'Hallo'."
        );
    }
}
