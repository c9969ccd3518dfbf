use ailab_core::labs::speech_translate;
use ailab_core::services::{SpeechClient, TranslatorClient};
use ailab_core::CognitiveService;
use std::path::Path;

use super::{block_on, service_settings};

pub fn run(
    input: &Path,
    output_dir: &Path,
    settings: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let speech = SpeechClient::from_settings(&settings)?;
    let translator = TranslatorClient::from_settings(&settings)?;
    std::fs::create_dir_all(output_dir)?;

    let mut stdin = std::io::stdin().lock();
    let mut out = std::io::stdout().lock();
    let spoken = block_on(speech_translate::run_speech_translation(
        &speech,
        &translator,
        input,
        output_dir,
        &mut stdin,
        &mut out,
    ))??;
    for item in &spoken {
        tracing::info!(language = %item.language, path = %item.path.display(), "translation spoken");
    }
    Ok(())
}
