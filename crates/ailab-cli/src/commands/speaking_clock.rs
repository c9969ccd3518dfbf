use ailab_core::labs::speaking_clock;
use ailab_core::services::SpeechClient;
use ailab_core::{CognitiveService, SystemClock};
use std::path::Path;

use super::{block_on, service_settings};

pub fn run(
    input: &Path,
    output: &Path,
    settings: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let client = SpeechClient::from_settings(&settings)?;

    let mut out = std::io::stdout().lock();
    let response = block_on(speaking_clock::run_speaking_clock(
        &client,
        &SystemClock,
        &settings.speech.clock_voice,
        input,
        output,
        &mut out,
    ))??;
    if response.is_some() {
        tracing::info!(output = %output.display(), "spoken answer written");
    }
    Ok(())
}
