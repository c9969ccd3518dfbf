use ailab_core::labs::translate;
use ailab_core::services::TranslatorClient;
use ailab_core::CognitiveService;
use std::path::Path;

use super::{block_on, service_settings};

pub fn run(settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let client = TranslatorClient::from_settings(&settings)?;
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout().lock();

    let translated = block_on(translate::run_translation(&client, &mut input, &mut out))??;
    tracing::info!(translated, "translation finished");
    Ok(())
}
