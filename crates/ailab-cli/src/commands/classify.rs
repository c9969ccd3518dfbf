use ailab_core::labs::classify;
use ailab_core::services::ClassificationClient;
use ailab_core::CognitiveService;
use std::path::Path;

use super::{block_on, service_settings};

pub fn run(folder: &Path, settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let client = ClassificationClient::from_settings(&settings)?;
    let mut out = std::io::stdout().lock();

    let classified = block_on(classify::run_classification(&client, folder, &mut out))??;
    tracing::info!(classified, "classification finished");
    Ok(())
}
