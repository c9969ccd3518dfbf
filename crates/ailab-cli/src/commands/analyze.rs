use ailab_core::labs::text_analysis;
use ailab_core::services::TextAnalyticsClient;
use ailab_core::CognitiveService;
use std::path::Path;

use super::{block_on, service_settings};

pub fn run(folder: &Path, settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let client = TextAnalyticsClient::from_settings(&settings)?;
    let mut out = std::io::stdout().lock();

    let analyzed = block_on(text_analysis::run_text_analysis(&client, folder, &mut out))??;
    tracing::info!(analyzed, "text analysis finished");
    Ok(())
}
