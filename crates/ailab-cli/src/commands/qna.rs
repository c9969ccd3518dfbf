use ailab_core::labs::qna;
use ailab_core::services::QuestionAnsweringClient;
use ailab_core::CognitiveService;
use std::path::Path;

use super::{block_on, service_settings};

pub fn run(settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let client = QuestionAnsweringClient::from_settings(&settings)?;
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout().lock();

    let asked = block_on(qna::run_qna(&client, &mut input, &mut out))??;
    tracing::info!(asked, "question answering finished");
    Ok(())
}
