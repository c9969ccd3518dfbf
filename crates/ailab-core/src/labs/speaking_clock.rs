//! Speaking clock: transcribe a spoken command and, when it asks for the
//! time, answer out loud.

use std::io::Write;
use std::path::Path;

use crate::clock::{format_clock_time, Clock};
use crate::error::Result;
use crate::services::speech::{announcement_ssml, SpeechClient, WavAudio};

/// The one command the clock responds to, compared case-insensitively.
pub const TIME_QUESTION: &str = "what time is it?";
pub const CLOSING: &str = "Time to end this lab!";

/// `The time is H:mm` in local time.
pub fn time_announcement<C: Clock + ?Sized>(clock: &C) -> String {
    format!("The time is {}", format_clock_time(clock.now_local()))
}

/// Transcribe `command_wav`; if it is the time question, speak the time into
/// `output_wav` and return the announcement text.
///
/// Returns `Ok(None)` when nothing was recognized or the command was
/// something else.
pub async fn run_speaking_clock<C: Clock, W: Write>(
    client: &SpeechClient,
    clock: &C,
    voice: &str,
    command_wav: &Path,
    output_wav: &Path,
    out: &mut W,
) -> Result<Option<String>> {
    writeln!(out, "Ready to use speech service in {}", client.region())?;
    let audio = WavAudio::load(command_wav)?;
    let recognition = client.recognize(&audio).await?;

    let Some(command) = recognition.text() else {
        writeln!(out, "{}", recognition.recognition_status)?;
        return Ok(None);
    };
    writeln!(out, "{command}")?;

    if !command.trim().eq_ignore_ascii_case(TIME_QUESTION) {
        tracing::info!(%command, "not a time request");
        return Ok(None);
    }

    let response = time_announcement(clock);
    client
        .synthesize_to_file(&announcement_ssml(voice, &response, CLOSING), output_wav)
        .await?;
    writeln!(out, "{response}")?;
    Ok(Some(response))
}
