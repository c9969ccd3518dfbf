//! Interactive clock client: read an utterance, recognize it, answer it.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::prompt_line;
use crate::clock::{Clock, IntentDispatcher, IntentRecognizer};
use crate::error::Result;
use crate::services::speech::{plain_ssml, SpeechClient};

pub const PROMPT: &str = "\nEnter some text ('quit' to stop)\n";
const SEPARATOR: &str = "--------------------\n";

/// Speaks each answer into `answer-N.wav` files under a directory.
pub struct AnswerSpeaker<'a> {
    client: &'a SpeechClient,
    voice: String,
    dir: PathBuf,
}

impl<'a> AnswerSpeaker<'a> {
    pub fn new(client: &'a SpeechClient, voice: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            voice: voice.into(),
            dir: dir.into(),
        }
    }

    pub fn path_for(&self, turn: usize) -> PathBuf {
        self.dir.join(format!("answer-{turn}.wav"))
    }

    async fn speak(&self, turn: usize, answer: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(turn);
        self.client
            .synthesize_to_file(&plain_ssml(&self.voice, answer), &path)
            .await?;
        Ok(path)
    }
}

/// Options for [`run_chat`].
#[derive(Default)]
pub struct ChatOptions<'a> {
    /// Print the recognizer's full response as pretty JSON before each answer.
    pub show_json: bool,
    pub speaker: Option<AnswerSpeaker<'a>>,
}

/// Run the chat loop until `quit` or end of input.
///
/// Recognizer and speech failures are reported on `out` and the loop moves
/// on to the next utterance. Returns the answers given, in order.
pub async fn run_chat<R, C, I, W>(
    recognizer: &R,
    dispatcher: &IntentDispatcher<C>,
    options: &ChatOptions<'_>,
    input: &mut I,
    out: &mut W,
) -> Result<Vec<String>>
where
    R: IntentRecognizer,
    C: Clock,
    I: BufRead,
    W: Write,
{
    let mut answers = Vec::new();

    while let Some(utterance) = prompt_line(input, out, PROMPT)? {
        if utterance.trim().is_empty() {
            continue;
        }

        let recognized = if options.show_json {
            recognizer
                .recognize_detailed(&utterance)
                .await
                .map(|detailed| (detailed.result, Some(detailed.raw)))
        } else {
            recognizer.recognize(&utterance).await.map(|result| (result, None))
        };
        let (result, raw) = match recognized {
            Ok(recognized) => recognized,
            Err(e) => {
                tracing::warn!(error = %e, "recognition failed");
                writeln!(out, "{e}")?;
                continue;
            }
        };
        tracing::debug!(intent = %result.top_intent, confidence = result.confidence_score, "recognized");

        if let Some(raw) = raw {
            writeln!(out, "{}", serde_json::to_string_pretty(&raw)?)?;
        }

        let answer = dispatcher.dispatch(&result);
        write!(out, "{SEPARATOR}")?;
        writeln!(out, "{utterance}")?;
        writeln!(out, "{answer}")?;

        if let Some(speaker) = &options.speaker {
            let turn = answers.len() + 1;
            match speaker.speak(turn, &answer).await {
                Ok(path) => writeln!(out, "(spoken to {})", path.display())?,
                Err(e) => {
                    tracing::warn!(error = %e, "speech synthesis failed");
                    writeln!(out, "Speech synthesis failed: {e}")?;
                }
            }
        }
        answers.push(answer);
    }

    Ok(answers)
}
