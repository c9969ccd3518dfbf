//! Question answering chat loop.

use std::io::{self, BufRead, Write};

use super::prompt_line;
use crate::error::Result;
use crate::services::{KnowledgeBaseAnswer, QuestionAnsweringClient};

pub const PROMPT: &str = "Question: ";

/// Ask each question typed on `input` until `quit`; returns how many
/// questions were sent.
pub async fn run_qna<I: BufRead, W: Write>(
    client: &QuestionAnsweringClient,
    input: &mut I,
    out: &mut W,
) -> Result<usize> {
    let mut asked = 0;
    while let Some(question) = prompt_line(input, out, PROMPT)? {
        if question.trim().is_empty() {
            continue;
        }
        asked += 1;
        match client.get_answers(&question).await {
            Ok(answers) => write_answers(out, &answers)?,
            Err(e) => {
                tracing::warn!(error = %e, "question answering failed");
                writeln!(out, "{e}")?;
            }
        }
    }
    Ok(asked)
}

pub fn write_answers<W: Write>(out: &mut W, answers: &[KnowledgeBaseAnswer]) -> io::Result<()> {
    for answer in answers {
        writeln!(out, "{}", answer.answer)?;
        writeln!(out, "Confidence: {:.2}%", answer.confidence_score * 100.0)?;
        writeln!(out, "Source: {}", answer.source)?;
        writeln!(out)?;
    }
    Ok(())
}
