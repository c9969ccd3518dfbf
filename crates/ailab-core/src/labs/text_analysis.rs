//! Run every text file in a folder through the text analytics client.

use std::io::{self, Write};
use std::path::Path;

use super::read_documents;
use crate::error::Result;
use crate::services::{DocumentAnalysis, TextAnalyticsClient};

/// Analyze and print each `*.txt` file in `folder`. A failed document is
/// reported and skipped; the count of documents analyzed is returned.
pub async fn run_text_analysis<W: Write>(
    client: &TextAnalyticsClient,
    folder: &Path,
    out: &mut W,
) -> Result<usize> {
    let documents = read_documents(folder)?;
    tracing::info!(folder = %folder.display(), count = documents.len(), "analyzing documents");

    let mut analyzed = 0;
    for doc in &documents {
        match client.analyze_document(&doc.text).await {
            Ok(analysis) => {
                write_report(out, &doc.name, &doc.text, &analysis)?;
                analyzed += 1;
            }
            Err(e) => {
                tracing::warn!(file = %doc.name, error = %e, "analysis failed");
                writeln!(out, "\n-------------\n{}\n{e}", doc.name)?;
            }
        }
    }
    Ok(analyzed)
}

/// Print one document's analysis. Empty sections are left out.
pub fn write_report<W: Write>(
    out: &mut W,
    name: &str,
    text: &str,
    analysis: &DocumentAnalysis,
) -> io::Result<()> {
    writeln!(out, "\n-------------\n{name}")?;
    writeln!(out, "\n{text}")?;
    writeln!(out, "\nLanguage: {}", analysis.language.name)?;
    writeln!(out, "\nSentiment: {}", capitalize(&analysis.sentiment.sentiment))?;

    if !analysis.key_phrases.is_empty() {
        writeln!(out, "\nKey Phrases:")?;
        for phrase in &analysis.key_phrases {
            writeln!(out, "\t{phrase}")?;
        }
    }
    if !analysis.entities.is_empty() {
        writeln!(out, "\nEntities:")?;
        for entity in &analysis.entities {
            writeln!(out, "\t{} ({})", entity.text, entity.category)?;
        }
    }
    if !analysis.linked_entities.is_empty() {
        writeln!(out, "\nLinks:")?;
        for link in &analysis.linked_entities {
            writeln!(out, "\t{} ({})", link.name, link.url)?;
        }
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::text_analytics::{
        CategorizedEntity, DetectedLanguage, DocumentSentiment, LinkedEntity, SentimentScores,
    };

    fn analysis() -> DocumentAnalysis {
        DocumentAnalysis {
            language: DetectedLanguage {
                name: "English".to_string(),
                iso6391_name: "en".to_string(),
                confidence_score: 1.0,
            },
            sentiment: DocumentSentiment {
                sentiment: "positive".to_string(),
                confidence_scores: SentimentScores::default(),
            },
            key_phrases: vec!["Edinburgh".to_string(), "great hotel".to_string()],
            entities: vec![CategorizedEntity {
                text: "Edinburgh".to_string(),
                category: "Location".to_string(),
                subcategory: None,
                confidence_score: 0.99,
            }],
            linked_entities: Vec::new(),
        }
    }

    #[test]
    fn report_lists_sections_in_order() {
        let mut out = Vec::new();
        write_report(&mut out, "review1.txt", "Loved it.", &analysis()).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(
            printed,
            "\n-------------\nreview1.txt\n\nLoved it.\n\nLanguage: English\n\nSentiment: Positive\n\
             \nKey Phrases:\n\tEdinburgh\n\tgreat hotel\n\nEntities:\n\tEdinburgh (Location)\n"
        );
    }

    #[test]
    fn links_print_name_and_url() {
        let mut doc = analysis();
        doc.linked_entities.push(LinkedEntity {
            name: "Edinburgh".to_string(),
            url: "https://en.wikipedia.org/wiki/Edinburgh".to_string(),
            data_source: "Wikipedia".to_string(),
        });
        let mut out = Vec::new();
        write_report(&mut out, "a.txt", "x", &doc).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.ends_with("\nLinks:\n\tEdinburgh (https://en.wikipedia.org/wiki/Edinburgh)\n"));
    }

    #[test]
    fn capitalize_handles_empty_and_mixed() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("mixed"), "Mixed");
    }
}
