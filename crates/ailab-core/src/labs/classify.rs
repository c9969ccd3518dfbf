//! Classify every text file in a folder with a custom single-label model.

use std::io::{self, Write};
use std::path::Path;

use super::{read_documents, Document};
use crate::error::Result;
use crate::services::{ClassificationClient, ClassificationOutcome, DocumentClassification};

/// Submit all `*.txt` files in `folder` as one batch and print a result per
/// file. Returns the number of files classified without error.
pub async fn run_classification<W: Write>(
    client: &ClassificationClient,
    folder: &Path,
    out: &mut W,
) -> Result<usize> {
    let documents = read_documents(folder)?;
    let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
    tracing::info!(folder = %folder.display(), count = texts.len(), "classifying documents");

    let results = client.classify(&texts).await?;
    write_results(out, &documents, &results)?;

    Ok(results
        .iter()
        .filter(|r| matches!(r.outcome, ClassificationOutcome::Classified(_)))
        .count())
}

/// Print results, naming each by the file at its batch index.
pub fn write_results<W: Write>(
    out: &mut W,
    documents: &[Document],
    results: &[DocumentClassification],
) -> io::Result<()> {
    for result in results {
        let name = documents
            .get(result.index)
            .map(|d| d.name.as_str())
            .unwrap_or("?");
        writeln!(out, "{name}")?;

        match &result.outcome {
            ClassificationOutcome::Failed(error) => {
                writeln!(out, "  Error!")?;
                writeln!(out, "  Document error code: {}", error.code)?;
                writeln!(out, "  Message: {}", error.message)?;
            }
            ClassificationOutcome::Classified(classes) => {
                writeln!(out, "  Predicted the following class:")?;
                writeln!(out)?;
                for class in classes {
                    writeln!(out, "  Category: {}", class.category)?;
                    writeln!(out, "  Confidence score: {}", class.confidence_score)?;
                    writeln!(out)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classification::ClassCategory;
    use crate::services::ErrorDetail;

    fn doc(name: &str) -> Document {
        Document {
            name: name.to_string(),
            text: String::new(),
        }
    }

    #[test]
    fn failures_keep_later_names_aligned() {
        let documents = [doc("empty.txt"), doc("match.txt")];
        let results = [
            DocumentClassification {
                index: 0,
                outcome: ClassificationOutcome::Failed(ErrorDetail {
                    code: "InvalidDocument".to_string(),
                    message: "Document text is empty.".to_string(),
                }),
            },
            DocumentClassification {
                index: 1,
                outcome: ClassificationOutcome::Classified(vec![ClassCategory {
                    category: "Sports".to_string(),
                    confidence_score: 0.91,
                }]),
            },
        ];

        let mut out = Vec::new();
        write_results(&mut out, &documents, &results).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "empty.txt\n  Error!\n  Document error code: InvalidDocument\n  Message: Document text is empty.\n\
             match.txt\n  Predicted the following class:\n\n  Category: Sports\n  Confidence score: 0.91\n\n"
        );
    }
}
