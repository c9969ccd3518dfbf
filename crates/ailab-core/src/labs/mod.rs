//! The lab samples: console loops that feed user input or files on disk to
//! a service client and print what comes back.
//!
//! Every sample takes its input as `BufRead` and writes to `Write`, so the
//! CLI wires them to stdin/stdout and tests wire them to buffers.

pub mod classify;
pub mod clock_client;
pub mod qna;
pub mod speaking_clock;
pub mod speech_translate;
pub mod text_analysis;
pub mod translate;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Typing this (any case) ends an interactive sample.
pub const QUIT: &str = "quit";

/// Write `prompt` and read one line of input.
///
/// Returns `None` at end of input or when the user types [`QUIT`]; the line
/// is returned without its line terminator.
pub fn prompt_line<I: BufRead, W: Write>(
    input: &mut I,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().eq_ignore_ascii_case(QUIT) {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

/// `*.txt` files directly inside `folder`, sorted by file name.
pub fn text_files(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// A text file read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Read every `*.txt` file in `folder`, in file-name order.
pub fn read_documents(folder: &Path) -> io::Result<Vec<Document>> {
    text_files(folder)?
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Document { name, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn prompt_line_stops_on_quit_any_case() {
        let mut input = Cursor::new("hello\r\n  QUIT \nnever read\n");
        let mut out = Vec::new();
        assert_eq!(
            prompt_line(&mut input, &mut out, "> ").unwrap().as_deref(),
            Some("hello")
        );
        assert_eq!(prompt_line(&mut input, &mut out, "> ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "> > ");
    }

    #[test]
    fn prompt_line_stops_at_eof() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert_eq!(prompt_line(&mut input, &mut out, "").unwrap(), None);
    }

    #[test]
    fn prompt_line_keeps_inner_whitespace() {
        let mut input = Cursor::new("  what time is it in Tokyo?  \n");
        let mut out = Vec::new();
        assert_eq!(
            prompt_line(&mut input, &mut out, "").unwrap().as_deref(),
            Some("  what time is it in Tokyo?  ")
        );
    }

    #[test]
    fn documents_are_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.TXT"), "first").unwrap();
        std::fs::write(dir.path().join("notes.md"), "skip").unwrap();
        std::fs::create_dir(dir.path().join("c.txt")).unwrap();

        let docs = read_documents(dir.path()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a.TXT", "b.txt"]);
        assert_eq!(docs[0].text, "first");
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_documents(&dir.path().join("absent")).is_err());
    }
}
