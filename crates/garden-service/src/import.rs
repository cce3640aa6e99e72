//! File import splitting.
//!
//! Turns raw file content into discrete note strings; each string is handed
//! individually to note creation. No analysis logic lives here.

/// Minimum chunk length for an imported note.
const MIN_NOTE_LENGTH: usize = 10;

/// Split file content into note strings based on the file name.
///
/// - `.txt` / `.md`: paragraph-delimited (blank line); short fragments are
///   dropped.
/// - `.csv`: first column per row, header row skipped.
/// - anything else: no notes.
pub fn split_notes(content: &str, file_name: &str) -> Vec<String> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".txt") || lower.ends_with(".md") {
        split_paragraphs(content)
    } else if lower.ends_with(".csv") {
        split_csv(content)
    } else {
        Vec::new()
    }
}

fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| p.len() > MIN_NOTE_LENGTH)
        .map(String::from)
        .collect()
}

fn split_csv(content: &str) -> Vec<String> {
    content
        .lines()
        .skip(1) // header
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect()
}
