//! Plain-text helpers for fetched documents

use crate::error::{Result, StockError};
use std::collections::HashSet;

/// Line width used when rendering HTML to text
const TEXT_WIDTH: usize = 120;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "what", "was", "were", "are", "with", "this", "that", "from", "how",
    "about", "which", "their", "its", "has", "have", "did", "does", "company",
];

/// Render an HTML body as plain text, falling back to the raw bytes
pub fn html_to_text(body: &[u8]) -> String {
    html2text::from_read(body, TEXT_WIDTH)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).to_string())
}

/// Render an HTML body as plain text on the blocking thread pool
pub async fn render_html<B>(body: B) -> Result<String>
where
    B: AsRef<[u8]> + Send + 'static,
{
    tokio::task::spawn_blocking(move || html_to_text(body.as_ref()))
        .await
        .map_err(|e| StockError::ApiError(format!("HTML conversion failed: {e}")))
}

/// Split text into chunks of at most `size` characters
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn query_terms(query: &str) -> HashSet<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() >= 3)
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Group paragraphs into passages of at most `passage_chars` characters
///
/// Paragraphs longer than a passage are hard-split first.
fn passages(text: &str, passage_chars: usize) -> Vec<String> {
    let passage_chars = passage_chars.max(1);
    let mut passages = Vec::new();
    let mut current = String::new();

    let pieces = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .flat_map(|paragraph| {
            if paragraph.chars().count() > passage_chars {
                chunk_text(paragraph, passage_chars)
            } else {
                vec![paragraph.to_string()]
            }
        });

    for piece in pieces {
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 2 + piece.chars().count() > passage_chars {
            passages.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(&piece);
    }

    if !current.is_empty() {
        passages.push(current);
    }
    passages
}

/// Up to `max_passages` passages of `text` that best match `query`
///
/// Passages are scored by query-term occurrences and returned in document
/// order. Passages with no matching term are never returned.
pub fn relevant_passages(
    text: &str,
    query: &str,
    max_passages: usize,
    passage_chars: usize,
) -> Vec<String> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let candidates = passages(text, passage_chars);
    let mut scored: Vec<(usize, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(i, passage)| {
            let lower = passage.to_lowercase();
            let score = terms.iter().map(|t| lower.matches(t.as_str()).count()).sum();
            (i, score)
        })
        .filter(|(_, score)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(max_passages);
    scored.sort_by_key(|(i, _)| *i);

    scored
        .into_iter()
        .map(|(i, _)| candidates[i].clone())
        .collect()
}
