//! Citation excerpts and page references in generated answers

use regex::Regex;
use std::sync::OnceLock;

/// Marker appended to truncated excerpts
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Page numbers the answer refers to ("page 3", "Page 12", "pages 4 and 5"),
/// sorted and de-duplicated
pub fn referenced_pages(answer: &str) -> Vec<u32> {
    static PAGE_REF: OnceLock<Regex> = OnceLock::new();
    static NUMBER: OnceLock<Regex> = OnceLock::new();

    let page_ref = PAGE_REF.get_or_init(|| {
        Regex::new(r"(?i)\bpages?\s+(\d+(?:\s*(?:,|and|&|-|to)\s*\d+)*)").expect("valid regex")
    });
    let number = NUMBER.get_or_init(|| Regex::new(r"\d+").expect("valid regex"));

    let mut pages: Vec<u32> = page_ref
        .captures_iter(answer)
        .filter_map(|cap| cap.get(1))
        .flat_map(|list| {
            number
                .find_iter(list.as_str())
                .filter_map(|m| m.as_str().parse().ok())
                .collect::<Vec<u32>>()
        })
        .collect();

    pages.sort_unstable();
    pages.dedup();
    pages
}
