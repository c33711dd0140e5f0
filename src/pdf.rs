use anyhow::{Context, Result};
use std::path::Path;

use crate::chunking::clean_text;
use crate::models::PageText;

/// Extract the cleaned text of every page, numbered from 1.
pub fn read_pdf_pages(path: &Path) -> Result<Vec<PageText>> {
    if !path.exists() {
        anyhow::bail!(
            "Could not find {}. Put the PDF at {}",
            path.display(),
            path.display()
        );
    }

    let raw = pdf_extract::extract_text_by_pages(path)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;

    Ok(pages_from_raw(raw))
}

fn pages_from_raw(raw: Vec<String>) -> Vec<PageText> {
    raw.into_iter()
        .enumerate()
        .map(|(i, text)| PageText {
            page: i as u32 + 1,
            text: clean_text(&text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_pdf_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.pdf");
        let err = read_pdf_pages(&path).unwrap_err();
        assert!(err.to_string().contains("Could not find"));
    }

    #[test]
    fn test_pages_are_one_based_and_cleaned() {
        let pages = pages_from_raw(vec!["  Intro\n\ntext ".into(), "\n".into()]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], PageText { page: 1, text: "Intro text".into() });
        assert_eq!(pages[1].page, 2);
        assert!(pages[1].text.is_empty());
    }
}
