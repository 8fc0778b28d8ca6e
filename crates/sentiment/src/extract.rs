use crate::error::SentimentError;

/// Turns a fetched document into pages of text.
pub trait TextExtractor: Send + Sync {
    /// # Errors
    /// Returns `EmptyText` when the document yields no text.
    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, SentimentError>;
}

/// Decodes UTF-8 text (lossily), splitting pages on form feeds.
///
/// Text produced by PDF-to-text tools uses form feeds between pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, SentimentError> {
        let text = String::from_utf8_lossy(bytes);
        let pages: Vec<String> = text
            .split('\u{c}')
            .map(str::trim)
            .filter(|page| !page.is_empty())
            .map(str::to_string)
            .collect();

        if pages.is_empty() {
            return Err(SentimentError::EmptyText);
        }
        Ok(pages)
    }
}
