//! Text chunking with sentence-boundary awareness

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    /// Create a chunker from configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
            min_size: config.min_chunk_size,
        }
    }

    /// Split text into overlapping chunks along sentence boundaries
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in text.split_sentence_bounds() {
            // If adding this sentence exceeds chunk size, save current chunk
            if !current.is_empty() && current.len() + sentence.len() > self.chunk_size {
                if current.trim().len() >= self.min_size {
                    chunks.push(current.trim().to_string());
                }

                // Start new chunk with overlap from the previous one
                current = self.get_overlap_text(&current);
            }

            current.push_str(sentence);
        }

        if current.trim().len() >= self.min_size {
            chunks.push(current.trim().to_string());
        }

        chunks
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);

        // Ensure we're at a valid UTF-8 character boundary
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}
