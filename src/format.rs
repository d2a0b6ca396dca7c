//! Builds outbound chat messages and keeps each under the size limit.

use crate::language::LanguagePair;

pub struct ResponseFormatter {
    max_len: usize,
}

impl ResponseFormatter {
    /// `max_len` is in characters and is clamped to at least 1
    pub fn new(max_len: usize) -> Self {
        ResponseFormatter {
            max_len: max_len.max(1),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Indicator line plus translated text, split into consecutive chunks.
    ///
    /// Chunks are fixed-width slices of `max_len` characters; they ignore
    /// line and markup boundaries. Concatenated, they equal the full response.
    pub fn format(&self, pair: &LanguagePair, translated: &str) -> Vec<String> {
        let response = format!("{}\n{}", pair.indicator(), translated);
        self.paginate(&response)
    }

    pub fn paginate(&self, response: &str) -> Vec<String> {
        if response.chars().count() <= self.max_len {
            return vec![response.to_string()];
        }

        let chars: Vec<char> = response.chars().collect();
        chars
            .chunks(self.max_len)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}
