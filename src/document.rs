//! Message-level translation that keeps the line structure intact.

use crate::segment::{LineResult, SegmentTranslator};

pub const LINE_BREAK: char = '\n';

/// Translated lines, one per input line, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub lines: Vec<LineResult>,
}

impl TranslatedDocument {
    /// Rejoin the lines with the same break character the input was split on
    pub fn to_text(&self) -> String {
        let mut buf = [0u8; 4];
        let separator: &str = LINE_BREAK.encode_utf8(&mut buf);
        self.lines
            .iter()
            .map(LineResult::text)
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines the backend could not translate
    pub fn passthrough_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_passthrough()).count()
    }
}

pub struct DocumentTranslator {
    segments: SegmentTranslator,
}

impl DocumentTranslator {
    pub fn new(segments: SegmentTranslator) -> Self {
        DocumentTranslator { segments }
    }

    /// Translate `text` line by line.
    ///
    /// Splits only on `\n`; a `\r` before it stays part of the line. Lines are
    /// resolved sequentially so results come back in order.
    pub async fn translate_document(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> TranslatedDocument {
        let mut lines = Vec::new();
        for line in text.split(LINE_BREAK) {
            lines.push(self.segments.translate_line(line, source, target).await);
        }
        TranslatedDocument { lines }
    }
}
