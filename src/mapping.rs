use tracing::debug;

use crate::model::{Sentence, Token};
use crate::segment::segment;
use crate::tokens::token_ranges;

pub fn map_sentences(page_text: &str, tokens: &[Token]) -> Vec<Sentence> {
    let ranges = token_ranges(tokens);
    let mut cursor = TextCursor::new(page_text);
    let mut sentences = Vec::new();

    for text in segment(page_text) {
        let Some((start_char, end_char)) = cursor.find_next(&text) else {
            debug!(sentence = %text, "sentence not found in page text, skipping");
            cursor.skip_chars(text.chars().count() + 1);
            continue;
        };

        // Inclusive at both ends: a token ending exactly where the sentence
        // starts is still counted.
        let token_indices = ranges
            .iter()
            .filter(|(_, range)| !(range.end < start_char || range.start > end_char))
            .map(|(sequence_index, _)| *sequence_index)
            .collect();

        sentences.push(Sentence {
            text,
            start_char,
            end_char,
            token_indices,
        });
    }

    sentences
}

struct TextCursor<'a> {
    haystack: &'a str,
    byte: usize,
    char: usize,
}

impl<'a> TextCursor<'a> {
    fn new(haystack: &'a str) -> Self {
        Self {
            haystack,
            byte: 0,
            char: 0,
        }
    }

    fn find_next(&mut self, needle: &str) -> Option<(usize, usize)> {
        let rest = &self.haystack[self.byte..];
        let offset = rest.find(needle)?;

        let start_char = self.char + rest[..offset].chars().count();
        let end_char = start_char + needle.chars().count();
        self.byte += offset + needle.len();
        self.char = end_char;
        Some((start_char, end_char))
    }

    fn skip_chars(&mut self, count: usize) {
        let rest = &self.haystack[self.byte..];
        let skipped = rest
            .char_indices()
            .nth(count)
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());
        self.char += rest[..skipped].chars().count();
        self.byte += skipped;
    }
}
