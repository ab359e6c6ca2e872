use std::ops::Range;

use crate::model::{Location, Token};

#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    pub text: String,
    pub location: Option<Location>,
}

impl RawFragment {
    pub fn spatial(text: impl Into<String>, location: Location) -> Self {
        Self {
            text: text.into(),
            location: Some(location),
        }
    }
}

pub fn build_token_stream(page: u32, fragments: Vec<RawFragment>) -> Vec<Token> {
    fragments
        .into_iter()
        .filter(|fragment| !fragment.text.trim().is_empty())
        .enumerate()
        .map(|(sequence_index, fragment)| Token {
            page,
            text: fragment.text,
            sequence_index,
            location: fragment.location,
        })
        .collect()
}

pub fn placeholder_tokens(page: u32, recognized: &str) -> Vec<Token> {
    recognized
        .split_whitespace()
        .enumerate()
        .map(|(sequence_index, piece)| Token {
            page,
            text: piece.to_string(),
            sequence_index,
            location: None,
        })
        .collect()
}

/// Single-space join of token texts in sequence order. Character offsets
/// elsewhere are only valid against this exact string.
pub fn page_text(tokens: &[Token]) -> String {
    ordered(tokens)
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn token_ranges(tokens: &[Token]) -> Vec<(usize, Range<usize>)> {
    let mut cursor = 0usize;
    ordered(tokens)
        .into_iter()
        .map(|token| {
            let length = token.text.chars().count();
            let range = cursor..cursor + length;
            cursor += length + 1;
            (token.sequence_index, range)
        })
        .collect()
}

pub fn ordered(tokens: &[Token]) -> Vec<&Token> {
    let mut ordered = tokens.iter().collect::<Vec<&Token>>();
    ordered.sort_by_key(|token| token.sequence_index);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(text: &str, x: f64) -> RawFragment {
        RawFragment::spatial(
            text,
            Location {
                x,
                y: 20.0,
                width: 10.0,
                height: 12.0,
                font_size: 10.0,
            },
        )
    }

    #[test]
    fn blank_fragments_are_dropped_before_numbering() {
        let tokens = build_token_stream(
            3,
            vec![
                located("Hello", 1.0),
                located("   ", 2.0),
                located("", 3.0),
                located("world", 4.0),
            ],
        );

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].sequence_index, 0);
        assert_eq!(tokens[1].sequence_index, 1);
        assert_eq!(tokens[1].text, "world");
        assert!(tokens.iter().all(|token| token.page == 3));
    }

    #[test]
    fn token_ranges_follow_the_single_space_join() {
        let tokens = build_token_stream(1, vec![located("Hello", 1.0), located("world", 2.0)]);

        assert_eq!(page_text(&tokens), "Hello world");
        assert_eq!(token_ranges(&tokens), vec![(0, 0..5), (1, 6..11)]);
    }

    #[test]
    fn token_ranges_count_characters_not_bytes() {
        let tokens = placeholder_tokens(1, "日本語 テキスト");

        assert_eq!(page_text(&tokens), "日本語 テキスト");
        assert_eq!(token_ranges(&tokens), vec![(0, 0..3), (1, 4..8)]);
    }

    #[test]
    fn join_order_is_sequence_order() {
        let mut tokens = build_token_stream(1, vec![located("a", 1.0), located("b", 2.0)]);
        tokens.reverse();

        assert_eq!(page_text(&tokens), "a b");
        assert_eq!(token_ranges(&tokens)[0], (0, 0..1));
    }

    #[test]
    fn placeholders_split_on_any_whitespace() {
        let tokens = placeholder_tokens(2, "  OCR\ttext\n\nhere ");

        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|token| token.location.is_none()));
        assert_eq!(
            tokens
                .iter()
                .map(|token| token.sequence_index)
                .collect::<Vec<usize>>(),
            vec![0, 1, 2]
        );
        assert_eq!(page_text(&tokens), "OCR text here");
    }
}
