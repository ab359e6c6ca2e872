use std::collections::HashSet;

use crate::model::QuoteCandidate;
use crate::segment::{normalize_whitespace, segment};

const PAUSE_MARKS: &[char] = &['、', ',', '，', ':', '：', ';', '；'];
const LENGTH_FIT_BONUS: f64 = 10.0;
const LENGTH_MISS_PENALTY_PER_CHAR: f64 = 0.2;
const KEYWORD_BONUS: f64 = 3.0;
const PAUSE_BONUS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct QuoteQuery {
    pub keywords: Vec<String>,
    pub min_len: usize,
    pub max_len: usize,
    pub count: usize,
}

impl Default for QuoteQuery {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            min_len: 15,
            max_len: 160,
            count: 6,
        }
    }
}

pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn pick_quotes(full_text: &str, query: &QuoteQuery) -> Vec<QuoteCandidate> {
    let sentences = segment(full_text);
    let mut candidates = score_sentences(&sentences, &query.keywords, query.min_len, query.max_len);
    candidates.truncate(query.count);
    candidates
}

pub fn score_sentences(
    sentences: &[String],
    keywords: &[String],
    min_len: usize,
    max_len: usize,
) -> Vec<QuoteCandidate> {
    let keywords = keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .collect::<Vec<&str>>();
    let mut seen = HashSet::<String>::new();
    let mut candidates = Vec::new();

    for sentence in sentences {
        let normalized = normalize_whitespace(sentence);
        if normalized.is_empty() || !seen.insert(normalized.clone()) {
            continue;
        }

        let length = normalized.chars().count();
        if length < 2 {
            continue;
        }

        let score = length_score(length, min_len, max_len)
            + keyword_score(&normalized, &keywords)
            + if normalized.contains(PAUSE_MARKS) {
                PAUSE_BONUS
            } else {
                0.0
            };

        candidates.push(QuoteCandidate {
            text: normalized,
            score,
            length,
        });
    }

    candidates.sort_by(|left, right| {
        right
            .score
            .total_cmp(&left.score)
            .then(right.length.cmp(&left.length))
    });
    candidates
}

fn length_score(length: usize, min_len: usize, max_len: usize) -> f64 {
    if (min_len..=max_len).contains(&length) {
        return LENGTH_FIT_BONUS;
    }

    let distance = if length < min_len {
        min_len - length
    } else {
        length.saturating_sub(max_len)
    };
    -(distance as f64) * LENGTH_MISS_PENALTY_PER_CHAR
}

fn keyword_score(text: &str, keywords: &[&str]) -> f64 {
    keywords
        .iter()
        .filter(|keyword| text.contains(**keyword))
        .count() as f64
        * KEYWORD_BONUS
}
