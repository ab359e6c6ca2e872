use crate::model::{Sentence, Token};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenChoice {
    Nearest { distance_sq: f64 },
    FirstToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClick<'a> {
    pub sentence: &'a Sentence,
    pub token: &'a Token,
    pub token_choice: TokenChoice,
    pub owner_found: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickResolution<'a> {
    Resolved(ResolvedClick<'a>),
    NoTextOnPage,
    SentenceDetectionFailed,
}

impl ClickResolution<'_> {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Resolved(resolved) => Some(resolved.sentence.text.as_str()),
            _ => None,
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::NoTextOnPage => "no_text_on_page",
            Self::SentenceDetectionFailed => "sentence_detection_failed",
        }
    }
}

pub fn resolve_click<'a>(
    tokens: &'a [Token],
    sentences: &'a [Sentence],
    click_x: f64,
    click_y: f64,
) -> ClickResolution<'a> {
    let Some((token, token_choice)) = choose_token(tokens, click_x, click_y) else {
        return ClickResolution::NoTextOnPage;
    };

    let owner = sentences
        .iter()
        .find(|sentence| sentence.owns_token(token.sequence_index));
    let owner_found = owner.is_some();
    let Some(sentence) = owner.or_else(|| sentences.first()) else {
        return ClickResolution::SentenceDetectionFailed;
    };

    ClickResolution::Resolved(ResolvedClick {
        sentence,
        token,
        token_choice,
        owner_found,
    })
}

pub fn choose_token(tokens: &[Token], click_x: f64, click_y: f64) -> Option<(&Token, TokenChoice)> {
    let mut ordered = tokens.iter().collect::<Vec<&Token>>();
    ordered.sort_by_key(|token| token.sequence_index);

    let mut best: Option<(&Token, f64)> = None;
    for token in ordered.iter().copied() {
        let Some(location) = token.spatial_location() else {
            continue;
        };
        let (anchor_x, anchor_y) = location.anchor();
        let dx = anchor_x - click_x;
        let dy = anchor_y - click_y;
        let distance_sq = dx * dx + dy * dy;

        if best.is_none_or(|(_, best_distance)| distance_sq < best_distance) {
            best = Some((token, distance_sq));
        }
    }

    match best {
        Some((token, distance_sq)) => Some((token, TokenChoice::Nearest { distance_sq })),
        None => ordered
            .first()
            .map(|token| (*token, TokenChoice::FirstToken)),
    }
}
