const CJK_TERMINALS: &[char] = &['。', '！', '？'];
const LATIN_TERMINALS: &[char] = &['.', '?', '!'];
const OPENING_QUOTES: &[char] = &['"', '“', '”', '\'', '‘'];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScriptMode {
    Cjk,
    Latin,
}

impl ScriptMode {
    pub fn detect(normalized: &str) -> Self {
        if normalized.contains(CJK_TERMINALS) {
            Self::Cjk
        } else {
            Self::Latin
        }
    }
}

pub fn segment(text: &str) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    match ScriptMode::detect(&normalized) {
        ScriptMode::Cjk => split_cjk(&normalized),
        ScriptMode::Latin => split_latin(&normalized),
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn split_cjk(normalized: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;

    for (index, character) in normalized.char_indices() {
        if CJK_TERMINALS.contains(&character) {
            let end = index + character.len_utf8();
            push_trimmed(&mut sentences, &normalized[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut sentences, &normalized[start..]);

    sentences
}

pub fn split_latin(normalized: &str) -> Vec<String> {
    let characters = normalized.char_indices().collect::<Vec<(usize, char)>>();
    let mut sentences = Vec::new();
    let mut start = 0usize;

    for window in characters.windows(3) {
        let (_, previous) = window[0];
        let (space_index, space) = window[1];
        let (_, next) = window[2];

        if space != ' ' || !LATIN_TERMINALS.contains(&previous) {
            continue;
        }
        if !(next.is_ascii_uppercase() || next.is_ascii_digit() || OPENING_QUOTES.contains(&next)) {
            continue;
        }

        push_trimmed(&mut sentences, &normalized[start..space_index]);
        start = space_index + space.len_utf8();
    }
    push_trimmed(&mut sentences, &normalized[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
