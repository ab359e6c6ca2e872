use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

impl Location {
    /// The origin doubles as "no location"; a token placed exactly at (0, 0)
    /// is treated as a placeholder.
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn anchor(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y - self.height / 2.0)
    }

    pub fn highlight_rect(&self, padding: f64) -> HighlightRect {
        HighlightRect {
            x: (self.x - padding).max(0.0),
            y: (self.y - self.height - padding).max(0.0),
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub page: u32,
    pub text: String,
    pub sequence_index: usize,
    pub location: Option<Location>,
}

impl Token {
    pub fn spatial_location(&self) -> Option<&Location> {
        self.location.as_ref().filter(|location| !location.is_origin())
    }

    pub fn is_spatial(&self) -> bool {
        self.spatial_location().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub start_char: usize,
    pub end_char: usize,
    pub token_indices: Vec<usize>,
}

impl Sentence {
    pub fn owns_token(&self, sequence_index: usize) -> bool {
        self.token_indices.contains(&sequence_index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteCandidate {
    pub text: String,
    pub score: f64,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageProvenance {
    pub page: u32,
    pub backend: String,
    pub reason: String,
    pub token_count: usize,
    pub text_char_count: usize,
    pub ocr_char_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: String,
    pub sha256: String,
    pub page_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolVersions {
    pub pdfinfo: Option<String>,
    pub pdftotext: Option<String>,
    pub pdftoppm: Option<String>,
    pub tesseract: Option<String>,
}
