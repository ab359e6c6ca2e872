use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::tokens::RawFragment;

pub trait TextExtractor {
    fn page_count(&self) -> Result<usize>;

    fn extract_fragments(&self, page: u32) -> Result<Vec<RawFragment>>;
}

pub trait TextRecognizer {
    fn recognize(&self, page: u32) -> Result<String>;
}

pub trait PageRenderer {
    fn render_page(&self, page: u32, scale: f64, output_stem: &Path) -> Result<PathBuf>;
}
