use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cli::OcrMode;
use crate::engines::{TextExtractor, TextRecognizer};
use crate::mapping::map_sentences;
use crate::model::{PageProvenance, QuoteCandidate, Sentence, SourceDocument, Token, ToolVersions};
use crate::quotes::{QuoteQuery, pick_quotes};
use crate::resolve::{ClickResolution, resolve_click};
use crate::tokens::{build_token_stream, page_text, placeholder_tokens};
use crate::util::{now_utc_string, write_json_pretty};

pub const SESSION_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPolicy {
    pub ocr_mode: OcrMode,
    pub ocr_lang: String,
    pub min_text_chars: usize,
    pub min_ocr_chars: usize,
    pub render_scale: f64,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            ocr_mode: OcrMode::Off,
            ocr_lang: "jpn".to_string(),
            min_text_chars: 8,
            min_ocr_chars: 3,
            render_scale: 1.25,
        }
    }
}

impl AnalysisPolicy {
    pub fn wants_recognition(&self, page_text: &str) -> bool {
        match self.ocr_mode {
            OcrMode::Off => false,
            OcrMode::Auto => page_text.trim().chars().count() < self.min_text_chars,
            OcrMode::Force => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub page: u32,
    pub text: String,
    pub tokens: Vec<Token>,
    pub sentences: Vec<Sentence>,
    pub provenance: PageProvenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: SourceDocument,
    pub tool_versions: ToolVersions,
    pub policy: AnalysisPolicy,
    pub pages: Vec<PageAnalysis>,
    pub warnings: Vec<String>,
}

impl Session {
    pub fn new(source: SourceDocument, policy: AnalysisPolicy) -> Self {
        Self {
            manifest_version: SESSION_MANIFEST_VERSION,
            generated_at: now_utc_string(),
            source,
            tool_versions: ToolVersions::default(),
            policy,
            pages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn analyze(
        source: SourceDocument,
        policy: AnalysisPolicy,
        extractor: &dyn TextExtractor,
        recognizer: Option<&dyn TextRecognizer>,
    ) -> Self {
        let mut session = Self::new(source, policy);
        let page_count = session.source.page_count as u32;

        for page in 1..=page_count {
            let analysis = analyze_page(
                page,
                &session.policy,
                extractor,
                recognizer,
                &mut session.warnings,
            );
            info!(
                page,
                tokens = analysis.tokens.len(),
                sentences = analysis.sentences.len(),
                backend = %analysis.provenance.backend,
                reason = %analysis.provenance.reason,
                "page analyzed"
            );
            session.pages.push(analysis);
        }

        session
    }

    pub fn page(&self, page: u32) -> Option<&PageAnalysis> {
        self.pages.iter().find(|analysis| analysis.page == page)
    }

    pub fn resolve_click(&self, page: u32, x: f64, y: f64) -> ClickResolution<'_> {
        match self.page(page) {
            Some(analysis) => resolve_click(&analysis.tokens, &analysis.sentences, x, y),
            None => ClickResolution::NoTextOnPage,
        }
    }

    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|analysis| analysis.text.as_str())
            .collect::<Vec<&str>>()
            .join("\n\n")
    }

    pub fn quote_candidates(&self, query: &QuoteQuery) -> Vec<QuoteCandidate> {
        pick_quotes(&self.full_text(), query)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, self)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let session: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if session.manifest_version != SESSION_MANIFEST_VERSION {
            bail!(
                "unsupported session manifest version {} in {} (expected {})",
                session.manifest_version,
                path.display(),
                SESSION_MANIFEST_VERSION
            );
        }

        Ok(session)
    }
}

pub fn analyze_page(
    page: u32,
    policy: &AnalysisPolicy,
    extractor: &dyn TextExtractor,
    recognizer: Option<&dyn TextRecognizer>,
    warnings: &mut Vec<String>,
) -> PageAnalysis {
    let mut reason = "text_layer_default";
    let fragments = match extractor.extract_fragments(page) {
        Ok(fragments) => fragments,
        Err(error) => {
            warn!(page, error = %error, "text extraction failed, continuing with empty page");
            warnings.push(format!("text extraction failed for page {page}: {error:#}"));
            reason = "text_layer_extract_failed";
            Vec::new()
        }
    };

    let mut tokens = build_token_stream(page, fragments);
    let mut text = page_text(&tokens);
    if text.is_empty() && reason == "text_layer_default" {
        reason = "text_layer_empty";
    }

    let mut backend = "text_layer";
    let mut ocr_char_count = None;

    if policy.wants_recognition(&text) {
        match recognizer {
            None => {
                warn!(page, "recognition requested but no OCR engine is available");
                warnings.push(format!(
                    "OCR mode '{}' requested for page {page} but no OCR engine is available",
                    policy.ocr_mode.as_str()
                ));
                reason = "ocr_unavailable_text_layer_fallback";
            }
            Some(recognizer) => match recognizer.recognize(page) {
                Ok(recognized) => {
                    let recognized_chars = recognized.trim().chars().count();
                    ocr_char_count = Some(recognized_chars);
                    if recognized_chars >= policy.min_ocr_chars {
                        tokens = placeholder_tokens(page, &recognized);
                        text = page_text(&tokens);
                        backend = "ocr";
                        reason = match policy.ocr_mode {
                            OcrMode::Force => "ocr_force_mode",
                            _ => "ocr_auto_low_text",
                        };
                        debug!(page, placeholders = tokens.len(), "replaced text layer with OCR tokens");
                    } else {
                        warn!(page, recognized_chars, "OCR output too short, keeping text layer");
                        warnings.push(format!(
                            "OCR text was empty or too short for page {page}"
                        ));
                        reason = "ocr_empty_text_layer_fallback";
                    }
                }
                Err(error) => {
                    warn!(page, error = %error, "OCR failed, keeping text layer");
                    warnings.push(format!("OCR fallback failed for page {page}: {error:#}"));
                    reason = "ocr_failed_text_layer_fallback";
                }
            },
        }
    }

    let sentences = map_sentences(&text, &tokens);
    let provenance = PageProvenance {
        page,
        backend: backend.to_string(),
        reason: reason.to_string(),
        token_count: tokens.len(),
        text_char_count: text.chars().count(),
        ocr_char_count,
    };

    PageAnalysis {
        page,
        text,
        tokens,
        sentences,
        provenance,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;
    use crate::model::Location;
    use crate::resolve::TokenChoice;
    use crate::tokens::RawFragment;

    struct FakeExtractor {
        pages: Vec<Result<Vec<RawFragment>, String>>,
    }

    impl TextExtractor for FakeExtractor {
        fn page_count(&self) -> Result<usize> {
            Ok(self.pages.len())
        }

        fn extract_fragments(&self, page: u32) -> Result<Vec<RawFragment>> {
            match self.pages.get(page as usize - 1) {
                Some(Ok(fragments)) => Ok(fragments.clone()),
                Some(Err(message)) => Err(anyhow!(message.clone())),
                None => bail!("page {page} out of range"),
            }
        }
    }

    struct FakeRecognizer {
        output: Result<String, String>,
        calls: Cell<usize>,
    }

    impl FakeRecognizer {
        fn returning(text: &str) -> Self {
            Self {
                output: Ok(text.to_string()),
                calls: Cell::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                output: Err(message.to_string()),
                calls: Cell::new(0),
            }
        }
    }

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _page: u32) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.output.clone().map_err(|message| anyhow!(message))
        }
    }

    fn line(words: &[&str], baseline: f64) -> Vec<RawFragment> {
        words
            .iter()
            .enumerate()
            .map(|(index, word)| {
                RawFragment::spatial(
                    *word,
                    Location {
                        x: 10.0 + index as f64 * 50.0,
                        y: baseline,
                        width: 40.0,
                        height: 12.0,
                        font_size: 10.0,
                    },
                )
            })
            .collect()
    }

    fn source(page_count: usize) -> SourceDocument {
        SourceDocument {
            path: "fixture.pdf".to_string(),
            sha256: "0".repeat(64),
            page_count,
        }
    }

    fn auto_policy() -> AnalysisPolicy {
        AnalysisPolicy {
            ocr_mode: OcrMode::Auto,
            ..AnalysisPolicy::default()
        }
    }

    fn analyze(
        extractor: &FakeExtractor,
        policy: AnalysisPolicy,
        recognizer: Option<&dyn TextRecognizer>,
    ) -> Session {
        let page_count = extractor.page_count().expect("page count");
        Session::analyze(source(page_count), policy, extractor, recognizer)
    }

    #[test]
    fn spatial_page_maps_and_resolves_clicks() {
        let mut fragments = line(&["A", "cat", "sat."], 100.0);
        fragments.extend(line(&["It", "ran."], 140.0));
        let extractor = FakeExtractor {
            pages: vec![Ok(fragments)],
        };

        let session = analyze(&extractor, AnalysisPolicy::default(), None);
        let page = session.page(1).expect("page 1");

        assert_eq!(page.text, "A cat sat. It ran.");
        assert_eq!(page.provenance.backend, "text_layer");
        assert_eq!(page.provenance.reason, "text_layer_default");
        assert_eq!(page.sentences[1].token_indices, vec![3, 4]);

        let resolution = session.resolve_click(1, 80.0, 135.0);
        assert_eq!(resolution.text(), Some("It ran."));
        let ClickResolution::Resolved(resolved) = resolution else {
            panic!("expected a resolved click");
        };
        assert_eq!(resolved.token.text, "ran.");
        assert!(matches!(resolved.token_choice, TokenChoice::Nearest { .. }));
    }

    #[test]
    fn sparse_page_is_replaced_by_placeholders_in_auto_mode() {
        let extractor = FakeExtractor {
            pages: vec![Ok(line(&["p.", "3"], 50.0))],
        };
        let recognizer = FakeRecognizer::returning("  認識された 文章です。\n次の文。 ");

        let session = analyze(&extractor, auto_policy(), Some(&recognizer));
        let page = session.page(1).expect("page 1");

        assert_eq!(recognizer.calls.get(), 1);
        assert_eq!(page.provenance.backend, "ocr");
        assert_eq!(page.provenance.reason, "ocr_auto_low_text");
        assert_eq!(page.text, "認識された 文章です。 次の文。");
        assert!(page.tokens.iter().all(|token| token.location.is_none()));
        assert_eq!(
            page.sentences
                .iter()
                .map(|sentence| sentence.text.as_str())
                .collect::<Vec<&str>>(),
            vec!["認識された 文章です。", "次の文。"]
        );

        let resolution = session.resolve_click(1, 400.0, 400.0);
        assert_eq!(resolution.text(), Some("認識された 文章です。"));
    }

    #[test]
    fn dense_pages_skip_recognition_in_auto_mode() {
        let extractor = FakeExtractor {
            pages: vec![Ok(line(&["Plenty", "of", "text."], 50.0))],
        };
        let recognizer = FakeRecognizer::returning("should not be used");

        let session = analyze(&extractor, auto_policy(), Some(&recognizer));

        assert_eq!(recognizer.calls.get(), 0);
        assert_eq!(session.pages[0].provenance.backend, "text_layer");
    }

    #[test]
    fn off_mode_never_recognizes() {
        let extractor = FakeExtractor {
            pages: vec![Ok(Vec::new())],
        };
        let recognizer = FakeRecognizer::returning("recognized text");

        let session = analyze(&extractor, AnalysisPolicy::default(), Some(&recognizer));

        assert_eq!(recognizer.calls.get(), 0);
        assert_eq!(session.pages[0].provenance.reason, "text_layer_empty");
        assert_eq!(session.resolve_click(1, 0.0, 0.0), ClickResolution::NoTextOnPage);
    }

    #[test]
    fn force_mode_recognizes_every_page() {
        let extractor = FakeExtractor {
            pages: vec![
                Ok(line(&["Plenty", "of", "text."], 50.0)),
                Ok(line(&["More", "text", "here."], 50.0)),
            ],
        };
        let recognizer = FakeRecognizer::returning("Forced words.");
        let policy = AnalysisPolicy {
            ocr_mode: OcrMode::Force,
            ..AnalysisPolicy::default()
        };

        let session = analyze(&extractor, policy, Some(&recognizer));

        assert_eq!(recognizer.calls.get(), 2);
        assert!(
            session
                .pages
                .iter()
                .all(|page| page.provenance.reason == "ocr_force_mode")
        );
    }

    #[test]
    fn short_recognition_output_keeps_the_text_layer() {
        let extractor = FakeExtractor {
            pages: vec![Ok(line(&["p.", "3"], 50.0))],
        };
        let recognizer = FakeRecognizer::returning(" ab ");

        let session = analyze(&extractor, auto_policy(), Some(&recognizer));
        let page = session.page(1).expect("page 1");

        assert_eq!(page.provenance.reason, "ocr_empty_text_layer_fallback");
        assert_eq!(page.provenance.ocr_char_count, Some(2));
        assert_eq!(page.text, "p. 3");
        assert!(page.tokens.iter().all(Token::is_spatial));
        assert_eq!(session.warnings.len(), 1);
    }

    #[test]
    fn missing_engine_is_a_warning_not_an_error() {
        let extractor = FakeExtractor {
            pages: vec![Ok(line(&["p.", "3"], 50.0))],
        };

        let session = analyze(&extractor, auto_policy(), None);

        assert_eq!(
            session.pages[0].provenance.reason,
            "ocr_unavailable_text_layer_fallback"
        );
        assert_eq!(session.pages[0].text, "p. 3");
        assert_eq!(session.warnings.len(), 1);
    }

    #[test]
    fn failing_pages_do_not_stop_the_run() {
        let extractor = FakeExtractor {
            pages: vec![
                Ok(line(&["First", "page."], 50.0)),
                Err("broken content stream".to_string()),
                Ok(Vec::new()),
                Ok(line(&["Last", "page."], 50.0)),
            ],
        };
        let recognizer = FakeRecognizer::failing("engine crashed");

        let session = analyze(&extractor, auto_policy(), Some(&recognizer));

        assert_eq!(session.pages.len(), 4);
        assert_eq!(session.pages[0].text, "First page.");
        assert_eq!(session.pages[1].provenance.reason, "ocr_failed_text_layer_fallback");
        assert_eq!(session.pages[2].provenance.reason, "ocr_failed_text_layer_fallback");
        assert_eq!(session.pages[3].text, "Last page.");
        assert_eq!(session.resolve_click(2, 5.0, 5.0), ClickResolution::NoTextOnPage);
        assert!(
            session
                .warnings
                .iter()
                .any(|warning| warning.contains("broken content stream"))
        );
    }

    #[test]
    fn clicks_outside_the_document_find_no_text() {
        let session = Session::new(source(0), AnalysisPolicy::default());
        assert_eq!(session.resolve_click(7, 1.0, 1.0), ClickResolution::NoTextOnPage);
    }

    #[test]
    fn full_text_and_quotes_span_all_pages() {
        let extractor = FakeExtractor {
            pages: vec![
                Ok(line(&["Safety", "comes", "first,", "always."], 50.0)),
                Ok(line(&["Short."], 50.0)),
            ],
        };

        let session = analyze(&extractor, AnalysisPolicy::default(), None);
        assert_eq!(session.full_text(), "Safety comes first, always.\n\nShort.");

        let query = QuoteQuery {
            keywords: vec!["Safety".to_string()],
            count: 1,
            ..QuoteQuery::default()
        };
        let quotes = session.quote_candidates(&query);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "Safety comes first, always.");
        assert_eq!(quotes[0].score, 14.0);
    }

    #[test]
    fn saved_sessions_load_back_and_reject_unknown_versions() {
        let extractor = FakeExtractor {
            pages: vec![Ok(line(&["Kept", "text."], 50.0))],
        };
        let session = analyze(&extractor, AnalysisPolicy::default(), None);

        let directory = tempfile::tempdir().expect("tempdir");
        let path = directory.path().join("nested").join("session.json");
        session.save(&path).expect("save");

        let loaded = Session::load(&path).expect("load");
        assert_eq!(loaded.pages[0].tokens, session.pages[0].tokens);
        assert_eq!(loaded.resolve_click(1, 0.0, 0.0).text(), Some("Kept text."));

        let mut stale = loaded;
        stale.manifest_version = SESSION_MANIFEST_VERSION + 1;
        stale.save(&path).expect("save stale");
        assert!(Session::load(&path).is_err());
    }
}
