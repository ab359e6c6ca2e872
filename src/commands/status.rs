use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::SessionArgs;
use crate::session::Session;

pub fn run(args: SessionArgs) -> Result<()> {
    let session_path = args.resolved_session_path();
    info!(cache_root = %args.cache_root.display(), "status requested");

    if !session_path.exists() {
        warn!(path = %session_path.display(), "session manifest missing");
        return Ok(());
    }

    let session = Session::load(&session_path)?;
    info!(
        source = %session.source.path,
        sha256 = %session.source.sha256,
        generated_at = %session.generated_at,
        pages = session.pages.len(),
        ocr_mode = session.policy.ocr_mode.as_str(),
        ocr_lang = %session.policy.ocr_lang,
        pdftotext = %session.tool_versions.pdftotext.clone().unwrap_or_default(),
        tesseract = %session.tool_versions.tesseract.clone().unwrap_or_default(),
        warnings = session.warnings.len(),
        "loaded session manifest"
    );

    for page in &session.pages {
        info!(
            page = page.page,
            backend = %page.provenance.backend,
            reason = %page.provenance.reason,
            tokens = page.tokens.len(),
            spatial_tokens = page.tokens.iter().filter(|token| token.is_spatial()).count(),
            sentences = page.sentences.len(),
            chars = page.provenance.text_char_count,
            "page status"
        );
    }

    Ok(())
}

pub fn clear(args: SessionArgs) -> Result<()> {
    let session_path = args.resolved_session_path();

    if !session_path.exists() {
        warn!(path = %session_path.display(), "no session to clear");
        return Ok(());
    }

    fs::remove_file(&session_path)
        .with_context(|| format!("failed to remove {}", session_path.display()))?;
    info!(path = %session_path.display(), "session cleared");
    Ok(())
}
