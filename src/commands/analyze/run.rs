use super::*;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let session_path = args.session.resolved_session_path();
    if args.render_scale.is_nan() || args.render_scale <= 0.0 {
        bail!("render scale must be positive, got {}", args.render_scale);
    }

    let policy = AnalysisPolicy {
        ocr_mode: args.ocr_mode,
        ocr_lang: args.ocr_lang.clone(),
        min_text_chars: args.min_text_chars,
        render_scale: args.render_scale,
        ..AnalysisPolicy::default()
    };

    info!(
        pdf = %args.pdf_path.display(),
        ocr_mode = policy.ocr_mode.as_str(),
        ocr_lang = %policy.ocr_lang,
        render_scale = policy.render_scale,
        "starting analysis"
    );

    let document = PopplerDocument::open(&args.pdf_path, policy.render_scale)?;
    let page_count = document.page_count()?;
    let source = SourceDocument {
        path: args.pdf_path.display().to_string(),
        sha256: sha256_file(&args.pdf_path)?,
        page_count,
    };

    let engine = acquire_engine(&document, &policy);
    let mut session = Session::analyze(
        source,
        policy,
        &document,
        engine.as_ref().map(|engine| engine as &dyn TextRecognizer),
    );
    if let Some(engine) = engine {
        if let Err(error) = engine.terminate() {
            warn!(error = %error, "failed to release OCR engine");
            session.warnings.push(format!("failed to release OCR engine: {error:#}"));
        }
    }
    session.tool_versions = collect_tool_versions();

    if let Some(render_dir) = &args.render_dir {
        render_pages(&document, &mut session, render_dir)?;
    }

    session.save(&session_path)?;

    let ocr_pages = session
        .pages
        .iter()
        .filter(|page| page.provenance.backend == "ocr")
        .count();
    info!(
        path = %session_path.display(),
        pages = session.pages.len(),
        ocr_pages,
        warnings = session.warnings.len(),
        "wrote session manifest"
    );
    for warning in &session.warnings {
        warn!(warning = %warning, "analysis warning");
    }

    Ok(())
}

fn acquire_engine<'a>(document: &'a PopplerDocument, policy: &AnalysisPolicy) -> Option<OcrEngine<'a>> {
    if policy.ocr_mode == OcrMode::Off {
        return None;
    }

    match OcrEngine::acquire(document, &policy.ocr_lang, policy.render_scale) {
        Ok(engine) => Some(engine),
        Err(error) => {
            warn!(error = %error, "OCR engine unavailable, continuing with the text layer only");
            None
        }
    }
}

fn render_pages(document: &PopplerDocument, session: &mut Session, render_dir: &Path) -> Result<()> {
    ensure_directory(render_dir)?;

    let scale = session.policy.render_scale;
    let pages = session.pages.iter().map(|page| page.page).collect::<Vec<u32>>();
    for page in pages {
        let stem = render_dir.join(format!("page-{page:04}"));
        match document.render_page(page, scale, &stem) {
            Ok(path) => info!(page, path = %path.display(), "rendered page"),
            Err(error) => {
                warn!(page, error = %error, "page render failed");
                session
                    .warnings
                    .push(format!("render failed for page {page}: {error:#}"));
            }
        }
    }

    Ok(())
}
