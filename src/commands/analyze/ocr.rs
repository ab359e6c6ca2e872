use super::*;

pub(super) struct OcrEngine<'a> {
    renderer: &'a dyn PageRenderer,
    lang: String,
    scale: f64,
    scratch: TempDir,
    in_flight: Mutex<()>,
}

pub(super) fn ensure_ocr_tools() -> Result<()> {
    for program in ["pdftoppm", "tesseract"] {
        if !command_available(program) {
            bail!("{program} is not available for OCR");
        }
    }
    Ok(())
}

impl<'a> OcrEngine<'a> {
    pub fn acquire(renderer: &'a dyn PageRenderer, lang: &str, scale: f64) -> Result<Self> {
        ensure_ocr_tools()?;
        Self::new(renderer, lang, scale)
    }

    pub fn new(renderer: &'a dyn PageRenderer, lang: &str, scale: f64) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("quotepick_ocr_")
            .tempdir()
            .context("failed to create OCR scratch directory")?;

        let engine = Self {
            renderer,
            lang: lang.to_string(),
            scale,
            scratch,
            in_flight: Mutex::new(()),
        };
        info!(lang, scratch = %engine.scratch_path().display(), "OCR engine ready");
        Ok(engine)
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    pub fn terminate(self) -> Result<()> {
        let path = self.scratch_path().display().to_string();
        self.scratch
            .close()
            .with_context(|| format!("failed to remove OCR scratch directory {path}"))?;
        info!(scratch = %path, "OCR engine released");
        Ok(())
    }
}

impl TextRecognizer for OcrEngine<'_> {
    fn recognize(&self, page: u32) -> Result<String> {
        let _guard = self
            .in_flight
            .lock()
            .map_err(|_| anyhow!("OCR engine lock poisoned"))?;

        let stem = self.scratch_path().join(format!("page_{page:05}"));
        let png_path = self.renderer.render_page(page, self.scale, &stem)?;

        info!(page, lang = %self.lang, "running OCR");
        let output = Command::new("tesseract")
            .arg(&png_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .with_context(|| format!("failed to execute tesseract for {}", png_path.display()))?;

        if let Err(error) = fs::remove_file(&png_path) {
            debug!(page, error = %error, "failed to remove rendered OCR page");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "tesseract returned non-zero exit status for page {}: {}",
                page,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .replace('\u{0000}', "")
            .trim()
            .to_string())
    }
}
