use super::*;

pub(super) const LINE_HEIGHT_FACTOR: f64 = 1.15;
const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct BboxWord {
    pub text: String,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BboxWord {
    pub fn into_fragment(self, scale: f64) -> RawFragment {
        let height = (self.y_max - self.y_min) * scale;
        RawFragment::spatial(
            self.text,
            Location {
                x: self.x_min * scale,
                y: self.y_max * scale,
                width: (self.x_max - self.x_min) * scale,
                height,
                font_size: height / LINE_HEIGHT_FACTOR,
            },
        )
    }
}

pub(super) struct PopplerDocument {
    pdf_path: PathBuf,
    scale: f64,
}

impl PopplerDocument {
    pub fn open(pdf_path: &Path, scale: f64) -> Result<Self> {
        if !pdf_path.is_file() {
            bail!("PDF not found: {}", pdf_path.display());
        }

        Ok(Self {
            pdf_path: pdf_path.to_path_buf(),
            scale,
        })
    }
}

impl TextExtractor for PopplerDocument {
    fn page_count(&self) -> Result<usize> {
        let info = run_tool(Command::new("pdfinfo").arg(&self.pdf_path), "pdfinfo")
            .with_context(|| format!("failed to read page count of {}", self.pdf_path.display()))?;
        parse_page_count(&info)
    }

    fn extract_fragments(&self, page: u32) -> Result<Vec<RawFragment>> {
        let mut command = Command::new("pdftotext");
        command
            .arg("-enc")
            .arg("UTF-8")
            .arg("-bbox")
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg(&self.pdf_path)
            .arg("-");

        let xhtml = run_tool(&mut command, "pdftotext").with_context(|| {
            format!("failed to extract page {} of {}", page, self.pdf_path.display())
        })?;

        let words = parse_bbox_words(&xhtml).with_context(|| {
            format!("failed to parse page {} of {}", page, self.pdf_path.display())
        })?;
        debug!(page, words = words.len(), "parsed bbox words");
        Ok(words
            .into_iter()
            .map(|word| word.into_fragment(self.scale))
            .collect())
    }
}

impl PageRenderer for PopplerDocument {
    fn render_page(&self, page: u32, scale: f64, output_stem: &Path) -> Result<PathBuf> {
        let dpi = (POINTS_PER_INCH * scale).round().max(1.0) as u32;
        let mut command = Command::new("pdftoppm");
        command
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-singlefile")
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(&self.pdf_path)
            .arg(output_stem);

        run_tool(&mut command, "pdftoppm").with_context(|| {
            format!("failed to render page {} of {}", page, self.pdf_path.display())
        })?;

        let png_path = PathBuf::from(format!("{}.png", output_stem.display()));
        if !png_path.exists() {
            bail!(
                "pdftoppm did not produce expected image for {} page {}",
                self.pdf_path.display(),
                page
            );
        }

        Ok(png_path)
    }
}

pub(super) fn parse_bbox_words(xhtml: &str) -> Result<Vec<BboxWord>> {
    let mut reader = Reader::from_str(xhtml);
    let mut words = Vec::new();
    let mut bounds: Option<[f64; 4]> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) if element.name().as_ref() == b"word" => {
                bounds = word_bounds(&element);
                text.clear();
            }
            Ok(Event::Text(content)) if bounds.is_some() => {
                let decoded = content.unescape().with_context(|| {
                    format!(
                        "invalid text in bbox word near byte {}",
                        reader.buffer_position()
                    )
                })?;
                text.push_str(&decoded);
            }
            Ok(Event::End(element)) if element.name().as_ref() == b"word" => {
                if let Some([x_min, y_min, x_max, y_max]) = bounds.take() {
                    words.push(BboxWord {
                        text: std::mem::take(&mut text),
                        x_min,
                        y_min,
                        x_max,
                        y_max,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => bail!(
                "malformed pdftotext bbox output near byte {}: {}",
                reader.buffer_position(),
                error
            ),
            _ => {}
        }
    }

    Ok(words)
}

fn word_bounds(element: &BytesStart<'_>) -> Option<[f64; 4]> {
    let coordinate = |name: &str| -> Option<f64> {
        let attribute = element.try_get_attribute(name).ok()??;
        attribute.unescape_value().ok()?.trim().parse::<f64>().ok()
    };

    Some([
        coordinate("xMin")?,
        coordinate("yMin")?,
        coordinate("xMax")?,
        coordinate("yMax")?,
    ])
}

pub(super) fn parse_page_count(info: &str) -> Result<usize> {
    let value = info
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .context("pdfinfo output has no page count")?;

    value
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid page count in pdfinfo output: {}", value.trim()))
}
