use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ClickArgs;
use crate::clipboard::{ClipboardFormatter, ClipboardPayload};
use crate::model::{HighlightRect, Sentence};
use crate::resolve::{ClickResolution, TokenChoice};
use crate::session::Session;
use crate::util::print_json;

const HIGHLIGHT_PADDING: f64 = 2.0;

#[derive(Debug, Serialize)]
struct ClickReport<'a> {
    page: u32,
    x: f64,
    y: f64,
    outcome: &'static str,
    sentence: Option<&'a Sentence>,
    token_index: Option<usize>,
    token_text: Option<&'a str>,
    distance_sq: Option<f64>,
    owner_found: Option<bool>,
    highlight: Option<HighlightRect>,
    payload: Option<ClipboardPayload>,
}

impl<'a> ClickReport<'a> {
    fn new(
        page: u32,
        x: f64,
        y: f64,
        resolution: &ClickResolution<'a>,
        formatter: &ClipboardFormatter,
    ) -> Self {
        let mut report = Self {
            page,
            x,
            y,
            outcome: resolution.outcome(),
            sentence: None,
            token_index: None,
            token_text: None,
            distance_sq: None,
            owner_found: None,
            highlight: None,
            payload: None,
        };

        if let ClickResolution::Resolved(resolved) = resolution {
            report.sentence = Some(resolved.sentence);
            report.token_index = Some(resolved.token.sequence_index);
            report.token_text = Some(resolved.token.text.as_str());
            report.distance_sq = match resolved.token_choice {
                TokenChoice::Nearest { distance_sq } => Some(distance_sq),
                TokenChoice::FirstToken => None,
            };
            report.owner_found = Some(resolved.owner_found);
            report.highlight = resolved
                .token
                .spatial_location()
                .map(|location| location.highlight_rect(HIGHLIGHT_PADDING));
        }
        report.payload = resolution.text().map(|text| formatter.payload(text));

        report
    }
}

pub fn run(args: ClickArgs) -> Result<()> {
    let session_path = args.session.resolved_session_path();
    let session = Session::load(&session_path)?;
    let formatter = ClipboardFormatter::new()?;

    let resolution = session.resolve_click(args.page, args.x, args.y);
    match &resolution {
        ClickResolution::Resolved(resolved) => info!(
            page = args.page,
            token = resolved.token.sequence_index,
            owner_found = resolved.owner_found,
            chars = resolution.text().map_or(0, |text| text.chars().count()),
            "click resolved"
        ),
        ClickResolution::NoTextOnPage => warn!(page = args.page, "no text found on this page"),
        ClickResolution::SentenceDetectionFailed => {
            warn!(page = args.page, "sentence detection failed for this page")
        }
    }

    let report = ClickReport::new(args.page, args.x, args.y, &resolution, &formatter);
    if args.json {
        return print_json(&report);
    }

    if let Some(payload) = &report.payload {
        let mut output = io::BufWriter::new(io::stdout().lock());
        if args.html {
            writeln!(output, "{}", payload.html)?;
        } else {
            writeln!(output, "{}", payload.plain)?;
        }
        output.flush()?;
    }

    Ok(())
}
