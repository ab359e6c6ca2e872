use std::io::{self, Write};

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::QuotesArgs;
use crate::model::QuoteCandidate;
use crate::quotes::{QuoteQuery, parse_keywords, pick_quotes};
use crate::session::Session;
use crate::util::{print_json, read_text_input};

#[derive(Debug, Serialize)]
struct QuotesResponse<'a> {
    keywords: &'a [String],
    min_len: usize,
    max_len: usize,
    count: usize,
    returned: usize,
    candidates: &'a [QuoteCandidate],
}

pub fn run(args: QuotesArgs) -> Result<()> {
    if args.min_len > args.max_len {
        bail!(
            "--min-len ({}) must not exceed --max-len ({})",
            args.min_len,
            args.max_len
        );
    }

    let query = QuoteQuery {
        keywords: parse_keywords(&args.keywords),
        min_len: args.min_len,
        max_len: args.max_len,
        count: args.count,
    };

    let candidates = match &args.input {
        Some(path) => pick_quotes(&read_text_input(Some(path.as_path()))?, &query),
        None => {
            let session_path = args.session.resolved_session_path();
            let session = Session::load(&session_path)?;
            if session.full_text().trim().is_empty() {
                warn!(path = %session_path.display(), "session has no extracted text");
                return Ok(());
            }
            session.quote_candidates(&query)
        }
    };

    if candidates.is_empty() {
        warn!("no quote candidates found");
    } else {
        info!(
            returned = candidates.len(),
            keywords = query.keywords.len(),
            "quote candidates ranked"
        );
    }

    if args.json {
        return print_json(&QuotesResponse {
            keywords: &query.keywords,
            min_len: query.min_len,
            max_len: query.max_len,
            count: query.count,
            returned: candidates.len(),
            candidates: &candidates,
        });
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    for (rank, candidate) in candidates.iter().enumerate() {
        writeln!(
            output,
            "{}.\tscore={:.1}\tlen={}\t{}",
            rank + 1,
            candidate.score,
            candidate.length,
            candidate.text
        )?;
    }
    output.flush()?;
    Ok(())
}
