use std::io::{self, Write};

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

use crate::cli::SentencesArgs;
use crate::model::Sentence;
use crate::session::{PageAnalysis, Session};
use crate::util::print_json;

#[derive(Debug, Serialize)]
struct PageSentences<'a> {
    page: u32,
    sentences: &'a [Sentence],
}

pub fn run(args: SentencesArgs) -> Result<()> {
    let session_path = args.session.resolved_session_path();
    let session = Session::load(&session_path)?;

    let pages = select_pages(&session, args.page)?;
    info!(
        pages = pages.len(),
        sentences = pages.iter().map(|page| page.sentences.len()).sum::<usize>(),
        "sentence query"
    );

    if args.json {
        let listing = pages
            .iter()
            .map(|page| PageSentences {
                page: page.page,
                sentences: &page.sentences,
            })
            .collect::<Vec<PageSentences<'_>>>();
        return print_json(&listing);
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    for page in pages {
        writeln!(output, "Page {}: {} sentences", page.page, page.sentences.len())?;
        for (index, sentence) in page.sentences.iter().enumerate() {
            writeln!(
                output,
                "{}.\t[{}..{})\ttokens={}\t{}",
                index + 1,
                sentence.start_char,
                sentence.end_char,
                format_indices(&sentence.token_indices),
                sentence.text
            )?;
        }
    }
    output.flush()?;
    Ok(())
}

fn select_pages(session: &Session, page: Option<u32>) -> Result<Vec<&PageAnalysis>> {
    match page {
        Some(page) => match session.page(page) {
            Some(analysis) => Ok(vec![analysis]),
            None => bail!(
                "page {} is outside the analyzed document ({} pages)",
                page,
                session.pages.len()
            ),
        },
        None => Ok(session.pages.iter().collect()),
    }
}

fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<String>>()
        .join(",")
}
