use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use crate::cleanup::TextCleaner;
use crate::cli::CleanArgs;
use crate::util::read_text_input;

pub fn run(args: CleanArgs) -> Result<()> {
    let raw = read_text_input(args.input.as_deref())?;
    let cleaned = TextCleaner::new()?.clean(&raw);

    info!(
        input_chars = raw.chars().count(),
        output_chars = cleaned.chars().count(),
        "text cleaned"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(output, "{cleaned}")?;
    output.flush()?;
    Ok(())
}
