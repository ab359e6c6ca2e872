use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::TextArgs;
use crate::session::Session;

const TRUNCATION_MARKER: &str = "\n\n...(truncated)";

pub fn run(args: TextArgs) -> Result<()> {
    let session_path = args.session.resolved_session_path();
    let session = Session::load(&session_path)?;

    let full_text = session.full_text();
    if full_text.trim().is_empty() {
        warn!(path = %session_path.display(), "session has no extracted text");
        return Ok(());
    }

    info!(
        pages = session.pages.len(),
        chars = full_text.chars().count(),
        "full text extracted"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(output, "{}", preview(&full_text, args.max_chars))?;
    output.flush()?;
    Ok(())
}

fn preview(text: &str, max_chars: Option<usize>) -> String {
    let Some(limit) = max_chars else {
        return text.to_string();
    };

    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_character_boundaries() {
        assert_eq!(preview("日本語テキスト", Some(3)), "日本語\n\n...(truncated)");
        assert_eq!(preview("short", Some(5)), "short");
        assert_eq!(preview("short", None), "short");
    }
}
