use anyhow::{Context, Result};
use regex::Regex;

pub struct TextCleaner {
    paragraph_break: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            paragraph_break: Regex::new(r" *\n{2,} *")
                .context("failed to compile paragraph break regex")?,
        })
    }

    pub fn clean(&self, text: &str) -> String {
        let mut current = text.replace("\r\n", "\n");
        loop {
            let next = self.reflow_once(&current);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// A single pass. Joining a hyphen break can expose a new break run, so
    /// [`TextCleaner::clean`] repeats until nothing changes.
    fn reflow_once(&self, text: &str) -> String {
        let joined = text.replace("-\n", "");
        self.paragraph_break
            .split(&joined)
            .map(|paragraph| paragraph.replace('\n', ""))
            .collect::<Vec<String>>()
            .join("\n\n")
            .trim()
            .to_string()
    }
}
