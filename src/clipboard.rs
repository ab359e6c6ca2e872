use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipboardPayload {
    pub plain: String,
    pub html: String,
}

pub struct ClipboardFormatter {
    subscript: Regex,
    superscript: Regex,
    power_of_ten: Regex,
}

impl ClipboardFormatter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            subscript: Regex::new(r"([A-Za-z\)\]])([0-9]+)")
                .context("failed to compile subscript regex")?,
            superscript: Regex::new(r"([A-Za-z0-9\)\]])\^(-?\d+)")
                .context("failed to compile superscript regex")?,
            power_of_ten: Regex::new(r"10\^(-?\d+)")
                .context("failed to compile power-of-ten regex")?,
        })
    }

    pub fn payload(&self, text: &str) -> ClipboardPayload {
        ClipboardPayload {
            plain: text.to_string(),
            html: self.html(text),
        }
    }

    pub fn html(&self, text: &str) -> String {
        let escaped = escape_html(text);
        let html = self.subscript.replace_all(&escaped, "$1<sub>$2</sub>");
        let html = self.superscript.replace_all(&html, "$1<sup>$2</sup>");
        self.power_of_ten
            .replace_all(&html, "10<sup>$1</sup>")
            .into_owned()
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
