// Fri Jan 17 2026 - Alex

use crate::output::{OutputError, SymbolList};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Project64 symbol list, `ADDRESS,type,name`.
    #[default]
    Pj64,
    Text,
    Json,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["pj64", "text", "json"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pj64 => "pj64",
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pj64" | "project64" => Ok(OutputFormat::Pj64),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

/// Widest name column the text format pads to.
const MAX_NAME_WIDTH: usize = 48;

pub struct OutputFormatter {
    format: OutputFormat,
    pretty: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render(&self, symbols: &SymbolList) -> Result<String, OutputError> {
        match self.format {
            OutputFormat::Pj64 => Ok(self.render_pj64(symbols)),
            OutputFormat::Text => Ok(self.render_text(symbols)),
            OutputFormat::Json => self.render_json(symbols),
        }
    }

    fn render_pj64(&self, symbols: &SymbolList) -> String {
        let mut out = String::new();
        for entry in symbols.iter() {
            out.push_str(&format!("{},{},{}\n", entry.address, entry.kind, entry.name));
        }
        out
    }

    fn render_text(&self, symbols: &SymbolList) -> String {
        let width = symbols
            .iter()
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
            .min(MAX_NAME_WIDTH);

        let mut out = String::new();
        for entry in symbols.iter() {
            out.push_str(&format!(
                "{}  {:<4}  {:<width$}  {}\n",
                entry.address,
                entry.kind.as_str(),
                entry.name,
                entry.source,
                width = width
            ));
        }
        out
    }

    fn render_json(&self, symbols: &SymbolList) -> Result<String, OutputError> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(symbols)?
        } else {
            serde_json::to_string(symbols)?
        };
        json.push('\n');
        Ok(json)
    }
}
