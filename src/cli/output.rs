//! CLI Output Formatting.
//!
//! Human-readable text with `console` styling, or one JSON document per
//! command for scripting.

use console::style;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Output formatter for CLI
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    /// Disable color
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a successful result: a message plus labelled fields
    pub fn render_success(&self, message: &str, fields: &[(&str, String)]) -> String {
        match self.format {
            OutputFormat::Json => {
                let data: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                    .collect();
                serde_json::json!({
                    "status": "success",
                    "message": message,
                    "data": data,
                })
                .to_string()
            }
            OutputFormat::Text => {
                let mut out = if self.color {
                    format!("{} {}", style("✓").green(), message)
                } else {
                    format!("OK: {}", message)
                };
                let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
                for (key, value) in fields {
                    let label = format!("{:width$}", key, width = width);
                    if self.color {
                        out.push_str(&format!("\n  {}  {}", style(label).dim(), value));
                    } else {
                        out.push_str(&format!("\n  {}  {}", label, value));
                    }
                }
                out
            }
        }
    }

    /// Render an error
    pub fn render_error(&self, message: &str, code: Option<u32>) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({
                "status": "error",
                "message": message,
                "code": code,
            })
            .to_string(),
            OutputFormat::Text => {
                let suffix = code.map(|c| format!(" (code {})", c)).unwrap_or_default();
                if self.color {
                    format!("{} {}{}", style("✗").red().bold(), message, suffix)
                } else {
                    format!("ERROR: {}{}", message, suffix)
                }
            }
        }
    }

    /// Render an arbitrary serializable document (JSON) or its pretty form (text)
    pub fn render_value(&self, value: &Value) -> String {
        match self.format {
            OutputFormat::Json => value.to_string(),
            OutputFormat::Text => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    /// Print success message
    pub fn success(&self, message: &str, fields: &[(&str, String)]) {
        println!("{}", self.render_success(message, fields));
    }

    /// Print error message
    pub fn error(&self, message: &str, code: Option<u32>) {
        eprintln!("{}", self.render_error(message, code));
    }

    /// Print a JSON document
    pub fn value(&self, value: &Value) {
        println!("{}", self.render_value(value));
    }
}
