//! Report output
//!
//! Turns a `ScenarioReport` into something a person or a script can read:
//! an indented text tree, or JSON.

pub mod text;

pub use text::render_text;

use crate::simulation::ScenarioReport;
use crate::Result;

/// Output format for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(crate::Error::InvalidArgument(format!(
                "unknown output format: {}",
                other
            ))),
        }
    }
}

/// Options for text rendering
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Include domains holding no replicas
    pub show_empty: bool,
    /// Append the traversal trace of the failure search
    pub show_trace: bool,
}

/// Render reports in the requested format
pub fn render(reports: &[ScenarioReport], format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(reports
            .iter()
            .map(|r| render_text(r, options))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => render_json(reports),
    }
}

/// Encode reports as pretty-printed JSON; a single report is not wrapped in an array
pub fn render_json(reports: &[ScenarioReport]) -> Result<String> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(json)
}

/// 1-based dotted label for a slot path, e.g. `[0, 2]` becomes "1.3"
pub fn path_label(path: &[usize]) -> String {
    path.iter()
        .map(|slot| (slot + 1).to_string())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Simulator};

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_path_label() {
        assert_eq!(path_label(&[]), "");
        assert_eq!(path_label(&[0]), "1");
        assert_eq!(path_label(&[0, 2, 1]), "1.3.2");
    }

    #[test]
    fn test_json_report() {
        let report = Simulator::new(Config::default()).run().unwrap();
        let json = render_json(std::slice::from_ref(&report)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["replication_factor"], 3);
        assert_eq!(value["outcome"]["killed"], 1);
        assert_eq!(value["outcome"]["per_level"], serde_json::json!([1, 0, 0, 0]));
        assert_eq!(value["tree"]["children"][0]["failed"], true);
        assert_eq!(value["trace"][0]["action"], "Killed");
    }

    #[test]
    fn test_json_sweep_is_an_array() {
        let reports = Simulator::new(Config::default()).sweep().unwrap();
        let json = render(&reports, OutputFormat::Json, &RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(4));
    }
}
