pub mod support_article;

pub use support_article::SupportArticleParser;

use crate::config::ToolsConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use serde::Serialize;

/// One row of the published firmware table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirmwareRow {
    /// Marketing name, e.g. "iMac (21.5-inch, Late 2013)".
    pub computer: String,
    /// Model identifier, e.g. "iMac14,1".
    pub model_id: String,
    /// Firmware column as published, possibly followed by notes.
    pub firmware: String,
}

impl FirmwareRow {
    pub fn new(
        computer: impl Into<String>,
        model_id: impl Into<String>,
        firmware: impl Into<String>,
    ) -> Self {
        Self {
            computer: computer.into(),
            model_id: model_id.into(),
            firmware: firmware.into(),
        }
    }

    /// The version number alone: the leading token of the firmware column.
    pub fn version(&self) -> &str {
        self.firmware.split_whitespace().next().unwrap_or_default()
    }
}

/// Turns a fetched page into table rows. Everything that depends on the
/// page markup lives behind this trait.
pub trait TableParser {
    fn parse(&self, page: &str) -> Vec<FirmwareRow>;
}

/// Download a page with the configured HTTP client.
pub fn fetch_page(runner: &dyn CommandRunner, tools: &ToolsConfig, url: &str) -> Result<String> {
    let mut args: Vec<&str> = tools.curl_flags.iter().map(String::as_str).collect();
    args.push(url);
    runner.run(&tools.curl, &args)
}

/// Download and parse the firmware reference table.
pub fn fetch_table(
    runner: &dyn CommandRunner,
    tools: &ToolsConfig,
    url: &str,
    parser: &dyn TableParser,
) -> Result<Vec<FirmwareRow>> {
    let page = fetch_page(runner, tools, url)?;
    let rows = parser.parse(&page);
    tracing::debug!("parsed {} firmware table rows from {}", rows.len(), url);
    Ok(rows)
}
