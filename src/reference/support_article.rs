use super::{FirmwareRow, TableParser};
use crate::config::ReferenceConfig;
use crate::markup::{decode_entities, strip_tags};
use regex::Regex;
use std::sync::LazyLock;

const HEADER_ROW: &str = "<tbody><tr><th><strong>Computer</strong></th><th><strong>Model identifier</strong></th><th><strong>EFI Boot ROM version</strong></th><th><strong>SMC version</strong></th></tr>";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(".*{}", regex::escape(HEADER_ROW))).expect("static regex must compile")
});
static TABLE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</tbody>.*").expect("static regex must compile"));
static SUBHEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<tr><td colspan.*?</tr>").expect("static regex must compile"));
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<td>(.*?)</td>.*?<td>(.*?)</td>.*?<td>(.*?)</td>.*?<td>(.*?)</td>")
        .expect("static regex must compile")
});

/// Parser for the firmware table of the EFI/SMC support article, which ships
/// the whole table on the line after the body marker.
#[derive(Debug, Clone)]
pub struct SupportArticleParser {
    marker: String,
    compact_model_ids: bool,
}

impl SupportArticleParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            compact_model_ids: true,
        }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self::new(config.marker.clone()).compact_model_ids(config.compact_model_ids)
    }

    /// Remove whitespace inside model identifiers ("MacBookPro11, 2").
    pub fn compact_model_ids(mut self, enabled: bool) -> Self {
        self.compact_model_ids = enabled;
        self
    }

    /// The raw table markup: the line right after the marker line.
    fn table_section<'a>(&self, page: &'a str) -> Option<&'a str> {
        let mut lines = page.split('\n');
        lines.by_ref().find(|line| *line == self.marker)?;
        lines.next()
    }

    fn parse_row(&self, line: &str) -> Option<FirmwareRow> {
        let caps = ROW_RE.captures(line)?;

        let computer = strip_tags(&caps[1]);
        let mut model_id = strip_tags(&caps[2]);
        let firmware = strip_tags(&caps[4]);

        if self.compact_model_ids {
            model_id = model_id.split_whitespace().collect();
        }

        Some(FirmwareRow {
            computer,
            model_id,
            firmware,
        })
    }
}

impl TableParser for SupportArticleParser {
    fn parse(&self, page: &str) -> Vec<FirmwareRow> {
        let Some(section) = self.table_section(page) else {
            tracing::warn!("firmware table marker not found: {}", self.marker);
            return Vec::new();
        };

        let section = decode_entities(section);
        let section = HEADER_RE.replace(&section, "");
        let section = TABLE_END_RE.replace(&section, "");
        let section = SUBHEADING_RE.replace_all(&section, "");
        let section = section.replace("</tr>", "</tr>\n");

        section
            .split('\n')
            .filter_map(|line| self.parse_row(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = r#"<div id="sections" itemprop="articleBody">"#;

    fn page(table: &str) -> String {
        format!(
            "<html>\n<head><title>About EFI and SMC firmware updates</title></head>\n{}\n{}\n</div>\n</html>\n",
            MARKER, table
        )
    }

    fn sample_table() -> String {
        [
            "<p>Intro&NewLine;text</p><table>",
            HEADER_ROW,
            "<tr><td colspan=\"4\"><strong>iMac</strong></td></tr>",
            "<tr><td>iMac&nbsp;&lpar;21.5-inch&comma; Late 2013&rpar;</td><td>iMac14,1</td><td>IM141.0118.B00</td><td>2.14f24</td></tr>",
            "<tr><td>iMac (27-inch, Late 2013)</td><td>iMac14,2</td><td>IM142.0118.B00</td><td>2.15f3</td></tr>",
            "<tr><td colspan=\"4\"><strong>MacBook Pro</strong></td></tr>",
            "<tr><td><a href=\"/kb/SP690\">MacBook Pro (Retina, 13-inch, Late 2013)</a></td><td>MacBookPro11,&Tab; 1</td><td>MBP111.0138.B15</td><td>2.16f68 <em>(requires OS X 10.9)</em></td></tr>",
            "<tr><td>MacBook Pro (Retina, 15-inch, Late 2013)</td><td>MacBookPro11,2</td><td>MBP112.0138.B15</td><td>2.18f15</td></tr>",
            "<tr><td>MacBook Pro (Retina, 15-inch, Late 2013)</td><td>MacBookPro11,3</td><td>MBP112.0138.B15</td><td>2.19f12</td></tr>",
            "</tbody></table><p>Trailing <td>a</td><td>b</td><td>c</td><td>d</td></p>",
        ]
        .concat()
    }

    #[test]
    fn test_parse_sample_table() {
        let rows = SupportArticleParser::new(MARKER).parse(&page(&sample_table()));
        assert_eq!(rows.len(), 5);

        assert_eq!(rows[0].computer, "iMac(21.5-inch&comma; Late 2013)");
        assert_eq!(rows[0].model_id, "iMac14,1");
        assert_eq!(rows[0].firmware, "2.14f24");

        assert_eq!(rows[1], FirmwareRow::new("iMac (27-inch, Late 2013)", "iMac14,2", "2.15f3"));

        assert_eq!(rows[2].computer, "MacBook Pro (Retina, 13-inch, Late 2013)");
        assert_eq!(rows[2].model_id, "MacBookPro11,1");
        assert_eq!(rows[2].firmware, "2.16f68 (requires OS X 10.9)");
        assert_eq!(rows[2].version(), "2.16f68");

        assert_eq!(rows[4].model_id, "MacBookPro11,3");
    }

    #[test]
    fn test_subheadings_are_not_rows() {
        let rows = SupportArticleParser::new(MARKER).parse(&page(&sample_table()));
        assert!(rows.iter().all(|r| r.computer != "iMac" && r.computer != "MacBook Pro"));
    }

    #[test]
    fn test_content_after_table_is_dropped() {
        let rows = SupportArticleParser::new(MARKER).parse(&page(&sample_table()));
        assert!(rows.iter().all(|r| r.computer != "a"));
    }

    #[test]
    fn test_model_ids_kept_verbatim_when_not_compacting() {
        let rows = SupportArticleParser::new(MARKER)
            .compact_model_ids(false)
            .parse(&page(&sample_table()));
        assert_eq!(rows[2].model_id, "MacBookPro11, 1");
    }

    #[test]
    fn test_missing_marker_yields_empty_table() {
        let html = sample_table();
        assert!(SupportArticleParser::new(MARKER).parse(&html).is_empty());
    }

    #[test]
    fn test_marker_must_match_whole_line() {
        let html = format!("  {}\n{}\n", MARKER, sample_table());
        assert!(SupportArticleParser::new(MARKER).parse(&html).is_empty());
    }

    #[test]
    fn test_marker_on_last_line() {
        let html = format!("<html>\n{}", MARKER);
        assert!(SupportArticleParser::new(MARKER).parse(&html).is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = ReferenceConfig::default();
        config.compact_model_ids = false;
        let parser = SupportArticleParser::from_config(&config);
        let rows = parser.parse(&page(&sample_table()));
        assert_eq!(rows[2].model_id, "MacBookPro11, 1");
    }
}
