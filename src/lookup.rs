use crate::config::{LookupConfig, LookupStyle, ToolsConfig};
use crate::error::Result;
use crate::markup::strip_tags;
use crate::reference::fetch_page;
use crate::runner::CommandRunner;

const PRODUCT_NAME_MARKER: &str = "productname";
const WARRANTY_CALL_PREFIX: &str = "warrantyPage.warrantycheck.displayProductInfo";

/// Fetch the lookup page for `serial` and extract the computer name.
pub fn resolve_computer_name(
    runner: &dyn CommandRunner,
    tools: &ToolsConfig,
    lookup: &LookupConfig,
    serial: &str,
) -> Result<Option<String>> {
    let url = lookup.url_for(serial);
    let page = fetch_page(runner, tools, &url)?;
    Ok(extract_name(lookup.style, &page))
}

/// Pull the computer name out of a lookup page. The last matching line
/// wins; an empty result counts as no name.
pub fn extract_name(style: LookupStyle, page: &str) -> Option<String> {
    let name = match style {
        LookupStyle::RegisterProduct => page
            .lines()
            .map(str::trim)
            .rev()
            .find(|line| line.contains(PRODUCT_NAME_MARKER))
            .map(strip_tags),
        LookupStyle::WarrantyCheck => page
            .lines()
            .map(str::trim)
            .rev()
            .find(|line| line.starts_with(WARRANTY_CALL_PREFIX))
            .and_then(name_from_warranty_call),
    }?;

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// `displayProductInfo('<id>', 'iMac (27-inch, Late 2013)', ...)`: the name
/// is the quoted second argument.
fn name_from_warranty_call(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(", ")?;
    let mut chars = rest.chars();
    chars.next()?;
    let quoted = chars.as_str();
    let name = quoted.split_once('\'').map_or(quoted, |(name, _)| name);
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_product_name() {
        let page = "<html>\n<body>\n   <span class=\"productname\">iMac (21.5-inch, Late 2013)</span>  \n</body>";
        assert_eq!(
            extract_name(LookupStyle::RegisterProduct, page),
            Some("iMac (21.5-inch, Late 2013)".to_string())
        );
    }

    #[test]
    fn test_register_product_last_line_wins() {
        let page = "<div class=\"productname\">Placeholder</div>\n<p class=\"productname\"><b>MacBook Air (13-inch, Mid 2013)</b></p>";
        assert_eq!(
            extract_name(LookupStyle::RegisterProduct, page),
            Some("MacBook Air (13-inch, Mid 2013)".to_string())
        );
    }

    #[test]
    fn test_register_product_missing_marker() {
        assert_eq!(
            extract_name(LookupStyle::RegisterProduct, "<html>nothing here</html>"),
            None
        );
    }

    #[test]
    fn test_register_product_empty_name() {
        assert_eq!(
            extract_name(LookupStyle::RegisterProduct, "<td class=\"productname\"></td>"),
            None
        );
    }

    #[test]
    fn test_warranty_check_name() {
        let page = "<script>\n  warrantyPage.warrantycheck.displayProductInfo('MBP', 'MacBook Pro (Retina, 15-inch, Mid 2014)', 'x', 'y');\n</script>";
        assert_eq!(
            extract_name(LookupStyle::WarrantyCheck, page),
            Some("MacBook Pro (Retina, 15-inch, Mid 2014)".to_string())
        );
    }

    #[test]
    fn test_warranty_check_requires_prefix() {
        let page = "var x = warrantyPage.warrantycheck.displayProductInfo('MBP', 'Mac mini');";
        assert_eq!(extract_name(LookupStyle::WarrantyCheck, page), None);
    }

    #[test]
    fn test_warranty_check_without_arguments() {
        let page = "warrantyPage.warrantycheck.displayProductInfo();";
        assert_eq!(extract_name(LookupStyle::WarrantyCheck, page), None);
    }
}
