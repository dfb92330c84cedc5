use crate::config::ToolsConfig;
use crate::error::Result;
use crate::runner::CommandRunner;

/// Index of the line that is blank when no updates are pending at all.
const EMPTY_MARKER_LINE: usize = 4;
/// Update entries start after this many lines.
const HEADER_LINES: usize = 5;
/// Prefix of a line naming an available update.
const BULLET: &str = "   * ";

/// Ask `softwareupdate -l` for pending updates and keep the firmware ones.
pub fn firmware_updates(runner: &dyn CommandRunner, tools: &ToolsConfig) -> Result<Vec<String>> {
    let output = runner.run(&tools.softwareupdate, &["-l"])?;
    let updates = parse_updates(&output);
    tracing::debug!("softwareupdate firmware entries: {:?}", updates);
    Ok(updates)
}

/// Extract firmware-related update names from `softwareupdate -l` output,
/// keeping their original order.
pub fn parse_updates(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();

    match lines.get(EMPTY_MARKER_LINE) {
        Some(line) if !line.is_empty() => {}
        _ => return Vec::new(),
    }

    lines[HEADER_LINES.min(lines.len())..]
        .iter()
        .filter_map(|line| line.strip_prefix(BULLET))
        .filter(|name| is_firmware_update(name))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive "firm" or "efi" match on an update name.
pub fn is_firmware_update(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("firm") || lower.contains("efi")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_UPDATES: &str = "\
Software Update Tool
Copyright 2002-2015 Apple Inc.

Finding available software
Software Update found the following new or updated software:
   * EFIUpdate-1.2
\tEFI Firmware Update (1.2), 3012K [recommended] [restart]
   * iTunesXPatch-12.3.2
\tiTunes (12.3.2), 180000K [recommended]
   * SMC Firmware Update-2.0
\tSMC Firmware Update (2.0), 500K [recommended] [restart]
";

    #[test]
    fn test_parse_updates_filters_firmware() {
        assert_eq!(
            parse_updates(WITH_UPDATES),
            vec!["EFIUpdate-1.2", "SMC Firmware Update-2.0"]
        );
    }

    #[test]
    fn test_parse_updates_blank_fifth_line_means_none() {
        let text = "\
Software Update Tool
Copyright 2002-2015 Apple Inc.

Finding available software

   * EFIUpdate-1.2
";
        assert!(parse_updates(text).is_empty());
    }

    #[test]
    fn test_parse_updates_short_output() {
        assert!(parse_updates("").is_empty());
        assert!(parse_updates("Software Update Tool\n\nNo new software available.\n").is_empty());
    }

    #[test]
    fn test_parse_updates_requires_exact_bullet() {
        let text = "a\nb\nc\nd\nfound:\n  * EFI short indent\n   * EFI ok\n    * EFI long indent\n   *EFI no space\n";
        assert_eq!(parse_updates(text), vec!["EFI ok"]);
    }

    #[test]
    fn test_parse_updates_ignores_header_bullets() {
        let text = "a\nb\nc\n   * Firmware in header\nfound:\n   * Firmware entry\n";
        assert_eq!(parse_updates(text), vec!["Firmware entry"]);
    }

    #[test]
    fn test_is_firmware_update() {
        assert!(is_firmware_update("XYZ Firmware Update"));
        assert!(is_firmware_update("MacBookAirEFIUpdate2.4"));
        assert!(is_firmware_update("FIRMWARE"));
        assert!(!is_firmware_update("Safari 9.0.3"));
    }
}
