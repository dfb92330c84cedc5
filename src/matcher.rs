use crate::reference::FirmwareRow;

/// Result of looking a machine up in the reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Expected firmware version for this machine.
    Found(String),
    /// The model identifier is not in the table.
    ModelNotFound,
    /// Several rows share the model identifier and none carries the
    /// resolved computer name.
    NameMismatch { candidates: Vec<String> },
}

impl MatchResult {
    pub fn version(&self) -> Option<&str> {
        match self {
            MatchResult::Found(version) => Some(version),
            _ => None,
        }
    }
}

/// Find the expected firmware version for `model_id`. When the model
/// appears more than once, `computer_name` picks the row.
pub fn match_firmware(rows: &[FirmwareRow], model_id: &str, computer_name: &str) -> MatchResult {
    let matches: Vec<&FirmwareRow> = rows.iter().filter(|r| r.model_id == model_id).collect();

    let row = match matches.as_slice() {
        [] => return MatchResult::ModelNotFound,
        [only] => *only,
        several => {
            tracing::warn!("Multiple matches found. Using name: '{}'", computer_name);
            match several.iter().find(|r| r.computer == computer_name) {
                Some(row) => *row,
                None => {
                    return MatchResult::NameMismatch {
                        candidates: several.iter().map(|r| r.computer.clone()).collect(),
                    };
                }
            }
        }
    };

    MatchResult::Found(row.version().to_string())
}
