use crate::config::FwConfig;
use crate::error::{Error, Result};
use crate::hardware::{HardwareProfile, MachineIdentity};
use crate::lookup;
use crate::matcher::{MatchResult, match_firmware};
use crate::reference::{self, SupportArticleParser};
use crate::runner::CommandRunner;
use crate::softwareupdate;
use serde::Serialize;

/// Exit code when no firmware update was identified.
pub const EXIT_NO_UPDATE: i32 = 0;
/// Exit code when at least one source reports a firmware update.
pub const EXIT_UPDATE_AVAILABLE: i32 = 10;
/// Exit code when the hardware profile lacks a required key.
pub const EXIT_MISSING_PROFILE_KEY: i32 = 2;

pub const NO_UPDATE_MESSAGE: &str = "No new firmware version identified.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    NoUpdate,
    UpdateAvailable,
}

impl CheckOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            CheckOutcome::NoUpdate => EXIT_NO_UPDATE,
            CheckOutcome::UpdateAvailable => EXIT_UPDATE_AVAILABLE,
        }
    }
}

/// Everything one run learned about this machine's firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Findings {
    pub identity: MachineIdentity,
    pub computer_name: Option<String>,
    /// Version from the reference table, when it names an update.
    pub website: Option<String>,
    /// Firmware-related entries from softwareupdate.
    pub software_update: Vec<String>,
}

impl Findings {
    pub fn outcome(&self) -> CheckOutcome {
        if self.website.is_some() || !self.software_update.is_empty() {
            CheckOutcome::UpdateAvailable
        } else {
            CheckOutcome::NoUpdate
        }
    }

    /// Human-readable summary, one line per available update.
    pub fn message(&self) -> String {
        if self.outcome() == CheckOutcome::NoUpdate {
            return NO_UPDATE_MESSAGE.to_string();
        }

        let mut output = String::from("Firmware updates found:");
        if let Some(version) = &self.website {
            output.push_str(&format!("\n    Apple support site: {}", version));
        }
        for update in &self.software_update {
            output.push_str(&format!("\n    softwareupdate: {}", update));
        }
        output
    }
}

/// Exit code for a run that failed with `err`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(Error::MissingProfileKey(_)) => EXIT_MISSING_PROFILE_KEY,
        _ => 1,
    }
}

/// The reference version counts as an update when it is known, non-empty
/// and differs from what is installed.
pub fn website_update(website: Option<&str>, current: &str) -> Option<String> {
    website
        .filter(|v| !v.is_empty() && *v != current)
        .map(str::to_string)
}

/// Run the whole check. A missing hardware key fails before any network
/// request or softwareupdate call is made.
pub fn run_check(runner: &dyn CommandRunner, config: &FwConfig) -> Result<Findings> {
    let profile = HardwareProfile::query(runner, &config.tools)?;
    let identity = MachineIdentity::from_profile(&profile)?;

    let software_update = softwareupdate::firmware_updates(runner, &config.tools)?;

    let computer_name =
        match lookup::resolve_computer_name(runner, &config.tools, &config.lookup, &identity.serial)
        {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("computer name lookup failed: {}", e);
                None
            }
        };

    let website = match &computer_name {
        Some(name) => {
            tracing::debug!("Computer Name: {}", name);
            website_firmware(runner, config, &identity.model_id, name)?
        }
        None => {
            tracing::warn!("Unable to look up website firmware information.");
            None
        }
    };

    let website = website_update(website.as_deref(), &identity.current_firmware);

    Ok(Findings {
        identity,
        computer_name,
        website,
        software_update,
    })
}

/// Expected firmware version from the reference table, `None` when the
/// machine cannot be matched.
fn website_firmware(
    runner: &dyn CommandRunner,
    config: &FwConfig,
    model_id: &str,
    computer_name: &str,
) -> Result<Option<String>> {
    let parser = SupportArticleParser::from_config(&config.reference);
    let rows = reference::fetch_table(runner, &config.tools, &config.reference.url, &parser)?;

    match match_firmware(&rows, model_id, computer_name) {
        MatchResult::Found(version) => Ok(Some(version)),
        MatchResult::ModelNotFound => {
            tracing::warn!("No such model ID found: {}", model_id);
            Ok(None)
        }
        MatchResult::NameMismatch { candidates } => {
            tracing::error!(
                "No match between model ID ({}) and computer name ({}); candidates: {}",
                model_id,
                computer_name,
                candidates.join(", ")
            );
            Ok(None)
        }
    }
}
