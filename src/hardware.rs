use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use crate::runner::CommandRunner;
use std::collections::BTreeMap;

pub const MODEL_ID_KEY: &str = "Model Identifier";
pub const SERIAL_KEY: &str = "Serial Number (system)";
pub const SMC_VERSION_KEY: &str = "SMC Version (system)";

/// Lines before the first "Key: Value" entry ("Hardware:", blank,
/// "Hardware Overview:", blank, ...).
const HEADER_LINES: usize = 5;

/// Key/value pairs reported by `system_profiler SPHardwareDataType`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareProfile {
    entries: BTreeMap<String, String>,
}

impl HardwareProfile {
    /// Run the hardware profiler and parse its output.
    pub fn query(runner: &dyn CommandRunner, tools: &ToolsConfig) -> Result<Self> {
        let output = runner.run(&tools.system_profiler, &["SPHardwareDataType"])?;
        Ok(parse_profile(&output))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a key that has to be present.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::MissingProfileKey(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse profiler output: skip the header, split each remaining non-blank
/// line on its first colon. Lines without a colon are ignored.
pub fn parse_profile(text: &str) -> HardwareProfile {
    let entries = text
        .lines()
        .skip(HEADER_LINES)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.trim().split_once(':'))
        .map(|(key, value)| (key.to_string(), value.trim().to_string()))
        .collect();

    HardwareProfile { entries }
}

/// The fields of the profile the firmware check depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineIdentity {
    pub model_id: String,
    pub serial: String,
    pub current_firmware: String,
}

impl MachineIdentity {
    pub fn from_profile(profile: &HardwareProfile) -> Result<Self> {
        let model_id = profile.require(MODEL_ID_KEY)?.to_string();
        tracing::debug!("Model ID: {}", model_id);

        let serial = profile.require(SERIAL_KEY)?.to_string();
        tracing::debug!("Serial Number: {}", serial);

        let current_firmware = profile.require(SMC_VERSION_KEY)?.to_string();
        tracing::debug!("Current SMC Version: {}", current_firmware);

        Ok(Self {
            model_id,
            serial,
            current_firmware,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILER_OUTPUT: &str = "\
Hardware:

    Hardware Overview:

      Model Name: iMac
      Model Identifier: iMac14,1
      Processor Name: Intel Core i5
      Processor Speed: 2.7 GHz
      Boot ROM Version: IM141.0118.B00
      SMC Version (system): 2.14f24
      Serial Number (system):   C02LK1ABCD12  \n\
      Hardware UUID: 01234567-89AB-CDEF-0123-456789ABCDEF
";

    #[test]
    fn test_parse_profile_trims_keys_and_values() {
        let profile = parse_profile(PROFILER_OUTPUT);
        assert_eq!(profile.get("Model Identifier"), Some("iMac14,1"));
        assert_eq!(profile.get("Serial Number (system)"), Some("C02LK1ABCD12"));
        assert_eq!(profile.get("SMC Version (system)"), Some("2.14f24"));
        // "Model Name" sits on the last header line
        assert!(profile.get("Model Name").is_none());
        assert_eq!(profile.len(), 7);
    }

    #[test]
    fn test_parse_profile_splits_on_first_colon() {
        let profile = parse_profile(PROFILER_OUTPUT);
        assert_eq!(
            profile.get("Hardware UUID"),
            Some("01234567-89AB-CDEF-0123-456789ABCDEF")
        );

        let text = "h\n\nh\n\n\n  Activation Lock: Status: Disabled\n";
        let profile = parse_profile(text);
        assert_eq!(profile.get("Activation Lock"), Some("Status: Disabled"));
    }

    #[test]
    fn test_parse_profile_skips_header_and_colonless_lines() {
        let text = "Header: one\nHeader: two\n\n\nHeader: five\nno colon here\n  Key: value\n";
        let profile = parse_profile(text);
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.get("Key"), Some("value"));
        assert!(profile.get("Header").is_none());
    }

    #[test]
    fn test_parse_profile_empty() {
        assert!(parse_profile("").is_empty());
    }

    #[test]
    fn test_identity_from_profile() {
        let identity = MachineIdentity::from_profile(&parse_profile(PROFILER_OUTPUT)).unwrap();
        assert_eq!(
            identity,
            MachineIdentity {
                model_id: "iMac14,1".to_string(),
                serial: "C02LK1ABCD12".to_string(),
                current_firmware: "2.14f24".to_string(),
            }
        );
    }

    #[test]
    fn test_identity_missing_key() {
        let text = "\n\n\n\n\n  Model Identifier: iMac14,1\n  SMC Version (system): 2.14f24\n";
        let err = MachineIdentity::from_profile(&parse_profile(text)).unwrap_err();
        match err {
            Error::MissingProfileKey(key) => assert_eq!(key, SERIAL_KEY),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_identity_reports_first_missing_key() {
        let err = MachineIdentity::from_profile(&HardwareProfile::default()).unwrap_err();
        assert!(matches!(err, Error::MissingProfileKey(key) if key == MODEL_ID_KEY));
    }
}
