use crate::check::{CheckOutcome, Findings};
use crate::hardware::{HardwareProfile, MachineIdentity};
use crate::reference::FirmwareRow;
use colored::Colorize;

const LABEL_W: usize = 18;

pub fn print_findings(findings: &Findings) {
    let id = &findings.identity;
    let rows = [
        ("Model", id.model_id.as_str()),
        ("Computer", findings.computer_name.as_deref().unwrap_or("Unknown")),
        ("Installed SMC", id.current_firmware.as_str()),
    ];
    for (label, value) in rows {
        println!("  {} {}", format!("{:<w$}", label, w = LABEL_W).dimmed(), value);
    }
    println!();

    match findings.outcome() {
        CheckOutcome::NoUpdate => println!("{}", findings.message().green()),
        CheckOutcome::UpdateAvailable => {
            let message = findings.message();
            let mut lines = message.lines();
            if let Some(title) = lines.next() {
                println!("{}", title.yellow().bold());
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }
}

pub fn print_findings_json(findings: &Findings) {
    let id = &findings.identity;
    let output = serde_json::json!({
        "model_id": id.model_id,
        "serial": id.serial,
        "computer_name": findings.computer_name,
        "current_firmware": id.current_firmware,
        "website_firmware": findings.website,
        "software_update": findings.software_update,
        "outcome": findings.outcome(),
        "update_available": findings.outcome() == CheckOutcome::UpdateAvailable,
        "message": findings.message(),
        "checked_at": chrono::Utc::now().to_rfc3339(),
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

pub fn print_table(rows: &[FirmwareRow]) {
    if rows.is_empty() {
        println!("{}", "  No firmware table rows found.".yellow());
        return;
    }

    let computer_w = rows.iter().map(|r| r.computer.len()).max().unwrap_or(0);
    let model_w = rows.iter().map(|r| r.model_id.len()).max().unwrap_or(0);

    println!(
        "  {}  {}  {}",
        format!("{:<w$}", "Computer", w = computer_w).bold(),
        format!("{:<w$}", "Model", w = model_w).bold(),
        "Firmware".bold()
    );
    for row in rows {
        println!(
            "  {:<cw$}  {}  {}",
            row.computer,
            format!("{:<mw$}", row.model_id, mw = model_w).cyan(),
            row.firmware,
            cw = computer_w
        );
    }
    println!("{}", format!("  {} rows", rows.len()).dimmed());
}

pub fn print_table_json(rows: &[FirmwareRow]) {
    println!("{}", serde_json::to_string_pretty(rows).unwrap_or_default());
}

pub fn print_profile(profile: &HardwareProfile, identity: Option<&MachineIdentity>) {
    println!("── {} {}", "Hardware profile".bold(), "─".repeat(44));
    for (key, value) in profile.iter() {
        println!("  {} {}", format!("{:<w$}", key, w = LABEL_W + 6).dimmed(), value);
    }
    println!("{}", "─".repeat(64));

    match identity {
        Some(id) => println!(
            "  {} {}  {} {}",
            "Model:".bold(),
            id.model_id.green(),
            "SMC:".bold(),
            id.current_firmware.green()
        ),
        None => println!(
            "  {}",
            "Required keys missing; a firmware check cannot run.".red()
        ),
    }
}

pub fn print_profile_json(profile: &HardwareProfile) {
    let map: serde_json::Map<String, serde_json::Value> = profile
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(map)).unwrap_or_default()
    );
}
