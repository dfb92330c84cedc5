use anyhow::Result;
use clap::Parser;
use fwcheck::check::{self, EXIT_MISSING_PROFILE_KEY};
use fwcheck::cli::{Cli, Command};
use fwcheck::config::FwConfig;
use fwcheck::hardware::{HardwareProfile, MachineIdentity};
use fwcheck::reference::{self, SupportArticleParser};
use fwcheck::runner::SystemRunner;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            check::exit_code_for(&e)
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    if let Some(Command::Completions { shell }) = cli.command {
        fwcheck::cli::print_completions(shell);
        return Ok(0);
    }

    let mut config = fwcheck::config::load(cli.config.as_deref());
    if cli.verbose {
        config.logging.verbose = true;
    }
    if cli.no_log {
        config.logging.enabled = false;
    }
    if let Some(path) = cli.log_dest {
        config.logging.path = Some(path);
    }

    fwcheck::logging::init(&config.logging);
    config.validate()?;

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => cmd_check(&config, cli.json),
        Command::Table { model } => cmd_table(&config, model.as_deref(), cli.json),
        Command::Profile => cmd_profile(&config, cli.json),
        Command::Completions { .. } => Ok(0),
    }
}

fn cmd_check(config: &FwConfig, json: bool) -> Result<i32> {
    let findings = check::run_check(&SystemRunner, config)?;

    tracing::info!("{}", findings.message());

    if json {
        fwcheck::output::print_findings_json(&findings);
    } else {
        fwcheck::output::print_findings(&findings);
    }

    Ok(findings.outcome().exit_code())
}

fn cmd_table(config: &FwConfig, model: Option<&str>, json: bool) -> Result<i32> {
    let parser = SupportArticleParser::from_config(&config.reference);
    let mut rows =
        reference::fetch_table(&SystemRunner, &config.tools, &config.reference.url, &parser)?;

    if let Some(model) = model {
        rows.retain(|r| r.model_id == model);
    }

    if json {
        fwcheck::output::print_table_json(&rows);
    } else {
        fwcheck::output::print_table(&rows);
    }

    Ok(0)
}

fn cmd_profile(config: &FwConfig, json: bool) -> Result<i32> {
    let profile = HardwareProfile::query(&SystemRunner, &config.tools)?;
    let identity = MachineIdentity::from_profile(&profile);

    if json {
        fwcheck::output::print_profile_json(&profile);
    } else {
        fwcheck::output::print_profile(&profile, identity.as_ref().ok());
    }

    match identity {
        Ok(_) => Ok(0),
        Err(e) => {
            tracing::error!("{}", e);
            Ok(EXIT_MISSING_PROFILE_KEY)
        }
    }
}
