use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Abstraction over the external tools fwcheck shells out to.
/// `SystemRunner` in production, replaceable by a scripted fake for testing.
pub trait CommandRunner {
    /// Run `program` with `args`, block until it exits and return its stdout.
    fn run(&self, program: &Path, args: &[&str]) -> Result<String>;
}

/// Runs programs on the real system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<String> {
        tracing::debug!("running {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::Spawn {
                program: program.to_path_buf(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                program: program.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
