//! Azure CLI command execution.
//!
//! Builds `az` invocations as argument vectors and decodes their JSON output.

use crate::config;
use crate::error::ProviderError;
use colored::Colorize;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fmt;
use std::process::Command;

/// Error code for a non-zero `az` exit.
pub const CODE_CLI_ERROR: &str = "AzCliError";
/// Error code for output that could not be decoded.
pub const CODE_INVALID_RESPONSE: &str = "InvalidResponse";

/// An `az` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzCommand {
    program: String,
    args: Vec<String>,
}

impl AzCommand {
    /// Start a command, e.g. `AzCommand::new("az", &["network", "public-ip", "create"])`.
    pub fn new(program: &str, subcommand: &[&str]) -> Self {
        AzCommand {
            program: program.to_string(),
            args: subcommand.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Append `--flag value`.
    pub fn arg(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.into());
        self
    }

    /// Append `--flag v1 v2 ...`. Skipped when `values` is empty.
    pub fn args<I, S>(mut self, flag: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if !values.is_empty() {
            self.args.push(flag.to_string());
            self.args.extend(values);
        }
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Run the command and return stdout.
    pub fn run(&self) -> Result<String, ProviderError> {
        log::debug!("run({cmd})", cmd = self.to_string().on_blue());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--output")
            .arg("json")
            .output()
            .map_err(|e| {
                log::error!("Command execution failed: {}", e);
                ProviderError::new(CODE_CLI_ERROR, format!("Failed to execute command: {e}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::trace!(
                "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
                code = output.status.code(),
                status = output.status,
                stderr = stderr.red()
            );
            log::warn!(
                "{failed} to run {cmd}",
                failed = "failed".on_red(),
                cmd = self.to_string().on_blue()
            );
            return Err(ProviderError::new(CODE_CLI_ERROR, stderr.trim()));
        }

        log::debug!("Success output.stdout.len(): {}", output.stdout.len());
        if output.stdout.len() > config::MAX_CLI_OUTPUT_BYTES {
            return Err(ProviderError::new(
                CODE_INVALID_RESPONSE,
                format!("Response too large: {} bytes", output.stdout.len()),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ProviderError::new(CODE_INVALID_RESPONSE, format!("Invalid UTF-8: {e}")))
    }

    /// Run the command and decode stdout as `T`.
    pub fn run_json<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        let output = self.run()?;
        decode(&output)
    }
}

/// Decode `az` JSON output, naming the failing path on error.
pub fn decode<T: DeserializeOwned>(output: &str) -> Result<T, ProviderError> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::trace!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        ProviderError::new(
            CODE_INVALID_RESPONSE,
            format!("path={} error={}", e.path(), e.inner()),
        )
    })
}

/// Shell-like rendering for logs. Arguments with spaces are single quoted.
impl fmt::Display for AzCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|a| {
                if a.is_empty() || a.contains(char::is_whitespace) {
                    format!("'{a}'")
                } else {
                    a.clone()
                }
            })
            .join(" ");
        f.write_str(&rendered)
    }
}
