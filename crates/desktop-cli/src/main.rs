use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use desktop_core::{action_schemas, ToolUseBlock};
use desktop_tools::{ComputerUseDispatcher, DesktopConfig, DesktopSettings};
use serde_json::Value;

mod logging;

use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "desktop-cli")]
#[command(about = "Drive a remote desktop through computer-use actions")]
#[command(version)]
struct Cli {
    /// Base URL of the desktop service [env: DESKTOP_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Delay before the confirmation screenshot, in milliseconds [env: DESKTOP_SCREENSHOT_DELAY_MS]
    #[arg(long)]
    screenshot_delay_ms: Option<u64>,

    /// Timeout for one remote call, in milliseconds [env: DESKTOP_FETCH_TIMEOUT_MS]
    #[arg(long)]
    fetch_timeout_ms: Option<u64>,

    /// TOML file with base_url, screenshot_delay_ms and fetch_timeout_ms
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tool definitions as JSON
    Actions,
    /// Run one tool-use block and print the result envelope
    Dispatch {
        /// Tool-use JSON ({"id", "name", "input"}); read from stdin when omitted
        json: Option<String>,
    },
    /// Save a screenshot of the desktop as PNG
    Screenshot {
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Upload a local file to the desktop
    WriteFile {
        /// Destination path on the desktop
        remote: String,
        /// Local file to upload
        local: PathBuf,
    },
    /// Download a file from the desktop
    ReadFile {
        /// Path on the desktop
        remote: String,
        /// Write the decoded content here instead of printing the result
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Config file settings, overlaid with `env` and then with flags.
    fn desktop_config(&self, env: DesktopSettings) -> anyhow::Result<DesktopConfig> {
        let file = match &self.config {
            Some(path) => DesktopSettings::from_file(path)?,
            None => DesktopSettings::default(),
        };
        let flags = DesktopSettings {
            base_url: self.base_url.clone(),
            screenshot_delay_ms: self.screenshot_delay_ms,
            fetch_timeout_ms: self.fetch_timeout_ms,
        };
        Ok(file.merge(env).merge(flags).into_config()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match &cli.command {
        Commands::Actions => {
            println!("{}", serde_json::to_string_pretty(&action_schemas())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dispatch { json } => {
            let dispatcher = connect(&cli)?;
            let raw = match json {
                Some(raw) => raw.clone(),
                None => read_stdin()?,
            };
            let block = parse_tool_use(&raw)?;
            let envelope = dispatcher.handle_tool_use(&block).await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(exit_code(!envelope.is_error()))
        }
        Commands::Screenshot { output } => {
            let dispatcher = connect(&cli)?;
            let image = dispatcher.client().screenshot().await?;
            save_base64(output, &image)?;
            log::info!("Screenshot saved to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::WriteFile { remote, local } => {
            let dispatcher = connect(&cli)?;
            let bytes = std::fs::read(local)
                .with_context(|| format!("failed to read {}", local.display()))?;
            let outcome = dispatcher.files().write_bytes(remote, &bytes).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(exit_code(outcome.success))
        }
        Commands::ReadFile { remote, output } => {
            let dispatcher = connect(&cli)?;
            let outcome = dispatcher.files().read_file(remote).await;
            match (output, outcome.success, outcome.data.as_deref()) {
                (Some(path), true, Some(data)) => {
                    save_base64(path, data)?;
                    log::info!("{} saved to {}", remote, path.display());
                }
                _ => println!("{}", serde_json::to_string_pretty(&outcome)?),
            }
            Ok(exit_code(outcome.success))
        }
    }
}

/// Builds the dispatcher, failing before any request on a bad configuration.
fn connect(cli: &Cli) -> anyhow::Result<ComputerUseDispatcher> {
    let config = DesktopSettings::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|env| cli.desktop_config(env))
        .context("invalid desktop configuration")?;
    log::debug!(
        "Desktop service at {} (screenshot delay {:?}, fetch timeout {:?})",
        config.base_url(),
        config.screenshot_delay(),
        config.fetch_timeout()
    );
    Ok(ComputerUseDispatcher::new(&config)?)
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read tool-use JSON from stdin")?;
    Ok(raw)
}

/// Parses a tool-use block, assigning a fresh id when none is given.
fn parse_tool_use(raw: &str) -> anyhow::Result<ToolUseBlock> {
    let mut value: Value =
        serde_json::from_str(raw.trim()).context("tool-use is not valid JSON")?;
    let Some(fields) = value.as_object_mut() else {
        bail!("tool-use must be a JSON object");
    };
    let has_id = fields
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        fields.insert(
            "id".to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
    }
    serde_json::from_value(value).context("tool-use must have a string \"name\"")
}

fn save_base64(path: &Path, data: &str) -> anyhow::Result<()> {
    let bytes = STANDARD.decode(data).context("payload is not valid base64")?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    #[test]
    fn tool_use_gets_an_id_when_missing() {
        let block = parse_tool_use(r#"{"name": "computer_screenshot"}"#).unwrap();
        assert_eq!(block.name, "computer_screenshot");
        assert!(uuid::Uuid::parse_str(&block.id).is_ok());
        assert!(block.input.is_null());
    }

    #[test]
    fn tool_use_keeps_given_id() {
        let block = parse_tool_use(
            r#"{"id": "toolu_1", "name": "computer_wait", "input": {"duration": 500}}"#,
        )
        .unwrap();
        assert_eq!(block.id, "toolu_1");
        assert_eq!(block.input["duration"], 500);
    }

    #[test]
    fn tool_use_must_be_an_object_with_a_name() {
        assert!(parse_tool_use("[1, 2]").is_err());
        assert!(parse_tool_use(r#"{"id": "x"}"#).is_err());
        assert!(parse_tool_use("not json").is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"http://from-file:9990/\"\nscreenshot_delay_ms = 100\nfetch_timeout_ms = 2000"
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "desktop-cli",
            "--config",
            path.as_str(),
            "--base-url",
            "http://from-flag:9990",
            "--fetch-timeout-ms",
            "500",
            "actions",
        ])
        .unwrap();
        let config = cli.desktop_config(DesktopSettings::default()).unwrap();

        assert_eq!(config.base_url(), "http://from-flag:9990");
        assert_eq!(config.screenshot_delay(), Duration::from_millis(100));
        assert_eq!(config.fetch_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn environment_sits_between_file_and_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"http://from-file:9990/\"\nscreenshot_delay_ms = 100\nfetch_timeout_ms = 2000"
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();
        let env = DesktopSettings::from_lookup(|name| match name {
            "DESKTOP_BASE_URL" => Some("http://from-env:9990".to_string()),
            "DESKTOP_SCREENSHOT_DELAY_MS" => Some("300".to_string()),
            _ => None,
        })
        .unwrap();

        let cli = Cli::try_parse_from([
            "desktop-cli",
            "--config",
            path.as_str(),
            "--screenshot-delay-ms",
            "0",
            "actions",
        ])
        .unwrap();
        let config = cli.desktop_config(env).unwrap();

        assert_eq!(config.base_url(), "http://from-env:9990");
        assert_eq!(config.screenshot_delay(), Duration::ZERO);
        assert_eq!(config.fetch_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn saves_decoded_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        save_base64(&path, "aGVsbG8=").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert!(save_base64(&path, "%%%").is_err());
    }
}
