// src/config.rs
use crate::api::{ClientOptions, PageLimit};
use crate::assets::ResolverOptions;
use crate::constants::{CHILDREN_MAX_PAGES, MAX_CONCURRENCY, NETWORK_CALL_TIMEOUT_SECS};
use crate::error::AppError;
use crate::error_recovery::retry_budget;
use crate::formatting::{ConverterOptions, OverrunScope};
use crate::output::{default_asset_dir, get_relative_path};
use crate::types::{ApiKey, PageId, ValidationError};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables checked, in order, for the integration token.
const API_KEY_VARS: [&str; 2] = ["NOTION_API_KEY", "NOTION_TOKEN"];

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URL or ID (e.g., "https://www.notion.so/workspace/Title-<id>")
    pub page: String,

    /// Markdown file to write
    #[arg(short, long, default_value = "output.md")]
    pub output: PathBuf,

    /// Directory for downloaded assets (defaults to `<output stem>_assets` next to the output)
    #[arg(long)]
    pub asset_dir: Option<PathBuf>,

    /// Keep remote links instead of downloading images and files
    #[arg(long, default_value_t = false)]
    pub no_download: bool,

    /// Number of concurrent network calls (default: auto, max 32)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Timeout in seconds for each network call
    #[arg(long, default_value_t = NETWORK_CALL_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum result pages fetched for one block's children
    #[arg(long, default_value_t = CHILDREN_MAX_PAGES)]
    pub max_pages: u32,

    /// Fail the whole conversion when a child list exceeds the page cap
    /// (by default only the offending block is dropped)
    #[arg(long, default_value_t = false)]
    pub abort_on_overrun: bool,

    /// Also write the top-level blocks as JSON into the asset directory
    #[arg(long, default_value_t = false)]
    pub dump_json: bool,

    /// Pipe mode - print the markdown to stdout instead of writing the output file
    #[arg(short = 'p', long, default_value_t = false)]
    pub pipe: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved conversion configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub page_id: PageId,
    pub api_key: ApiKey,
    pub output: PathBuf,
    pub asset_dir: PathBuf,
    /// The asset directory as linked from the output file.
    pub link_prefix: String,
    pub download: bool,
    pub dump_json: bool,
    pub pipe: bool,
    pub verbose: bool,
    pub concurrency: usize,
    pub timeout: Duration,
    pub max_pages: u32,
    pub overrun_scope: OverrunScope,
}

impl ConvertConfig {
    /// Resolves the configuration from CLI input and the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "{} environment variable not set",
                    API_KEY_VARS.join(" or ")
                ))
            })?;
        Self::resolve_with_key(cli, &api_key)
    }

    /// Resolves the configuration with an explicitly supplied token.
    pub fn resolve_with_key(cli: CommandLineInput, api_key: &str) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key.trim())?;
        let page_id = PageId::parse(&cli.page)?;

        if cli.timeout == 0 {
            return Err(ValidationError::OutOfBounds {
                value: 0,
                min: 1,
                max: u64::MAX,
            }
            .into());
        }

        let concurrency = match cli.concurrency {
            Some(n) if n == 0 || n > MAX_CONCURRENCY => {
                return Err(ValidationError::OutOfBounds {
                    value: n as u64,
                    min: 1,
                    max: MAX_CONCURRENCY as u64,
                }
                .into())
            }
            Some(n) => n,
            None => ConverterOptions::default_concurrency(),
        };

        let asset_dir = cli
            .asset_dir
            .clone()
            .unwrap_or_else(|| default_asset_dir(&cli.output));
        let link_prefix = link_prefix(&cli.output, &asset_dir)?;

        Ok(ConvertConfig {
            page_id,
            api_key,
            output: cli.output,
            asset_dir,
            link_prefix,
            download: !cli.no_download,
            dump_json: cli.dump_json,
            pipe: cli.pipe,
            verbose: cli.verbose,
            concurrency,
            timeout: Duration::from_secs(cli.timeout),
            max_pages: cli.max_pages,
            overrun_scope: if cli.abort_on_overrun {
                OverrunScope::Document
            } else {
                OverrunScope::Block
            },
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout,
            page_limit: PageLimit::new(self.max_pages),
        }
    }

    /// The walker's deadline covers every retry the client makes inside it.
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            concurrency: self.concurrency,
            call_timeout: self.call_budget(),
            overrun_scope: self.overrun_scope,
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            destination_dir: self.asset_dir.clone(),
            link_prefix: self.link_prefix.clone(),
            download: self.download,
            timeout: self.call_budget(),
        }
    }

    fn call_budget(&self) -> Duration {
        retry_budget(self.timeout)
    }
}

/// Both paths are made absolute first so a relative output and an absolute
/// asset directory (or the reverse) still produce a relative link.
fn link_prefix(output: &Path, asset_dir: &Path) -> Result<String, AppError> {
    let output = std::path::absolute(output)?;
    let asset_dir = std::path::absolute(asset_dir)?;
    get_relative_path(&output, &asset_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEY: &str = "secret_abcdefghijklmnopqrs";
    const PAGE: &str = "https://www.notion.so/acme/Launch-Plan-550e8400e29b41d4a716446655440000";

    fn cli(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["notion2md"];
        argv.extend_from_slice(args);
        CommandLineInput::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::resolve_with_key(cli(&[PAGE]), KEY).unwrap();

        assert_eq!(config.page_id.as_str(), "550e8400e29b41d4a716446655440000");
        assert_eq!(config.output, PathBuf::from("output.md"));
        assert_eq!(config.asset_dir, PathBuf::from("output_assets"));
        assert_eq!(config.link_prefix, "output_assets");
        assert!(config.download);
        assert!(!config.pipe);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_pages, 100);
        assert!(config.concurrency >= 4 && config.concurrency <= 24);
        assert_eq!(config.converter_options().overrun_scope, OverrunScope::Block);
    }

    #[test]
    fn test_asset_dir_link_is_relative_to_output() {
        let config = ConvertConfig::resolve_with_key(
            cli(&[PAGE, "-o", "out/doc.md", "--asset-dir", "media"]),
            KEY,
        )
        .unwrap();
        assert_eq!(config.link_prefix, "../media");

        let config =
            ConvertConfig::resolve_with_key(cli(&[PAGE, "-o", "out/doc.md"]), KEY).unwrap();
        assert_eq!(config.asset_dir, PathBuf::from("out/doc_assets"));
        assert_eq!(config.link_prefix, "doc_assets");
    }

    #[test]
    fn test_flags_reach_library_options() {
        let config = ConvertConfig::resolve_with_key(
            cli(&[
                PAGE,
                "--no-download",
                "--concurrency",
                "8",
                "--timeout",
                "5",
                "--max-pages",
                "3",
                "--abort-on-overrun",
            ]),
            KEY,
        )
        .unwrap();

        assert!(!config.resolver_options().download);
        assert_eq!(config.converter_options().concurrency, 8);
        assert_eq!(config.client_options().timeout, Duration::from_secs(5));
        assert_eq!(config.client_options().page_limit.max_pages(), 3);
        assert!(config.converter_options().call_timeout > config.client_options().timeout);
        assert_eq!(config.converter_options().overrun_scope, OverrunScope::Document);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        assert!(ConvertConfig::resolve_with_key(cli(&["not-an-id"]), KEY).is_err());
        assert!(ConvertConfig::resolve_with_key(cli(&[PAGE]), "bogus").is_err());
        assert!(
            ConvertConfig::resolve_with_key(cli(&[PAGE, "--concurrency", "64"]), KEY).is_err()
        );
        assert!(ConvertConfig::resolve_with_key(cli(&[PAGE, "--timeout", "0"]), KEY).is_err());
    }
}
