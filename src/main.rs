// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2md::config::{CommandLineInput, ConvertConfig};
use notion2md::constants::RAW_DUMP_FILE_NAME;
use notion2md::output::{deliver, DeliveryTarget, OutputPlan, OutputReport};
use notion2md::{AppError, BlockId, Converter, DocumentSource, HttpAssetStore, NotionHttpClient};
use std::fs;
use std::sync::Arc;

/// Sets up logging: console on stderr so pipe mode keeps stdout clean, plus
/// a debug-level log file in the temp dir.
fn setup_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2md.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    // The file always records debug output; the console follows --verbose.
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("console", Box::new(console)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Fetches, converts and delivers one page.
async fn run(config: &ConvertConfig) -> Result<()> {
    let client = Arc::new(
        NotionHttpClient::new(&config.api_key, config.client_options())
            .context("Failed to build the Notion client")?,
    );
    let store = Arc::new(
        HttpAssetStore::new(config.timeout).context("Failed to build the asset downloader")?,
    );
    let converter = Converter::new(
        client.clone(),
        store,
        config.resolver_options(),
        config.converter_options(),
    );

    log::info!("Converting page {}", config.page_id);

    let mut plan = OutputPlan::new();
    let converted = if config.dump_json {
        let root: BlockId = config.page_id.cast();
        let blocks = client
            .fetch_children(&root)
            .await
            .with_context(|| format!("Failed to fetch the blocks of page {}", config.page_id))?;
        let dump = serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")?;
        plan = plan.with_operation(DeliveryTarget::WriteFile {
            path: config.asset_dir.join(RAW_DUMP_FILE_NAME),
            content: dump,
        });
        converter.convert(&blocks).await
    } else {
        converter.convert_page(&config.page_id).await
    };
    let markdown =
        converted.with_context(|| format!("Failed to convert page {}", config.page_id))?;

    if config.download {
        plan = plan.with_operation(DeliveryTarget::CreateDirectory {
            path: config.asset_dir.clone(),
        });
    }
    plan = plan.with_operation(if config.pipe {
        DeliveryTarget::PrintToStdout { content: markdown }
    } else {
        DeliveryTarget::WriteFile {
            path: config.output.clone(),
            content: markdown,
        }
    });

    let report = deliver(plan);
    if !report.is_success() {
        return Err(AppError::DeliveryFailed {
            failures: report.failed.iter().map(|f| f.error.clone()).collect(),
        }
        .into());
    }
    report_completion(config, &report);
    Ok(())
}

fn report_completion(config: &ConvertConfig, report: &OutputReport) {
    if config.pipe {
        return;
    }
    for completed in &report.completed {
        if let DeliveryTarget::WriteFile { path, .. } = &completed.operation {
            println!("✓ Wrote {} ({} bytes)", path.display(), completed.bytes_written);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("Failed to initialize logging")?;

    let config = ConvertConfig::resolve(cli).context("Invalid configuration")?;

    run(&config).await
}
