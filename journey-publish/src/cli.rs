/// This module implements the full CLI interface for journey-publish—handling command
/// parsing, argument validation, main entrypoints, and user-visible invocations.
///
/// All core business logic (data models, the publish pipeline, the storage contract)
/// lives in the [`journey-publish-core`] crate. This module is strictly for CLI glue,
/// ergonomic argument exposure, and orchestration.
///
/// ## Features
/// - Entry struct [`Cli`] defines all user-facing options and subcommands.
/// - Subcommand routing (`publish`, `promote-latest`) and argument validation.
/// - Async entrypoint (`run`) for programmatic invocation and integration testing.
/// - Logging, tracing, and structured error output at CLI level.
///
/// ## How To Use
/// - For command-line users: use the installed `journey-publish` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`journey-publish-core`]: ../../journey-publish-core/
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use journey_publish_core::latest::promote_latest;
use journey_publish_core::publish::{publish, PublishOptions};
use journey_publish_core::upload::DEFAULT_MAX_IN_FLIGHT;

use crate::load_config::{load_asset_manifest, load_journey};
use crate::store::S3Store;

/// CLI for journey-publish: ship a versioned journey asset bundle to S3.
#[derive(Parser)]
#[clap(
    name = "journey-publish",
    version,
    about = "Publish versioned journey asset bundles to S3 and record their CDN url manifest"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the journey's assets and metadata under {name}/{version}/
    Publish {
        /// Location of the journey.json file
        #[clap(long, default_value = "journey.json")]
        journey: PathBuf,
        /// Target S3 bucket; overrides the bucket named in journey.json
        #[clap(long)]
        bucket: Option<String>,
        /// URL prefix under which published assets are publicly served
        #[clap(long)]
        cdn_domain: String,
        /// AWS region of the target bucket
        #[clap(long, default_value = "us-east-1")]
        region: String,
        /// Maximum number of simultaneous in-flight uploads
        #[clap(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
        max_in_flight: usize,
    },
    /// Point {name}/latest/ at this version's published url manifest
    PromoteLatest {
        /// Location of the journey.json file
        #[clap(long, default_value = "journey.json")]
        journey: PathBuf,
        /// Target S3 bucket; overrides the bucket named in journey.json
        #[clap(long)]
        bucket: Option<String>,
        /// URL prefix under which published assets are publicly served
        #[clap(long)]
        cdn_domain: String,
        /// AWS region of the target bucket
        #[clap(long, default_value = "us-east-1")]
        region: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Publish {
            journey,
            bucket,
            cdn_domain,
            region,
            max_in_flight,
        } => {
            let journey = load_journey(&journey, bucket, cdn_domain)?;
            let assets = load_asset_manifest(&journey.manifest)?;
            tracing::info!(command = "publish", "Starting publish");

            let store = S3Store::new(region).await;
            let options = PublishOptions { max_in_flight };
            match publish(&journey, &assets, &store, &options).await {
                Ok(report) => {
                    tracing::info!(
                        command = "publish",
                        name = %report.name,
                        version = %report.version,
                        uploaded = report.uploaded,
                        "Finished publishing all assets to S3"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "publish", error = %e, "Publish failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::PromoteLatest {
            journey,
            bucket,
            cdn_domain,
            region,
        } => {
            let journey = load_journey(&journey, bucket, cdn_domain)?;
            tracing::info!(command = "promote-latest", "Promoting version to latest");

            let store = S3Store::new(region).await;
            match promote_latest(&journey, &store).await {
                Ok(()) => {
                    tracing::info!(
                        command = "promote-latest",
                        name = %journey.name,
                        version = %journey.version,
                        "Promotion complete"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "promote-latest", error = %e, "Promotion failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
