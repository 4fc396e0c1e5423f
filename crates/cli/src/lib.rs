//! # `metasync-cli` Library Crate
//!
//! Command definitions and handlers for the `metasync` binary. Handlers that touch the
//! org take a `MetadataReader` so they can be driven by any backend.

pub mod config;
pub mod report;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use metasync::constants::PROFILE_TYPE;
use metasync::{
    clean_profile, CleanConfig, MetadataReader, ProfileStore, RetrievalReport, Retriever,
};
use metasync_soap::SoapMetadataClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{get_config, AppConfig};

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file. Defaults to `metasync.yml` when it exists.
    #[arg(long, global = true, env = "METASYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve Profiles from the org and write them as source files
    Retrieve(RetrieveArgs),
    /// Strip environment-specific fields from Profile files already on disk
    Clean(CleanArgs),
    /// List the names of every Profile in the org
    List,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("selection").required(true).args(["names", "all", "from_dir"])))]
pub struct RetrieveArgs {
    /// Comma-separated Profile names to retrieve.
    #[arg(long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,
    /// Retrieve every Profile in the org.
    #[arg(long)]
    pub all: bool,
    /// Retrieve the Profiles that already have a file in the output directory.
    #[arg(long)]
    pub from_dir: bool,
    /// Directory Profile files are written to. Overrides `output_dir` from the config.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Write documents exactly as retrieved, without stripping any field.
    #[arg(long)]
    pub no_clean: bool,
    #[command(flatten)]
    pub keep: KeepArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Directory holding the Profile files. Overrides `output_dir` from the config.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Comma-separated Profile names to clean. Defaults to every file in the directory.
    #[arg(long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,
    #[command(flatten)]
    pub keep: KeepArgs,
}

/// Per-field opt-outs from cleaning.
#[derive(Args, Debug, Clone, Default)]
pub struct KeepArgs {
    /// Keep `loginIpRanges`.
    #[arg(long)]
    pub keep_login_ip_ranges: bool,
    /// Keep `userLicense`.
    #[arg(long)]
    pub keep_user_license: bool,
    /// Keep `loginHours`.
    #[arg(long)]
    pub keep_login_hours: bool,
}

impl KeepArgs {
    /// Applies the opt-outs on top of the configured toggles.
    pub fn apply(&self, mut config: CleanConfig) -> CleanConfig {
        config.login_ip_ranges &= !self.keep_login_ip_ranges;
        config.user_license &= !self.keep_user_license;
        config.login_hours &= !self.keep_login_hours;
        config
    }
}

// --- Public Entrypoint ---

/// The main entry point for the `metasync` library.
pub async fn run(cli: Cli) -> Result<()> {
    let config = get_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Retrieve(args) => {
            let reader = connect(&config)?;
            let report = handle_retrieve(reader, &args, &config).await?;
            println!("{}", report::format_report(&report));
            Ok(())
        }
        Commands::Clean(args) => {
            let changed = handle_clean(&args, &config)?;
            println!("{changed} file(s) cleaned");
            Ok(())
        }
        Commands::List => {
            let reader = connect(&config)?;
            for name in handle_list(reader).await? {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn connect(config: &AppConfig) -> Result<Arc<dyn MetadataReader>> {
    let soap_config = config.soap_config()?;
    let client = SoapMetadataClient::new(&soap_config).context("Failed to build SOAP client")?;
    info!("Connected to {}", client.endpoint());
    Ok(Arc::new(client))
}

// --- Command Handlers ---

/// Retrieves the selected Profiles and writes every built document to disk.
///
/// Per-profile failures are part of the returned report; only a failed remote call or
/// a failed write is an error.
pub async fn handle_retrieve(
    reader: Arc<dyn MetadataReader>,
    args: &RetrieveArgs,
    config: &AppConfig,
) -> Result<RetrievalReport> {
    let store = ProfileStore::new(args.output_dir.clone().unwrap_or(config.output_dir.clone()));

    let mut retriever = Retriever::new(reader, PROFILE_TYPE);
    let clean = args.keep.apply(config.clean);
    if args.no_clean || clean.is_noop() {
        info!("Cleaning disabled");
    } else {
        retriever = retriever.with_clean(clean);
    }

    let mut report = if args.all {
        retriever.retrieve_all().await?
    } else {
        let names = match &args.names {
            Some(names) => names.clone(),
            None => store
                .discover_names()
                .context("Failed to discover existing Profile files")?,
        };
        if names.is_empty() {
            warn!("No Profiles selected in '{}'", store.dir().display());
        }
        println!("Retrieving {} Profile(s)...", names.len());
        retriever.retrieve(&names).await?
    };

    for document in report.documents_mut() {
        let path = store
            .write(&document.name, &document.xml)
            .with_context(|| format!("Failed to write Profile '{}'", document.name))?;
        document.path = Some(path);
    }

    Ok(report)
}

/// Cleans Profile files in place and returns how many files changed.
pub fn handle_clean(args: &CleanArgs, config: &AppConfig) -> Result<usize> {
    let store = ProfileStore::new(args.output_dir.clone().unwrap_or(config.output_dir.clone()));
    let clean = args.keep.apply(config.clean);
    let names = match &args.names {
        Some(names) => names.clone(),
        None => store.discover_names()?,
    };

    let mut changed = 0;
    for name in &names {
        let original = store.read(name)?;
        let cleaned = clean_profile(&original, &clean)
            .with_context(|| format!("Failed to clean Profile '{name}'"))?;
        if cleaned != original {
            store.write(name, &cleaned)?;
            changed += 1;
        }
    }
    info!("Cleaned {changed} of {} Profile file(s)", names.len());
    Ok(changed)
}

/// Lists every Profile name in the org, sorted.
pub async fn handle_list(reader: Arc<dyn MetadataReader>) -> Result<Vec<String>> {
    let mut names = reader
        .list(PROFILE_TYPE)
        .await
        .context("Failed to list Profiles")?;
    names.sort();
    Ok(names)
}
