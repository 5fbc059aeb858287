//! adad CLI tool
//!
//! Fetches counting-scheme reference data, applies hierarchical selection
//! filtering, and prints or exports the projected tables.
//!
//! ## Commands
//!
//! - `schemes`: aggregate scheme overview (one row of count ranges)
//! - `ayahs`: per-ayah classification breakdown
//! - `surahs`: per-surah count breakdown

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use adad_core::{
    cache::FileCache,
    config::Config,
    export,
    projection::Projection,
    properties::SchemeId,
    selection::Expansion,
    service::SchemeService,
    source::HttpSchemeSource,
    Error,
};

#[derive(Parser)]
#[command(name = "adad")]
#[command(author, version, about = "Quranic verse-counting scheme reference tables", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed JSON of the export shape
    Json,
    /// CSV of the projected table
    Csv,
}

#[derive(Debug, clap::Args)]
struct TableArgs {
    /// Scheme ids to select; selection closes over the hierarchy.
    /// Defaults to every scheme.
    #[arg(short, long)]
    select: Vec<u32>,

    /// Expand selection to whole subtrees instead of direct children only
    #[arg(long)]
    deep: bool,

    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate scheme overview table
    Schemes(TableArgs),

    /// Per-ayah breakdown table
    Ayahs(TableArgs),

    /// Per-surah breakdown table
    Surahs(TableArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let source = HttpSchemeSource::from_config(&config)?;
    let mut service = SchemeService::new(source);
    if let Some(cache_dir) = &config.cache_dir {
        service = service.with_cache(Box::new(FileCache::new(cache_dir.clone())));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        service.load_schemes(false).await?;
        match &cli.command {
            Commands::Schemes(_) => {}
            Commands::Ayahs(_) => service.load_ayah_stats(false).await?,
            Commands::Surahs(_) => service.load_surah_stats(false).await?,
        }
        Ok::<(), Error>(())
    })?;

    let (args, table, json_shape) = match &cli.command {
        Commands::Schemes(args) => {
            let table = project(&service, args, SchemeService::aggregate_table)?;
            let shape = serde_json::to_value(export::scheme_stats_export(
                service.scheme_stats(),
                &*service.index()?,
            ))?;
            (args, table, shape)
        }
        Commands::Ayahs(args) => {
            let table = project(&service, args, SchemeService::ayah_table)?;
            let stats = service
                .ayah_stats()
                .ok_or_else(|| Error::NotLoaded("Per-ayah statistics".to_string()))?;
            let shape = serde_json::to_value(export::ayah_stats_export(
                stats,
                &*service.index()?,
                service.surah_names(),
            ))?;
            (args, table, shape)
        }
        Commands::Surahs(args) => {
            let table = project(&service, args, SchemeService::surah_table)?;
            let stats = service
                .surah_stats()
                .ok_or_else(|| Error::NotLoaded("Per-surah statistics".to_string()))?;
            let shape =
                export::surah_stats_export(stats, &*service.index()?, service.surah_names());
            (args, table, shape)
        }
    };

    let rendered = match args.format {
        Format::Json => export::to_pretty_json(&json_shape)?,
        Format::Csv => export::projection_to_csv(&table),
    };

    match &args.out {
        Some(path) => {
            export::write_export(path, &rendered)?;
            println!("Wrote {} rows to {}", table.rows.len(), path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn project<S, F>(service: &SchemeService<S>, args: &TableArgs, builder: F) -> Result<Projection, Error>
where
    S: adad_core::source::SchemeSource,
    F: Fn(&SchemeService<S>, &[SchemeId], Expansion) -> Result<Projection, Error>,
{
    let selected: Vec<SchemeId> = if args.select.is_empty() {
        service.all_scheme_ids()?
    } else {
        args.select.iter().copied().map(SchemeId).collect()
    };
    let expansion = if args.deep {
        Expansion::Descendants
    } else {
        Expansion::DirectChildren
    };
    builder(service, &selected, expansion)
}
