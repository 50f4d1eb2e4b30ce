use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use waxtag::SUPPORTED_EXTENSIONS;
use waxtag::metadata::{self, FullMetadata};

#[derive(Parser)]
#[command(
    name = "waxtag",
    version,
    about = "Music metadata inference from paths and embedded tags"
)]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk directories and print a canonical record per recognized file
    Scan {
        /// Directories to scan (defaults to config file music_dirs)
        paths: Vec<String>,

        /// Consult embedded tags before trying path patterns
        #[arg(long)]
        tags_first: bool,
    },

    /// Show each pipeline's output for a single file
    Inspect {
        file: PathBuf,
    },

    /// Extract embedded cover art
    Art {
        file: PathBuf,

        /// Output filename without extension (the image type picks the suffix)
        #[arg(short, long, default_value = "cover")]
        output: String,
    },

    /// Decode a compressed audio file to a temporary WAV
    Wav {
        file: PathBuf,

        /// Treat the input as this type instead of trusting the extension
        #[arg(long)]
        type_hint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing) and append any
    // user-defined path patterns behind the built-ins.
    let config = waxtag::config::AppConfig::load();
    config.register_patterns();

    match cli.command {
        Commands::Scan { paths, tags_first } => {
            // Resolve scan paths: CLI args > config music_dirs
            let scan_paths = if !paths.is_empty() {
                paths
            } else if !config.music_dirs.is_empty() {
                config.music_dirs.iter().map(|p| p.to_string_lossy().to_string()).collect()
            } else {
                anyhow::bail!(
                    "No directories to scan. Pass paths as arguments or set music_dirs in config."
                );
            };

            let summary = scan(&scan_paths, tags_first).await?;
            println!(
                "Scan complete: {} files, {} from path, {} from tags, {} unrecognized",
                summary.scanned, summary.from_path, summary.from_tags, summary.unrecognized
            );
        }

        Commands::Inspect { file } => inspect(&file).await?,

        Commands::Art { file, output } => {
            match waxtag::cover::to_file(&file, &output).context("Cover extraction failed")? {
                Some(path) => println!("Wrote {}", path.display()),
                None => println!("No embedded art in {}", file.display()),
            }
        }

        Commands::Wav { file, type_hint } => {
            let output = waxtag::decode::make_wave(&file, type_hint.as_deref())
                .await
                .context("Decode failed")?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}

struct ScanSummary {
    scanned: u64,
    from_path: u64,
    from_tags: u64,
    unrecognized: u64,
}

#[derive(Clone, Copy, PartialEq)]
enum Source {
    Path,
    Tags,
}

/// Walk the given directories and print one canonical record per audio file
/// either pipeline recognizes.
async fn scan(paths: &[String], tags_first: bool) -> Result<ScanSummary> {
    // First pass: collect all audio file paths
    let mut audio_files: Vec<PathBuf> = Vec::new();
    for path in paths {
        for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                audio_files.push(entry.into_path());
            }
        }
    }

    let pb = ProgressBar::new(audio_files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    pb.set_message("Scanning...");

    let mut summary = ScanSummary { scanned: 0, from_path: 0, from_tags: 0, unrecognized: 0 };
    for file in &audio_files {
        summary.scanned += 1;
        match infer(file, tags_first).await {
            Some((full, source)) => {
                match source {
                    Source::Path => summary.from_path += 1,
                    Source::Tags => summary.from_tags += 1,
                }
                pb.println(serde_json::to_string(&full)?);
            }
            None => {
                summary.unrecognized += 1;
                log::info!("No metadata for {}", file.display());
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    Ok(summary)
}

/// Run one file through the pipelines in the requested order and build its
/// canonical record.
async fn infer(file: &Path, tags_first: bool) -> Option<(FullMetadata, Source)> {
    let pathname = file.to_string_lossy();

    let mut picked = None;
    if tags_first {
        if let Some(md) = metadata::from_file(file).await {
            picked = Some((md, Source::Tags));
        }
    }
    if picked.is_none() {
        if let Some(md) = metadata::from_path(&pathname) {
            picked = Some((md, Source::Path));
        }
    }
    if picked.is_none() && !tags_first {
        if let Some(md) = metadata::from_file(file).await {
            picked = Some((md, Source::Tags));
        }
    }

    let (simple, source) = picked?;
    let full = metadata::full_from_attrs(&pathname, &simple.into())?;
    Some((full, source))
}

/// Print both pipelines' intermediate records and the canonical result.
async fn inspect(file: &Path) -> Result<()> {
    let pathname = file.to_string_lossy();
    let path_md = metadata::from_path(&pathname);
    let tag_md = metadata::from_file(file).await;

    match &path_md {
        Some(md) => println!("path pipeline: {}", serde_json::to_string_pretty(md)?),
        None => println!("path pipeline: no pattern matched"),
    }
    match &tag_md {
        Some(md) => println!("tag pipeline: {}", serde_json::to_string_pretty(md)?),
        None => println!("tag pipeline: missing required tags"),
    }

    if let Some(simple) = path_md.or(tag_md) {
        match metadata::full_from_attrs(&pathname, &simple.into()) {
            Some(full) => println!("canonical: {}", serde_json::to_string_pretty(&full)?),
            None => println!("canonical: incomplete record"),
        }
    }

    Ok(())
}
