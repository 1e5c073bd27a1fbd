//! nds-renamer — rename Nintendo DS ROMs to their No-Intro names.
//!
//! Thin binary entry point. All logic lives in the `nds-renamer-core` crate.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use nds_renamer_core::{renamer, write_report, Catalog, RenameContext, RunSummary};
use tracing::{debug, info, warn};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging. The default fmt writer is stdout.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    let catalog = Catalog::load(&cli.catalog)
        .with_context(|| format!("loading catalog {}", cli.catalog.display()))?;
    info!("Catalog loaded: {} entries", catalog.len());
    if catalog.is_empty() {
        warn!("Catalog has no entries with a serial; every ROM will be skipped");
    }
    let shared = catalog.shared_identifiers();
    if !shared.is_empty() {
        warn!(
            "{} serials appear on more than one catalog entry; the first entry is used for each",
            shared.len()
        );
        debug!("Shared serials: {}", shared.join(", "));
    }

    let ctx = RenameContext {
        catalog,
        naming: cli.naming(),
        exclusions: cli.exclusions(),
        dry_run: cli.dry_run,
    };

    let summary = renamer::run(&cli.directory, &ctx);
    log_summary(&summary);

    if let Some(report) = &cli.report {
        write_report(&summary, report)
            .with_context(|| format!("writing report {}", report.display()))?;
    }

    Ok(())
}

fn log_summary(summary: &RunSummary) {
    let verb = if summary.dry_run { "would rename" } else { "renamed" };
    info!(
        "Done in {:?}: {} ROMs found, {} {verb}, {} already named, {} skipped",
        summary.duration,
        summary.roms_found,
        summary.renamed,
        summary.already_named,
        summary.skipped(),
    );
    if summary.skipped() > 0 {
        info!(
            "Skipped: {} unreadable, {} not in catalog, {} invalid names, {} collisions, {} failed",
            summary.unreadable,
            summary.not_in_catalog,
            summary.invalid_name,
            summary.collisions,
            summary.rename_failed,
        );
    }
    if summary.missing_companions > 0 || summary.companion_errors > 0 {
        warn!(
            "Save files: {} missing, {} could not be renamed",
            summary.missing_companions, summary.companion_errors
        );
    }
    if summary.excluded_dirs > 0 || summary.unreadable_dirs > 0 {
        info!(
            "Directories: {} excluded, {} unreadable",
            summary.excluded_dirs, summary.unreadable_dirs
        );
    }
}
