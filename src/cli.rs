/// Command-line surface.
///
/// Flags map one-to-one onto the core `RenameContext`; nothing here touches
/// the filesystem.
use clap::Parser;
use nds_renamer_core::{ExclusionSet, NamingOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "nds-renamer",
    version,
    about = "Recursively rename .nds ROMs (and their .sav files) to their catalog names"
)]
pub struct Cli {
    /// Directory to scan.
    #[arg(long, short = 'd')]
    pub directory: PathBuf,

    /// Catalog of release names: a No-Intro DAT (.dat/.xml) or a JSON list.
    /// Download the DAT from https://datomatic.no-intro.org (Nintendo - Nintendo DS).
    #[arg(long, short = 'c', visible_alias = "xml-file", alias = "xml_file")]
    pub catalog: PathBuf,

    /// Directory name or path to skip. May be repeated.
    #[arg(long = "exclude", short = 'x', value_name = "NAME|PATH")]
    pub excludes: Vec<PathBuf>,

    /// Strip region and revision information, i.e. everything from the first '('.
    #[arg(long, alias = "clean_name")]
    pub clean_name: bool,

    /// Append the internal serial to the file name, e.g. "Game (AMCE)".
    #[arg(long, alias = "add_serial")]
    pub add_serial: bool,

    /// Show what would be renamed without touching any file.
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Write a per-file report when done (.json or .csv).
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Log header titles, serials and derived names.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn naming(&self) -> NamingOptions {
        NamingOptions {
            clean_name: self.clean_name,
            add_serial: self.add_serial,
        }
    }

    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::new(self.excludes.iter().cloned())
    }
}
