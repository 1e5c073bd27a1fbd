/// Per-file results and the run summary.
///
/// Every `.nds` file the walker meets produces exactly one `FileRecord`.
/// Nothing here is an error type: skips are ordinary outcomes, counted and
/// kept so the caller can print or export them once the walk finishes.
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to the save file paired with a renamed ROM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompanionOutcome {
    /// The save file was renamed alongside the ROM.
    Renamed { from: PathBuf, to: PathBuf },
    /// No save file sits next to the ROM.
    Missing { expected: PathBuf },
    /// A different file already holds the target save name; nothing moved.
    Collision { target: PathBuf },
    /// The save rename failed after the ROM was renamed.
    Failed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },
}

impl CompanionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Renamed { .. } => "renamed",
            Self::Missing { .. } => "missing",
            Self::Collision { .. } => "collision",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Result of processing one ROM file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Renamed to `target` (or would be, in a dry run).
    Renamed {
        target: PathBuf,
        companion: CompanionOutcome,
    },
    /// The file already carries its catalog name.
    AlreadyNamed,
    /// The header could not be read or decoded.
    Unreadable { reason: String },
    /// The game code is not in the catalog.
    NotInCatalog,
    /// The catalog name does not produce a usable file name.
    InvalidName { name: String, reason: String },
    /// Another file already has the target name.
    Collision { target: PathBuf },
    /// The ROM rename itself failed.
    RenameFailed { target: PathBuf, reason: String },
}

impl FileOutcome {
    /// Short machine-friendly label, used in CSV reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Renamed { .. } => "renamed",
            Self::AlreadyNamed => "already_named",
            Self::Unreadable { .. } => "unreadable",
            Self::NotInCatalog => "not_in_catalog",
            Self::InvalidName { .. } => "invalid_name",
            Self::Collision { .. } => "collision",
            Self::RenameFailed { .. } => "rename_failed",
        }
    }

    /// The path the file was (or would have been) renamed to, if one was derived.
    pub fn target(&self) -> Option<&Path> {
        match self {
            Self::Renamed { target, .. }
            | Self::Collision { target }
            | Self::RenameFailed { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn companion(&self) -> Option<&CompanionOutcome> {
        match self {
            Self::Renamed { companion, .. } => Some(companion),
            _ => None,
        }
    }
}

/// One processed ROM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path of the ROM when it was found.
    pub path: PathBuf,
    /// Game code, when the header could be read.
    pub identifier: Option<String>,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Totals and per-file records for one walk.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    #[serde(skip)]
    pub duration: Duration,

    /// The root did not exist or was not a directory.
    pub root_missing: bool,

    pub roms_found: u64,
    pub renamed: u64,
    pub already_named: u64,
    pub unreadable: u64,
    pub not_in_catalog: u64,
    pub invalid_name: u64,
    pub collisions: u64,
    pub rename_failed: u64,

    /// Renamed ROMs with no save file next to them.
    pub missing_companions: u64,
    /// Renamed ROMs whose save file could not follow (collision or failure).
    pub companion_errors: u64,

    /// Directories skipped through the exclusion set (root included).
    pub excluded_dirs: u64,
    /// Directories that could not be listed.
    pub unreadable_dirs: u64,

    pub records: Vec<FileRecord>,
}

impl RunSummary {
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
            started_at: Local::now(),
            finished_at: None,
            duration: Duration::ZERO,
            root_missing: false,
            roms_found: 0,
            renamed: 0,
            already_named: 0,
            unreadable: 0,
            not_in_catalog: 0,
            invalid_name: 0,
            collisions: 0,
            rename_failed: 0,
            missing_companions: 0,
            companion_errors: 0,
            excluded_dirs: 0,
            unreadable_dirs: 0,
            records: Vec::new(),
        }
    }

    /// Count `outcome` and keep its record.
    pub fn record(&mut self, path: PathBuf, identifier: Option<String>, outcome: FileOutcome) {
        self.roms_found += 1;
        match &outcome {
            FileOutcome::Renamed { companion, .. } => {
                self.renamed += 1;
                match companion {
                    CompanionOutcome::Renamed { .. } => {}
                    CompanionOutcome::Missing { .. } => self.missing_companions += 1,
                    CompanionOutcome::Collision { .. } | CompanionOutcome::Failed { .. } => {
                        self.companion_errors += 1
                    }
                }
            }
            FileOutcome::AlreadyNamed => self.already_named += 1,
            FileOutcome::Unreadable { .. } => self.unreadable += 1,
            FileOutcome::NotInCatalog => self.not_in_catalog += 1,
            FileOutcome::InvalidName { .. } => self.invalid_name += 1,
            FileOutcome::Collision { .. } => self.collisions += 1,
            FileOutcome::RenameFailed { .. } => self.rename_failed += 1,
        }
        self.records.push(FileRecord {
            path,
            identifier,
            outcome,
        });
    }

    /// Files that were left untouched for any reason other than already
    /// carrying the right name.
    pub fn skipped(&self) -> u64 {
        self.unreadable + self.not_in_catalog + self.invalid_name + self.collisions + self.rename_failed
    }

    pub(crate) fn finish(&mut self, duration: Duration) {
        self.finished_at = Some(Local::now());
        self.duration = duration;
    }
}
