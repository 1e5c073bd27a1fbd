/// Renamer — walks a directory tree and renames ROMs to their catalog names.
///
/// The walk is depth-first and single-threaded: `jwalk` runs with
/// `Parallelism::Serial`, so every rename happens on the caller's thread in
/// enumeration order. Excluded directories are pruned inside
/// `process_read_dir` before their children are ever read.
///
/// No per-file problem stops the walk. Each `.nds` file ends up as one
/// `FileRecord` in the returned `RunSummary`.
pub mod outcome;

pub use outcome::{CompanionOutcome, FileOutcome, FileRecord, RunSummary};

use crate::catalog::Catalog;
use crate::exclusion::ExclusionSet;
use crate::header::read_header;
use crate::naming::{target_stem, validate_stem, NamingOptions};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extension of the files the walker renames (matched case-insensitively).
pub const ROM_EXTENSION: &str = "nds";

/// Extension of the save file that follows a ROM.
pub const COMPANION_EXTENSION: &str = "sav";

/// Read-only configuration shared by the whole walk.
#[derive(Debug, Clone, Default)]
pub struct RenameContext {
    pub catalog: Catalog,
    pub naming: NamingOptions,
    pub exclusions: ExclusionSet,
    /// Decide every rename but leave the filesystem untouched.
    pub dry_run: bool,
}

/// Mutable state owned by a single walk.
struct Walk<'a> {
    ctx: &'a RenameContext,
    summary: RunSummary,
    /// Paths a dry run would have created.
    claimed: HashSet<PathBuf>,
    /// Paths a dry run would have moved away from.
    vacated: HashSet<PathBuf>,
}

/// Walk `root` and rename every recognised ROM below it.
pub fn run(root: &Path, ctx: &RenameContext) -> RunSummary {
    let start = Instant::now();
    let mut walk = Walk::new(root, ctx);

    info!(
        "Starting rename of {}{}",
        root.display(),
        if ctx.dry_run { " (dry run)" } else { "" }
    );

    if !root.is_dir() {
        warn!("Directory '{}' does not exist", root.display());
        walk.summary.root_missing = true;
    } else if ctx.exclusions.is_excluded(root) {
        info!("Skipping excluded directory {}", root.display());
        walk.summary.excluded_dirs += 1;
    } else {
        walk.walk_tree(root);
    }

    let mut summary = walk.summary;
    summary.finish(start.elapsed());
    debug!("Rename walk complete in {:?}", summary.duration);
    summary
}

impl<'a> Walk<'a> {
    fn new(root: &Path, ctx: &'a RenameContext) -> Self {
        Self {
            ctx,
            summary: RunSummary::new(root, ctx.dry_run),
            claimed: HashSet::new(),
            vacated: HashSet::new(),
        }
    }

    fn walk_tree(&mut self, root: &Path) {
        let exclusions = Arc::new(self.ctx.exclusions.clone());

        let walker = jwalk::WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(jwalk::Parallelism::Serial)
            .process_read_dir(move |_depth, _dir, _state, children| {
                // Clearing `read_children_path` keeps the directory entry
                // itself but stops jwalk from listing it.
                for child in children.iter_mut().flatten() {
                    if child.file_type().is_dir() && exclusions.is_excluded(&child.path()) {
                        child.read_children_path = None;
                    }
                }
            });

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    // An entry inside a listed directory could not be inspected.
                    self.summary.unreadable_dirs += 1;
                    let err_path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    warn!("Cannot read '{err_path}': {err}");
                    continue;
                }
            };

            let path = entry.path();

            // jwalk reports a failed listing on the directory's own entry.
            if let Some(err) = &entry.read_children_error {
                self.summary.unreadable_dirs += 1;
                warn!("Cannot read directory '{}': {err}", path.display());
                continue;
            }

            // The root itself was checked before the walk started.
            if entry.depth == 0 {
                continue;
            }

            let file_type = entry.file_type();

            if file_type.is_dir() {
                if self.ctx.exclusions.is_excluded(&path) {
                    info!("Skipping excluded directory {}", path.display());
                    self.summary.excluded_dirs += 1;
                }
                continue;
            }

            if file_type.is_file() && is_rom(&path) {
                let (identifier, outcome) = self.process_rom(&path);
                self.summary.record(path, identifier, outcome);
            }
        }
    }

    /// Resolve and rename a single ROM. Returns the game code (if it could be
    /// read) and what happened to the file.
    fn process_rom(&mut self, path: &Path) -> (Option<String>, FileOutcome) {
        info!("Processing {}", path.display());

        let header = match read_header(path) {
            Ok(header) => header,
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                return (
                    None,
                    FileOutcome::Unreadable {
                        reason: err.to_string(),
                    },
                );
            }
        };
        let identifier = header.game_code.as_str();

        debug!("    title  : {}", header.title);
        debug!("    serial : {identifier}");

        let Some(name) = self.ctx.catalog.lookup(identifier) else {
            warn!(
                "No catalog entry for serial {identifier}, leaving {} untouched",
                path.display()
            );
            return (Some(identifier.to_string()), FileOutcome::NotInCatalog);
        };

        let stem = target_stem(name, identifier, &self.ctx.naming);
        debug!("    name   : {stem}");
        if let Err(err) = validate_stem(&stem) {
            warn!("Skipping {}: {err}", path.display());
            return (
                Some(identifier.to_string()),
                FileOutcome::InvalidName {
                    name: stem,
                    reason: err.to_string(),
                },
            );
        }

        let outcome = self.rename_pair(path, &stem);
        (Some(identifier.to_string()), outcome)
    }

    /// Rename the ROM at `path` and its save file to `stem`.
    fn rename_pair(&mut self, path: &Path, stem: &str) -> FileOutcome {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let target = dir.join(format!("{stem}.{ROM_EXTENSION}"));
        let target_companion = dir.join(format!("{stem}.{COMPANION_EXTENSION}"));
        let current_companion = dir.join(companion_name(path));

        if is_same_file(path, &target) {
            info!("'{}' already good", path.display());
            return FileOutcome::AlreadyNamed;
        }

        if self.is_occupied(&target) {
            warn!(
                "Cannot rename {}: '{}' already exists",
                path.display(),
                target.display()
            );
            return FileOutcome::Collision { target };
        }

        if self.ctx.dry_run {
            info!(
                "Would rename {} -> {}",
                path.display(),
                target.display()
            );
            self.claimed.insert(target.clone());
            self.vacated.insert(path.to_path_buf());
        } else if let Err(err) = fs::rename(path, &target) {
            warn!(
                "Failed to rename {} -> {}: {err}",
                path.display(),
                target.display()
            );
            return FileOutcome::RenameFailed {
                target,
                reason: err.to_string(),
            };
        } else {
            info!("Renamed {} -> {}", path.display(), target.display());
        }

        let companion = self.rename_companion(path, current_companion, target_companion);
        FileOutcome::Renamed { target, companion }
    }

    /// Whether `path` holds a file at this point of the walk. A dry run also
    /// counts the renames it has only pretended to make.
    fn is_occupied(&self, path: &Path) -> bool {
        if self.ctx.dry_run {
            (exists(path) && !self.vacated.contains(path)) || self.claimed.contains(path)
        } else {
            exists(path)
        }
    }

    fn rename_companion(&mut self, rom: &Path, from: PathBuf, to: PathBuf) -> CompanionOutcome {
        if !self.is_occupied(&from) {
            warn!(
                "No '.{COMPANION_EXTENSION}' file for {}",
                rom.file_stem().unwrap_or_default().to_string_lossy()
            );
            return CompanionOutcome::Missing { expected: from };
        }

        if self.is_occupied(&to) && !is_same_file(&from, &to) {
            warn!(
                "Not renaming {}: '{}' already exists",
                from.display(),
                to.display()
            );
            return CompanionOutcome::Collision { target: to };
        }

        if self.ctx.dry_run {
            info!("Would rename {} -> {}", from.display(), to.display());
            self.claimed.insert(to.clone());
            self.vacated.insert(from.clone());
            return CompanionOutcome::Renamed { from, to };
        }

        match fs::rename(&from, &to) {
            Ok(()) => {
                info!("Renamed {} -> {}", from.display(), to.display());
                CompanionOutcome::Renamed { from, to }
            }
            Err(err) => {
                warn!(
                    "Failed to rename {} -> {}: {err}",
                    from.display(),
                    to.display()
                );
                CompanionOutcome::Failed {
                    from,
                    to,
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// `true` if the file name ends with `.nds`, ignoring case.
pub fn is_rom(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(ROM_EXTENSION))
        .unwrap_or(false)
}

/// Save file name for the ROM at `path`: its stem with the companion extension.
///
/// Built by appending rather than `with_extension` so stems that contain
/// dots (`Game v1.2`) survive intact.
fn companion_name(path: &Path) -> OsString {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(COMPANION_EXTENSION);
    name
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether `a` and `b` name the same file, e.g. differing only in case on a
/// case-insensitive filesystem.
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(meta_a), Ok(meta_b)) => same_identity(a, &meta_a, b, &meta_b),
        _ => false,
    }
}

#[cfg(unix)]
fn same_identity(_a: &Path, meta_a: &fs::Metadata, _b: &Path, meta_b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino()
}

#[cfg(not(unix))]
fn same_identity(a: &Path, _meta_a: &fs::Metadata, b: &Path, _meta_b: &fs::Metadata) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}
