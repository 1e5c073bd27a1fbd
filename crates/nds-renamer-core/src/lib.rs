/// nds-renamer core — header reading, catalog lookup, and the rename walk.
///
/// This crate contains all renaming logic with zero CLI dependencies.
/// The binary only parses arguments, loads the catalog and prints results.
///
/// # Modules
///
/// - [`header`] — Game code extraction from the NDS ROM header.
/// - [`catalog`] — Catalog entries, first-match lookup, DAT/JSON loading.
/// - [`naming`] — Canonical name to target file stem transformation.
/// - [`exclusion`] — Directory exclusion matching.
/// - [`renamer`] — Depth-first directory walk that performs the renames.
/// - [`report`] — JSON / CSV export of a finished run.
pub mod catalog;
pub mod error;
pub mod exclusion;
pub mod header;
pub mod naming;
pub mod renamer;
pub mod report;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{CatalogError, HeaderError, NameError, ReportError};
pub use exclusion::ExclusionSet;
pub use header::{read_game_code, read_header, GameCode, RomHeader};
pub use naming::{target_stem, validate_stem, NamingOptions};
pub use renamer::{run, CompanionOutcome, FileOutcome, FileRecord, RenameContext, RunSummary};
pub use report::write_report;
