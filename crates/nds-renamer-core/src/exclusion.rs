/// Directories the walker must not descend into.
///
/// A directory is excluded when its full path (as walked) or its base name
/// equals one of the configured entries exactly.
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: HashSet<PathBuf>,
    names: HashSet<OsString>,
}

impl ExclusionSet {
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut set = Self::default();
        for entry in entries {
            let entry: PathBuf = entry.into();
            // A bare name also matches as a base name anywhere in the tree.
            if entry.components().count() == 1 {
                if let Some(name) = entry.file_name() {
                    set.names.insert(name.to_os_string());
                }
            }
            set.paths.insert(entry);
        }
        set
    }

    pub fn is_excluded(&self, dir: &Path) -> bool {
        if self.paths.contains(dir) {
            return true;
        }
        dir.file_name()
            .map(|name| self.names.contains(name))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_base_name_at_any_depth() {
        let set = ExclusionSet::new(["backup"]);
        assert!(set.is_excluded(Path::new("roms/backup")));
        assert!(set.is_excluded(Path::new("/mnt/sd/roms/nested/backup")));
        assert!(!set.is_excluded(Path::new("roms/backups")));
        assert!(!set.is_excluded(Path::new("roms/Backup")));
    }

    #[test]
    fn matches_full_path() {
        let set = ExclusionSet::new([PathBuf::from("/mnt/sd/roms/old")]);
        assert!(set.is_excluded(Path::new("/mnt/sd/roms/old")));
        assert!(set.is_excluded(Path::new("/mnt/sd/roms/old/")));
        assert!(!set.is_excluded(Path::new("/mnt/sd/other/old")));
    }

    #[test]
    fn empty_set_excludes_nothing() {
        let set = ExclusionSet::default();
        assert!(set.is_empty());
        assert!(!set.is_excluded(Path::new("roms")));
    }

    #[test]
    fn name_or_path_entries_make_set_non_empty() {
        assert!(!ExclusionSet::new(["backup"]).is_empty());
        assert!(!ExclusionSet::new([PathBuf::from("/mnt/sd/old")]).is_empty());
    }
}
