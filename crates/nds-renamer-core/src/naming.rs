/// Target file name derivation.
///
/// Turns a catalog name into the stem (name without extension) a ROM should
/// carry, according to the user's naming options.
use crate::error::NameError;

/// Independent switches applied to a canonical name, clean first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingOptions {
    /// Drop everything from the first `(` on, e.g. region and revision tags.
    pub clean_name: bool,
    /// Append the game code as ` (CODE)`.
    pub add_serial: bool,
}

/// Derive the target file stem for `name`.
///
/// ```
/// use nds_renamer_core::{target_stem, NamingOptions};
///
/// let options = NamingOptions { clean_name: true, add_serial: true };
/// assert_eq!(target_stem("Super Game (USA)", "ABCD", &options), "Super Game (ABCD)");
/// ```
pub fn target_stem(name: &str, identifier: &str, options: &NamingOptions) -> String {
    let mut stem = if options.clean_name {
        match name.split_once('(') {
            Some((head, _)) => head.trim().to_string(),
            None => name.to_string(),
        }
    } else {
        name.to_string()
    };

    if options.add_serial {
        stem = format!("{stem} ({identifier})");
    }
    stem
}

/// Reject stems that are not a plain file name in the ROM's own directory.
pub fn validate_stem(stem: &str) -> Result<(), NameError> {
    if stem.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if stem == "." || stem == ".." {
        return Err(NameError::Relative(stem.to_string()));
    }
    if stem.contains(['/', '\\', '\0']) {
        return Err(NameError::Separator(stem.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: NamingOptions = NamingOptions {
        clean_name: false,
        add_serial: false,
    };
    const CLEAN: NamingOptions = NamingOptions {
        clean_name: true,
        add_serial: false,
    };
    const SERIAL: NamingOptions = NamingOptions {
        clean_name: false,
        add_serial: true,
    };
    const BOTH: NamingOptions = NamingOptions {
        clean_name: true,
        add_serial: true,
    };

    #[test]
    fn no_options_keeps_canonical_name() {
        assert_eq!(
            target_stem("Super Game (USA) (Rev 1)", "ABCD", &PLAIN),
            "Super Game (USA) (Rev 1)"
        );
    }

    #[test]
    fn clean_name_cuts_at_first_parenthesis() {
        assert_eq!(
            target_stem("Super Game (USA) (Rev 1)", "ABCD", &CLEAN),
            "Super Game"
        );
    }

    #[test]
    fn clean_name_without_parenthesis_is_unchanged() {
        assert_eq!(target_stem("Super Game", "ABCD", &CLEAN), "Super Game");
    }

    #[test]
    fn clean_name_trims_both_ends() {
        assert_eq!(target_stem("  Super Game  (USA)", "ABCD", &CLEAN), "Super Game");
    }

    #[test]
    fn add_serial_appends_code() {
        assert_eq!(target_stem("Super Game", "ABCD", &SERIAL), "Super Game (ABCD)");
    }

    #[test]
    fn clean_then_append() {
        assert_eq!(
            target_stem("Super Game (USA)", "ABCD", &BOTH),
            "Super Game (ABCD)"
        );
    }

    #[test]
    fn validation_rejects_unsafe_stems() {
        assert_eq!(validate_stem(""), Err(NameError::Empty));
        assert_eq!(validate_stem("   "), Err(NameError::Empty));
        assert!(matches!(validate_stem(".."), Err(NameError::Relative(_))));
        assert!(matches!(
            validate_stem("Game/Part 2"),
            Err(NameError::Separator(_))
        ));
        assert!(matches!(
            validate_stem("Game\\Part 2"),
            Err(NameError::Separator(_))
        ));
        assert_eq!(validate_stem("Super Game (ABCD)"), Ok(()));
    }
}
