/// End-to-end renamer integration tests.
///
/// These tests run the real `renamer::run` walk against a temporary
/// directory tree with `tempfile`, checking the resulting file names on disk
/// as well as the counters in the returned `RunSummary`.
use nds_renamer_core::renamer::{run, FileOutcome, RenameContext, RunSummary};
use nds_renamer_core::{Catalog, CatalogEntry, ExclusionSet, NamingOptions};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Write a minimal ROM carrying `code` at header offset 0x0C.
fn write_rom(path: &Path, code: &str) {
    let mut data = vec![0u8; 0x200];
    data[..8].copy_from_slice(b"TESTGAME");
    data[0x0C..0x10].copy_from_slice(code.as_bytes());
    fs::write(path, data).unwrap();
}

fn catalog() -> Catalog {
    Catalog::from_entries(vec![
        CatalogEntry::new("Super Game (USA) (Rev 1)", "ABCD"),
        CatalogEntry::new("Puzzle Quest (Europe) (En,Fr,De)", "PZQP"),
        CatalogEntry::new("Racer (USA)", "RACE"),
        CatalogEntry::new("Racer (Japan)", "RACJ"),
        CatalogEntry::new("Other Racer (USA)", "OTHR"),
    ])
}

fn context(naming: NamingOptions) -> RenameContext {
    RenameContext {
        catalog: catalog(),
        naming,
        ..Default::default()
    }
}

/// Every file name (relative, `/`-separated) below `root`, sorted.
fn snapshot(root: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                names.insert(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    names
}

/// Build a reproducible tree:
///
/// ```text
/// root/
///   0001.nds        (ABCD) + 0001.sav
///   sub/
///     dump.NDS      (PZQP), no save
///   unknown.nds     (ZZZZ)
///   notes.txt
/// ```
fn build_test_tree(root: &Path) {
    write_rom(&root.join("0001.nds"), "ABCD");
    fs::write(root.join("0001.sav"), b"save-data").unwrap();
    fs::create_dir_all(root.join("sub")).unwrap();
    write_rom(&root.join("sub").join("dump.NDS"), "PZQP");
    write_rom(&root.join("unknown.nds"), "ZZZZ");
    fs::write(root.join("notes.txt"), b"hello").unwrap();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// With no options, files take exactly the canonical name.
#[test]
fn renames_to_canonical_names() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let summary = run(tmp.path(), &context(NamingOptions::default()));

    assert_eq!(summary.roms_found, 3);
    assert_eq!(summary.renamed, 2);
    assert_eq!(summary.not_in_catalog, 1);
    assert_eq!(summary.missing_companions, 1);

    let files = snapshot(tmp.path());
    let expected: BTreeSet<String> = [
        "Super Game (USA) (Rev 1).nds",
        "Super Game (USA) (Rev 1).sav",
        "sub/Puzzle Quest (Europe) (En,Fr,De).nds",
        "unknown.nds",
        "notes.txt",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(files, expected);
}

/// Save contents follow their ROM.
#[test]
fn save_file_keeps_its_contents() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    run(tmp.path(), &context(NamingOptions::default()));

    let save = fs::read(tmp.path().join("Super Game (USA) (Rev 1).sav")).unwrap();
    assert_eq!(save, b"save-data");
}

/// A second run with the same options changes nothing.
#[test]
fn second_run_is_a_no_op() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    let ctx = context(NamingOptions {
        clean_name: true,
        add_serial: true,
    });

    run(tmp.path(), &ctx);
    let after_first = snapshot(tmp.path());

    let second = run(tmp.path(), &ctx);
    assert_eq!(snapshot(tmp.path()), after_first);
    assert_eq!(second.renamed, 0);
    assert_eq!(second.already_named, 2);
    assert_eq!(second.not_in_catalog, 1);
}

/// Clean + serial produce `Name (CODE)`.
#[test]
fn clean_name_and_serial_compose() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    run(
        tmp.path(),
        &context(NamingOptions {
            clean_name: true,
            add_serial: true,
        }),
    );

    let files = snapshot(tmp.path());
    assert!(files.contains("Super Game (ABCD).nds"));
    assert!(files.contains("Super Game (ABCD).sav"));
    assert!(files.contains("sub/Puzzle Quest (PZQP).nds"));
}

/// Two ROMs resolving to the same name: one wins, the other is untouched.
#[test]
fn collision_leaves_second_file_untouched() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_rom(&tmp.path().join("a.nds"), "RACE");
    write_rom(&tmp.path().join("b.nds"), "RACJ");
    fs::write(tmp.path().join("a.sav"), b"a").unwrap();
    fs::write(tmp.path().join("b.sav"), b"b").unwrap();

    let summary = run(
        tmp.path(),
        &context(NamingOptions {
            clean_name: true,
            add_serial: false,
        }),
    );

    assert_eq!(summary.renamed, 1);
    assert_eq!(summary.collisions, 1);

    let files = snapshot(tmp.path());
    assert!(files.contains("Racer.nds"));
    assert!(files.contains("Racer.sav"));
    // Exactly one of the originals (with its save) remains.
    let leftovers: Vec<_> = ["a", "b"]
        .into_iter()
        .filter(|stem| files.contains(&format!("{stem}.nds")))
        .collect();
    assert_eq!(leftovers.len(), 1);
    assert!(files.contains(&format!("{}.sav", leftovers[0])));

    let collided = summary
        .records
        .iter()
        .find(|r| matches!(r.outcome, FileOutcome::Collision { .. }))
        .unwrap();
    assert_eq!(
        collided.outcome.target(),
        Some(tmp.path().join("Racer.nds").as_path())
    );
}

/// Excluded directories are never entered.
#[test]
fn excluded_directory_is_not_descended() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let backup = tmp.path().join("backup");
    fs::create_dir_all(backup.join("deeper")).unwrap();
    write_rom(&backup.join("0001.nds"), "ABCD");
    write_rom(&backup.join("deeper").join("0002.nds"), "PZQP");
    write_rom(&tmp.path().join("0003.nds"), "RACE");

    let mut ctx = context(NamingOptions::default());
    ctx.exclusions = ExclusionSet::new(["backup"]);
    let summary = run(tmp.path(), &ctx);

    assert_eq!(summary.roms_found, 1);
    assert_eq!(summary.excluded_dirs, 1);
    assert!(backup.join("0001.nds").exists());
    assert!(backup.join("deeper").join("0002.nds").exists());
    assert!(tmp.path().join("Racer (USA).nds").exists());
}

/// A full-path exclusion only matches that one directory.
#[test]
fn excluded_full_path_matches_only_that_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let keep = tmp.path().join("a").join("old");
    let skip = tmp.path().join("b").join("old");
    fs::create_dir_all(&keep).unwrap();
    fs::create_dir_all(&skip).unwrap();
    write_rom(&keep.join("0001.nds"), "ABCD");
    write_rom(&skip.join("0002.nds"), "PZQP");

    let mut ctx = context(NamingOptions::default());
    ctx.exclusions = ExclusionSet::new([skip.clone()]);
    run(tmp.path(), &ctx);

    assert!(keep.join("Super Game (USA) (Rev 1).nds").exists());
    assert!(skip.join("0002.nds").exists());
}

/// Short files are skipped with a warning; the walk carries on.
#[test]
fn short_file_does_not_abort_walk() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    fs::write(tmp.path().join("broken.nds"), [0u8; 10]).unwrap();
    write_rom(&tmp.path().join("0001.nds"), "ABCD");

    let summary = run(tmp.path(), &context(NamingOptions::default()));

    assert_eq!(summary.unreadable, 1);
    assert_eq!(summary.renamed, 1);
    assert!(tmp.path().join("broken.nds").exists());
    assert!(tmp.path().join("Super Game (USA) (Rev 1).nds").exists());
}

/// Dry run reports renames without touching the tree.
#[test]
fn dry_run_changes_nothing() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    write_rom(&tmp.path().join("a.nds"), "RACE");
    write_rom(&tmp.path().join("b.nds"), "RACJ");
    let before = snapshot(tmp.path());

    let mut ctx = context(NamingOptions {
        clean_name: true,
        add_serial: false,
    });
    ctx.dry_run = true;
    let summary = run(tmp.path(), &ctx);

    assert_eq!(snapshot(tmp.path()), before);
    assert!(summary.dry_run);
    // ABCD, PZQP and one Racer would be renamed; the second Racer collides.
    assert_eq!(summary.renamed, 3);
    assert_eq!(summary.collisions, 1);
    assert_eq!(summary.not_in_catalog, 1);
}

/// Outcome labels keyed by original path, for comparing two runs.
fn outcomes(summary: &RunSummary) -> BTreeMap<String, &'static str> {
    summary
        .records
        .iter()
        .map(|r| (r.path.display().to_string(), r.outcome.label()))
        .collect()
}

/// A dry run predicts a real run, including names freed earlier in the walk.
#[test]
fn dry_run_matches_real_run() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    // "Racer (USA).nds" really holds OTHR and must move away before a.nds
    // (RACE) can take its name. Which happens first depends on enumeration
    // order; the dry run has to agree with the real run either way.
    write_rom(&tmp.path().join("Racer (USA).nds"), "OTHR");
    fs::write(tmp.path().join("Racer (USA).sav"), b"other").unwrap();
    write_rom(&tmp.path().join("a.nds"), "RACE");
    fs::write(tmp.path().join("a.sav"), b"racer").unwrap();
    write_rom(&tmp.path().join("b.nds"), "RACE");
    write_rom(&tmp.path().join("0001.nds"), "ABCD");

    let mut ctx = context(NamingOptions::default());
    ctx.dry_run = true;
    let dry = run(tmp.path(), &ctx);

    ctx.dry_run = false;
    let real = run(tmp.path(), &ctx);

    assert_eq!(outcomes(&dry), outcomes(&real));
    assert_eq!(dry.renamed, real.renamed);
    assert_eq!(dry.collisions, real.collisions);
    assert_eq!(dry.already_named, real.already_named);
    assert_eq!(dry.missing_companions, real.missing_companions);
    assert_eq!(dry.companion_errors, real.companion_errors);
    // a.nds and b.nds compete for one name, so at least one collides.
    assert!(real.collisions >= 1);
}

/// A directory that cannot be listed is counted; its siblings still run.
#[cfg(unix)]
#[test]
fn unreadable_directory_is_counted() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("failed to create temp dir");
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_rom(&locked.join("0002.nds"), "PZQP");
    write_rom(&tmp.path().join("0001.nds"), "ABCD");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Running as root: permission bits are not enforced.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let summary = run(tmp.path(), &context(NamingOptions::default()));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(summary.unreadable_dirs, 1);
    assert_eq!(summary.renamed, 1);
    assert!(tmp.path().join("Super Game (USA) (Rev 1).nds").exists());
    assert!(locked.join("0002.nds").exists());
}

/// A missing root is reported, not fatal.
#[test]
fn missing_root_returns_empty_summary() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let summary = run(&tmp.path().join("does-not-exist"), &context(NamingOptions::default()));

    assert!(summary.root_missing);
    assert!(summary.records.is_empty());
}
