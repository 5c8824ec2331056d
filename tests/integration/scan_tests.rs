use clap::Parser;
use romdupe::cli::Cli;
use romdupe::config::Config;
use romdupe::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use romdupe::error::ExitCode;
use romdupe::scanner::ScanError;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"rom data").unwrap();
}

fn rom_dir(names: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for name in names {
        touch(dir.path(), name);
    }
    dir
}

fn run(args: &[&str], config_dir: &TempDir) -> anyhow::Result<ExitCode> {
    let config_path = config_dir.path().join("config.toml");
    if !config_path.exists() {
        Config::write_default(&config_path).unwrap();
    }
    let config_arg = config_path.to_string_lossy().into_owned();
    let mut argv = vec!["romdupe", "-q", "--config", config_arg.as_str()];
    argv.extend_from_slice(args);
    let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    romdupe::run_app(Cli::try_parse_from(argv).unwrap())
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_regional_variants() {
    let dir = rom_dir(&[
        "Super Game (USA).rom",
        "Super Game (Europe) (Rev 1).rom",
        "Super Game (Japan) [!].rom",
        "Other Game (USA).rom",
    ]);

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups.get("super game").unwrap().files,
        vec![
            "Super Game (Europe) (Rev 1).rom",
            "Super Game (Japan) [!].rom",
            "Super Game (USA).rom",
        ]
    );
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.redundant_files, 2);
}

#[test]
fn test_scan_excludes_multi_part_sets() {
    let dir = rom_dir(&[
        "Epic Quest (Disc 1).rom",
        "Epic Quest (Disc 2).rom",
        "Mission Pack (Disc 2).rom",
        "Mission Pack (USA).rom",
    ]);

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.grouping.multi_part_skipped, 3);
    for group in &groups {
        assert!(!group.files.iter().any(|f| f.contains("Disc")));
    }
}

#[test]
fn test_scan_sequels_stay_apart() {
    let dir = rom_dir(&[
        "R-Type II.rom",
        "R-Type III.rom",
        "Long Title - Subtitle II (USA).rom",
        "Long Title - Subtitle (Europe).rom",
    ]);

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.base_names().collect::<Vec<_>>(), vec!["long title - subtitle"]);
    assert!(groups.get("r-type ii").is_none());
}

#[test]
fn test_scan_ignores_subdirectories() {
    let dir = rom_dir(&["Game (USA).rom"]);
    let sub = dir.path().join("Game (Europe).rom");
    fs::create_dir(&sub).unwrap();
    touch(&sub, "Game (Japan).rom");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_skip_hidden() {
    let dir = rom_dir(&["Game (USA).rom", ".Game (Europe).rom", "Game (Japan).rom"]);

    let finder = DuplicateFinder::new(FinderConfig::default().with_skip_hidden(true));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.get("game").unwrap().len(), 2);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_scan_missing_directory_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let result = DuplicateFinder::with_defaults().find_duplicates(&missing);
    assert!(matches!(result, Err(FinderError::Scan(ScanError::NotFound(_)))));
}

#[test]
fn test_scan_file_instead_of_directory() {
    let dir = rom_dir(&["Game.rom"]);
    let result = DuplicateFinder::with_defaults().find_duplicates(&dir.path().join("Game.rom"));
    assert!(matches!(
        result,
        Err(FinderError::Scan(ScanError::NotADirectory(_)))
    ));
}

#[test]
fn test_rescan_reflects_changes() {
    let dir = rom_dir(&["A (USA).rom", "A (Europe).rom"]);
    let finder = DuplicateFinder::with_defaults();

    let first = finder.scan_directory(dir.path()).unwrap();
    assert_eq!(first.groups.len(), 1);

    fs::remove_file(dir.path().join("A (USA).rom")).unwrap();
    let second = finder.scan_directory(dir.path()).unwrap();
    assert!(second.is_empty());
    assert_eq!(first.groups.len(), 1);
}

#[test]
fn test_run_app_scan_exit_codes() {
    let config_dir = tempdir().unwrap();

    let dups = rom_dir(&["A (USA).rom", "A (Europe).rom"]);
    let dups_arg = dups.path().to_string_lossy().into_owned();
    assert_eq!(run(&["scan", &dups_arg], &config_dir).unwrap(), ExitCode::Success);

    let unique = rom_dir(&["A.rom", "B.rom"]);
    let unique_arg = unique.path().to_string_lossy().into_owned();
    assert_eq!(
        run(&["scan", &unique_arg, "-o", "json"], &config_dir).unwrap(),
        ExitCode::NoDuplicates
    );
}

#[test]
fn test_run_app_scan_missing_directory() {
    let config_dir = tempdir().unwrap();
    let missing = config_dir.path().join("no-roms-here");
    let missing_arg = missing.to_string_lossy().into_owned();

    let err = run(&["scan", &missing_arg], &config_dir).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{:#}", err).contains("Path not found"));
}

#[test]
fn test_run_app_scan_with_images_csv() {
    let config_dir = tempdir().unwrap();
    let roms = rom_dir(&["A (USA).rom", "A (Europe).rom"]);
    let images = rom_dir(&["A (USA).png"]);
    let roms_arg = roms.path().to_string_lossy().into_owned();
    let images_arg = images.path().to_string_lossy().into_owned();

    let code = run(
        &["scan", &roms_arg, "--images", &images_arg, "-o", "csv"],
        &config_dir,
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(roms.path().join("A (USA).rom").exists());
}
