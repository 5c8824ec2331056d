use clap::Parser;
use romdupe::actions::delete::{delete_batch, DeleteConfig, DeleteProgressCallback, DeleteResult};
use romdupe::actions::BatchDeleteResult;
use romdupe::cli::Cli;
use romdupe::config::Config;
use romdupe::duplicates::{DuplicateFinder, KeepSelection};
use romdupe::error::ExitCode;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

struct Collection {
    roms: TempDir,
    images: TempDir,
    config: TempDir,
}

impl Collection {
    fn new(roms: &[&str], images: &[&str]) -> Self {
        let collection = Self {
            roms: tempdir().unwrap(),
            images: tempdir().unwrap(),
            config: tempdir().unwrap(),
        };
        for name in roms {
            fs::write(collection.roms.path().join(name), b"rom").unwrap();
        }
        for name in images {
            fs::write(collection.images.path().join(name), b"img").unwrap();
        }
        Config::write_default(&collection.config_path()).unwrap();
        collection
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.config.path().join("config.toml")
    }

    fn clean(&self, extra: &[&str]) -> anyhow::Result<ExitCode> {
        let config = self.config_path().to_string_lossy().into_owned();
        let roms = self.roms.path().to_string_lossy().into_owned();
        let images = self.images.path().to_string_lossy().into_owned();
        let mut argv = vec![
            "romdupe",
            "-q",
            "--config",
            config.as_str(),
            "clean",
            roms.as_str(),
            "--images",
            images.as_str(),
        ];
        argv.extend_from_slice(extra);
        let _guard = crate::ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        romdupe::run_app(Cli::try_parse_from(argv).unwrap())
    }

    fn rom_names(&self) -> Vec<String> {
        list(self.roms.path())
    }

    fn image_names(&self) -> Vec<String> {
        list(self.images.path())
    }
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn sample() -> Collection {
    Collection::new(
        &[
            "Game (USA).rom",
            "Game (Europe).rom",
            "Game (Japan).rom",
            "Saga (Disc 1).rom",
            "Saga (Disc 2).rom",
            "Other.rom",
        ],
        &["Game (USA).png", "Game (Japan).jpg", "Game (Europe).png", "Other.png"],
    )
}

#[test]
fn test_clean_keeps_first_of_each_group() {
    let collection = sample();

    let code = collection.clean(&["-y"]).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(
        collection.rom_names(),
        vec![
            "Game (Europe).rom",
            "Other.rom",
            "Saga (Disc 1).rom",
            "Saga (Disc 2).rom",
        ]
    );
    assert_eq!(collection.image_names(), vec!["Game (Europe).png", "Other.png"]);
}

#[test]
fn test_clean_with_keep_override() {
    let collection = sample();

    let code = collection
        .clean(&["-y", "--keep", "Game (Japan).rom", "-o", "json"])
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(collection.rom_names().contains(&"Game (Japan).rom".to_string()));
    assert!(!collection.rom_names().contains(&"Game (USA).rom".to_string()));
    assert_eq!(collection.image_names(), vec!["Game (Japan).jpg", "Other.png"]);
}

#[test]
fn test_clean_unknown_keep_is_error() {
    let collection = sample();

    let err = collection
        .clean(&["-y", "--keep", "Missing (USA).rom"])
        .unwrap_err();

    assert!(format!("{:#}", err).contains("not part of any duplicate group"));
    assert_eq!(collection.rom_names().len(), 6);
}

#[test]
fn test_clean_without_duplicates() {
    let collection = Collection::new(&["Alpha.rom", "Beta.rom"], &["Alpha.png"]);

    let code = collection.clean(&["-y"]).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(collection.rom_names(), vec!["Alpha.rom", "Beta.rom"]);
    assert_eq!(collection.image_names(), vec!["Alpha.png"]);
}

#[test]
fn test_clean_removes_decomposed_names() {
    let collection = Collection::new(
        &["Poke\u{301}mon (USA).gb", "Poke\u{301}mon (Europe).gb"],
        &["Poke\u{301}mon (USA).png"],
    );

    let code = collection.clean(&["-y"]).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(collection.rom_names(), vec!["Poke\u{301}mon (Europe).gb"]);
    assert!(collection.image_names().is_empty());
}

#[test]
fn test_clean_keep_matches_composed_spelling() {
    let collection = Collection::new(
        &["Poke\u{301}mon (USA).gb", "Poke\u{301}mon (Europe).gb"],
        &[],
    );

    let code = collection
        .clean(&["-y", "--keep", "Pok\u{e9}mon (USA).gb"])
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(collection.rom_names(), vec!["Poke\u{301}mon (USA).gb"]);
}

#[test]
fn test_listed_names_exist_on_disk() {
    let collection = Collection::new(
        &["Poke\u{301}mon (USA).gb", "Pok\u{e9}mon (Japan).gb"],
        &[],
    );

    let outcome = DuplicateFinder::with_defaults()
        .scan_directory(collection.roms.path())
        .unwrap();
    let group = outcome.groups.get("pok\u{e9}mon").unwrap();
    assert_eq!(group.len(), 2);
    for name in &group.files {
        assert!(collection.roms.path().join(name).exists(), "{} missing", name);
    }
}

#[test]
fn test_clean_then_scan_finds_nothing() {
    let collection = sample();
    collection.clean(&["-y", "-o", "csv"]).unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .scan_directory(collection.roms.path())
        .unwrap();
    assert!(outcome.is_empty());
}

#[derive(Default)]
struct Events(Mutex<Vec<String>>);

impl DeleteProgressCallback for Events {
    fn on_before_delete(&self, filename: &str, _index: usize, _total: usize) {
        self.0.lock().unwrap().push(format!("before {}", filename));
    }

    fn on_delete_success(&self, filename: &str, _result: &DeleteResult) {
        self.0.lock().unwrap().push(format!("ok {}", filename));
    }

    fn on_delete_failure(&self, filename: &str, _error: &str) {
        self.0.lock().unwrap().push(format!("fail {}", filename));
    }

    fn on_complete(&self, _result: &BatchDeleteResult) {
        self.0.lock().unwrap().push("done".to_string());
    }
}

#[test]
fn test_deletion_plan_continues_past_failures() {
    let collection = sample();
    let outcome = DuplicateFinder::with_defaults()
        .scan_directory(collection.roms.path())
        .unwrap();
    let selection = KeepSelection::with_defaults(&outcome.groups);
    let mut plan = selection.files_to_delete();
    plan.insert(0, "Vanished (USA).rom".to_string());

    let events = Events::default();
    let result = delete_batch(
        collection.roms.path(),
        Some(collection.images.path()),
        &plan,
        &DeleteConfig::default(),
        Some(&events),
    );

    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.success_count(), 2);
    assert_eq!(result.images_deleted(), 2);
    assert!(!result.all_succeeded());
    assert_eq!(
        *events.0.lock().unwrap(),
        vec![
            "before Vanished (USA).rom",
            "fail Vanished (USA).rom",
            "before Game (Japan).rom",
            "ok Game (Japan).rom",
            "before Game (USA).rom",
            "ok Game (USA).rom",
            "done",
        ]
    );
}

#[test]
fn test_deletion_stops_on_shutdown() {
    let collection = sample();
    let flag = Arc::new(AtomicBool::new(false));
    flag.store(true, Ordering::SeqCst);

    let plan = vec!["Game (USA).rom".to_string()];
    let result = delete_batch::<Events>(
        collection.roms.path(),
        None,
        &plan,
        &DeleteConfig::default().with_shutdown_flag(flag),
        None,
    );

    assert!(result.interrupted);
    assert_eq!(result.success_count(), 0);
    assert!(collection.roms.path().join("Game (USA).rom").exists());
}
