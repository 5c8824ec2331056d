//! romdupe - ROM duplicate finder
//!
//! Groups the files of a ROM directory by a normalized title so that
//! regional and revision variants of one game land in the same group, while
//! multi-disc and multi-part sets are left alone. The binary reports the
//! groups and can delete every non-kept variant together with its preview
//! images.
//!
//! ```
//! use romdupe::classifier::Classifier;
//! use romdupe::duplicates::group_by_base_name;
//!
//! let (groups, _) = group_by_base_name(
//!     ["A (USA).rom", "A (Europe).rom", "B.rom"],
//!     &Classifier::default(),
//! );
//! assert_eq!(groups.get("a").unwrap().files, ["A (Europe).rom", "A (USA).rom"]);
//! ```

pub mod actions;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;

use crate::actions::delete::{delete_batch, validate_preserves_copy, DeleteConfig};
use crate::actions::BatchDeleteResult;
use crate::cli::{CleanArgs, Cli, Commands, ConfigCommand, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, KeepSelection, ScanOutcome};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, Report, TextOutput};
use crate::progress::Progress;
use crate::signal::ShutdownHandler;

/// Number of files listed in the confirmation summary.
const CONFIRM_PREVIEW_LIMIT: usize = 10;

/// Run the application with parsed arguments.
///
/// # Errors
///
/// Returns an error when configuration, scanning, or writing the report
/// fails. Per-file deletion failures are not errors; they yield
/// [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Config(ConfigCommand::Init { path, force }) => {
            init_config(path.as_deref().or(config_path), force)
        }
        Commands::Config(ConfigCommand::Show) => {
            print!("{}", load_config(config_path)?.to_toml()?);
            Ok(ExitCode::Success)
        }
        Commands::Scan(args) => {
            let config = load_config(config_path)?;
            let handler = signal::install_handler().context("Failed to install Ctrl+C handler")?;
            run_scan(&config, &args, &handler)
        }
        Commands::Clean(args) => {
            let config = load_config(config_path)?;
            let handler = signal::install_handler().context("Failed to install Ctrl+C handler")?;
            run_clean(&config, &args, &handler, cli.quiet, cli.no_color)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::load(path).context("Failed to load configuration")?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn init_config(path: Option<&Path>, force: bool) -> anyhow::Result<ExitCode> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path().context("Could not determine the config directory")?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::write_default(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(ExitCode::Success)
}

fn build_finder(config: &Config, handler: &ShutdownHandler) -> anyhow::Result<DuplicateFinder> {
    let classifier = config.classifier()?;
    Ok(DuplicateFinder::new(
        FinderConfig::default()
            .with_classifier(classifier)
            .with_skip_hidden(config.skip_hidden)
            .with_shutdown_flag(handler.get_flag()),
    ))
}

fn scan(finder: &DuplicateFinder, rom_dir: &Path) -> anyhow::Result<ScanOutcome> {
    finder
        .scan_directory(rom_dir)
        .with_context(|| format!("Failed to scan {}", rom_dir.display()))
}

fn run_scan(config: &Config, args: &ScanArgs, handler: &ShutdownHandler) -> anyhow::Result<ExitCode> {
    let finder = build_finder(config, handler)?;
    let outcome = scan(&finder, &args.rom_dir)?;
    let selection = KeepSelection::with_defaults(&outcome.groups);

    let exit_code = if outcome.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    let mut report = Report::new(&outcome, &selection);
    if let Some(ref images) = args.images {
        report = report.with_previews(images, &config.image_extensions);
    }
    write_report(&report, args.output, exit_code)?;
    Ok(exit_code)
}

fn run_clean(
    config: &Config,
    args: &CleanArgs,
    handler: &ShutdownHandler,
    quiet: bool,
    accessible: bool,
) -> anyhow::Result<ExitCode> {
    let finder = build_finder(config, handler)?;
    let outcome = scan(&finder, &args.rom_dir)?;

    if outcome.is_empty() {
        let selection = KeepSelection::with_defaults(&outcome.groups);
        write_report(
            &Report::new(&outcome, &selection),
            args.output,
            ExitCode::NoDuplicates,
        )?;
        return Ok(ExitCode::NoDuplicates);
    }

    let selection = KeepSelection::with_overrides(&outcome.groups, &args.keep)
        .context("Invalid --keep selection")?;
    let to_delete = selection.files_to_delete();

    for group in &outcome.groups {
        let selected: Vec<String> = to_delete
            .iter()
            .filter(|f| group.contains(f))
            .cloned()
            .collect();
        validate_preserves_copy(&selected, &group.files)
            .with_context(|| format!("Refusing to empty group '{}'", group.base_name))?;
    }

    let permanent = config.permanent && !args.trash;
    if !args.yes && !confirm_deletion(&to_delete, &args.images, permanent)? {
        println!("Deletion process canceled.");
        return Ok(ExitCode::Success);
    }

    let delete_config = DeleteConfig::default()
        .with_permanent(permanent)
        .with_image_extensions(config.image_extensions.clone())
        .with_shutdown_flag(handler.get_flag());
    let progress = Progress::with_accessible(quiet, accessible);
    let result = delete_batch(
        &args.rom_dir,
        Some(&args.images),
        &to_delete,
        &delete_config,
        Some(&progress),
    );

    write_deletion_summary(
        &result,
        args.output,
        quiet,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    if result.interrupted {
        return Ok(ExitCode::Interrupted);
    }

    let rescan = scan(&finder, &args.rom_dir)?;
    let rescan_selection = KeepSelection::with_defaults(&rescan.groups);
    let exit_code = if !result.all_succeeded() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };
    let report = Report::new(&rescan, &rescan_selection)
        .with_previews(&args.images, &config.image_extensions);
    write_report(&report, args.output, exit_code)?;

    Ok(exit_code)
}

/// Show what is about to be deleted and ask for confirmation.
fn confirm_deletion(to_delete: &[String], image_dir: &Path, permanent: bool) -> anyhow::Result<bool> {
    let mut stderr = io::stderr().lock();
    writeln!(
        stderr,
        "The following {} ROM files (and their images in {}) will be {}:",
        to_delete.len(),
        image_dir.display(),
        if permanent { "permanently deleted" } else { "moved to the trash" }
    )?;
    for name in to_delete.iter().take(CONFIRM_PREVIEW_LIMIT) {
        writeln!(stderr, "  - {}", name)?;
    }
    if to_delete.len() > CONFIRM_PREVIEW_LIMIT {
        writeln!(
            stderr,
            "  ... and {} more",
            to_delete.len() - CONFIRM_PREVIEW_LIMIT
        )?;
    }
    drop(stderr);

    dialoguer::Confirm::new()
        .with_prompt("Proceed with deletion?")
        .default(false)
        .interact()
        .context("Failed to read confirmation (use --yes in non-interactive mode)")
}

/// Print the batch summary once: on stdout alongside a text report, on
/// stderr when stdout carries JSON or CSV.
fn write_deletion_summary<O: Write, E: Write>(
    result: &BatchDeleteResult,
    format: OutputFormat,
    quiet: bool,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", result.summary()),
        OutputFormat::Json | OutputFormat::Csv if !quiet => writeln!(err, "{}", result.summary()),
        OutputFormat::Json | OutputFormat::Csv => Ok(()),
    }
}

fn write_report(report: &Report<'_>, format: OutputFormat, exit_code: ExitCode) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => TextOutput::new(report).write_to(&mut stdout)?,
        OutputFormat::Json => JsonOutput::new(report, exit_code).write_to(&mut stdout, true)?,
        OutputFormat::Csv => CsvOutput::new(report).write_to(&mut stdout)?,
    }
    stdout.flush()?;
    Ok(())
}
