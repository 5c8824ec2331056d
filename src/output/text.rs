//! Human-readable terminal report.
//!
//! ```text
//! Group: super game (3 files)
//!   [keep]   Super Game (Europe).rom
//!   [delete] Super Game (Japan).rom
//!   [delete] Super Game (USA).rom
//!   preview: /images/Super Game (Europe).png
//!
//! Scan complete. Found 1 duplicate groups with a total of 3 files.
//! ```
//!
//! Colors come from `yansi`. `--no-color` disables them globally;
//! [`TextOutput::with_color`] turns them off for a single report.

use std::io::{self, Write};

use yansi::{Condition, Paint};

use super::{FileAction, Report};

/// Message printed when a scan yields no groups.
pub const NO_DUPLICATES_MESSAGE: &str = "No duplicates found according to the rules.";

/// Text formatter.
pub struct TextOutput<'r, 'a> {
    report: &'r Report<'a>,
    color: Condition,
}

impl<'r, 'a> TextOutput<'r, 'a> {
    #[must_use]
    pub fn new(report: &'r Report<'a>) -> Self {
        Self {
            report,
            color: Condition::ALWAYS,
        }
    }

    /// Enable or disable colors for this report. Enabled output still
    /// honors the global `yansi` switch.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = if color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        };
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let when = self.color;

        if self.report.is_empty() {
            writeln!(writer, "{}", NO_DUPLICATES_MESSAGE.yellow().whenever(when))?;
            return Ok(());
        }

        for group in self.report.groups() {
            writeln!(
                writer,
                "{} {} ({} files)",
                "Group:".bold().whenever(when),
                group.base_name.cyan().bold().whenever(when),
                group.len()
            )?;

            for file in &group.files {
                match self.report.action(group, file) {
                    FileAction::Keep => {
                        writeln!(writer, "  {}   {}", "[keep]".green().whenever(when), file)?;
                    }
                    FileAction::Delete => {
                        writeln!(writer, "  {} {}", "[delete]".red().whenever(when), file)?;
                    }
                }
            }

            if let Some(preview) = self.report.preview(&group.base_name) {
                writeln!(
                    writer,
                    "  {} {}",
                    "preview:".dim().whenever(when),
                    preview.display()
                )?;
            }
            writeln!(writer)?;
        }

        let summary = self.report.outcome.summary.message();
        writeln!(writer, "{}", summary.bold().whenever(when))?;
        Ok(())
    }

    /// Render the report to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn render(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
