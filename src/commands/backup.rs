//! Backup command - archive existing link destinations before they are replaced

use anyhow::{Context, Result};
use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use owo_colors::OwoColorize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::config::Config;
use crate::mapping::{self, ParsedLine};
use crate::paths;

/// Answers the per-entry "include this path?" question.
///
/// The interactive implementation reads stdin; `--yes` substitutes
/// [`AlwaysConfirm`] and tests inject scripted answers.
pub trait Confirm {
    /// Whether the operator answered affirmatively to `prompt`
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Interactive stdin prompt; only a single `y` (case-insensitive) is affirmative
#[derive(Debug)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{prompt} (y/N) ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        Ok(input.trim().eq_ignore_ascii_case("y"))
    }
}

/// Answers yes to everything, for `--yes`
#[derive(Debug)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Execute the backup command.
///
/// Walks the mapping and offers every destination that currently exists
/// for inclusion, regardless of platform tags. Confirmed entries are
/// written to a timestamped tar.gz under their home-relative names; if
/// nothing is confirmed the archive is removed again. Archive-level I/O
/// failures abort the whole pass.
pub fn execute(config: &Config, confirm: &mut dyn Confirm) -> Result<()> {
    let text = fs::read_to_string(&config.mapping_path)
        .with_context(|| format!("Failed to read: {}", config.mapping_path.display()))?;

    fs::create_dir_all(&config.backup_dir)
        .with_context(|| format!("Failed to create: {}", config.backup_dir.display()))?;

    let archive_path = config.backup_dir.join(format!(
        "backup-{}.tar.gz",
        Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = File::create(&archive_path)
        .with_context(|| format!("Failed to create: {}", archive_path.display()))?;
    let mut archive = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let mut included = 0usize;

    for line in text.lines() {
        let rule = match mapping::parse_line(line) {
            ParsedLine::Rule(rule) => rule,
            ParsedLine::Blank => continue,
            ParsedLine::Invalid { line } => {
                eprintln!("{} ignoring invalid line: {}", "Warning:".yellow(), line);
                continue;
            }
        };

        // Platform tags are deliberately ignored here: an existing
        // destination is offered for backup no matter which platform
        // the rule targets.
        let dest = paths::expand(&rule.destination, &config.home);
        if !dest.exists() {
            continue;
        }

        if !confirm.confirm(&format!("Back up {}?", dest.display()))? {
            println!("{} {}", "Skipped:".yellow(), dest.display());
            continue;
        }

        let name = match paths::home_relative(&dest, &config.home) {
            Ok(name) => name.to_path_buf(),
            Err(e) => {
                eprintln!("{} {}", "Failed:".red(), e);
                continue;
            }
        };

        append_entry(&mut archive, &dest, &name)
            .with_context(|| format!("Failed to archive: {}", dest.display()))?;
        println!("{} {}", "Added:".green(), name.display());
        included += 1;
    }

    let encoder = archive.into_inner().context("Failed to finish archive")?;
    encoder.finish().context("Failed to finish archive")?;

    if included == 0 {
        fs::remove_file(&archive_path)
            .with_context(|| format!("Failed to remove: {}", archive_path.display()))?;
        println!("No files backed up.");
        return Ok(());
    }

    println!();
    println!(
        "{} {} ({} item(s))",
        "Created:".green(),
        archive_path.display(),
        included
    );
    println!("Restore with: tar -xzf {} -C ~", archive_path.display());

    Ok(())
}

/// Append a file or directory to the archive under `name`
fn append_entry<W: Write>(archive: &mut tar::Builder<W>, path: &Path, name: &Path) -> Result<()> {
    if path.is_dir() {
        for entry in walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let relative = entry
                .path()
                .strip_prefix(path)
                .with_context(|| format!("Failed to strip prefix from: {}", entry.path().display()))?;

            let archive_path = if relative.as_os_str().is_empty() {
                name.to_path_buf()
            } else {
                name.join(relative)
            };

            if entry.path().is_dir() {
                archive.append_dir(&archive_path, entry.path())?;
            } else if entry.path().is_file() {
                archive.append_path_with_name(entry.path(), &archive_path)?;
            }
        }
    } else {
        archive.append_path_with_name(path, name)?;
    }
    Ok(())
}
