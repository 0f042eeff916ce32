//! Link command - create the symlinks described by the mapping file

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::mapping::{self, LinkRule, ParsedLine};
use crate::paths;
use crate::platform::Platform;

/// Execute the link command for the detected platform
pub fn execute(config: &Config) -> Result<()> {
    execute_for(config, Platform::current())
}

/// Run the link pass against an explicit platform.
///
/// Every per-rule failure (missing source, unwritable parent, symlink
/// creation error) is reported and skipped; only an unreadable mapping
/// file aborts the run.
pub fn execute_for(config: &Config, platform: Platform) -> Result<()> {
    println!("Detected platform: {platform}");

    let text = fs::read_to_string(&config.mapping_path)
        .with_context(|| format!("Failed to read: {}", config.mapping_path.display()))?;

    for line in text.lines() {
        match mapping::parse_line(line) {
            ParsedLine::Blank => {}
            ParsedLine::Invalid { line } => {
                eprintln!("{} ignoring invalid line: {}", "Warning:".yellow(), line);
            }
            ParsedLine::Rule(rule) => {
                if rule.applies_to(platform) {
                    apply_rule(&rule, &config.home);
                }
            }
        }
    }

    Ok(())
}

/// Link one rule; failures are reported, never propagated
fn apply_rule(rule: &LinkRule, home: &Path) {
    let source = paths::expand(&rule.source, home);
    if !source.exists() {
        eprintln!("{} source not found: {}", "Warning:".yellow(), source.display());
        return;
    }
    let source = match source.canonicalize() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{} {}: {}", "Failed:".red(), source.display(), e);
            return;
        }
    };

    // The destination is never canonicalized: it usually does not exist yet
    let dest = paths::expand(&rule.destination, home);

    if let Some(parent) = dest.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("{} {}: {}", "Failed:".red(), parent.display(), e);
            return;
        }
    }

    // symlink_metadata also catches broken symlinks, which exists() follows
    if dest.exists() || dest.symlink_metadata().is_ok() {
        println!("{} {}", "Skipping existing:".yellow(), dest.display());
        return;
    }

    match create_symlink(&source, &dest) {
        Ok(()) => println!(
            "{} {} -> {}",
            "Linked:".green(),
            dest.display(),
            source.display()
        ),
        Err(e) => eprintln!("{} {}: {}", "Failed:".red(), dest.display(), e),
    }
}

#[cfg(unix)]
fn create_symlink(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn create_symlink(source: &Path, dest: &Path) -> std::io::Result<()> {
    // Windows distinguishes file and directory symlinks
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, dest)
    } else {
        std::os::windows::fs::symlink_file(source, dest)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn setup(mapping: &str) -> (tempfile::TempDir, Config) {
        let home = tempfile::tempdir().unwrap();
        let mapping_path = home.path().join("symlinks.map");
        fs::write(&mapping_path, mapping).unwrap();
        let config = Config {
            mapping_path,
            backup_dir: home.path().join("backups"),
            home: home.path().to_path_buf(),
        };
        (home, config)
    }

    #[test]
    fn test_creates_symlink() {
        let (home, config) = setup("~/src -> ~/dst\n");
        fs::write(home.path().join("src"), "content").unwrap();

        execute_for(&config, Platform::current()).unwrap();

        let dst = home.path().join("dst");
        assert!(dst.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_link(&dst).unwrap(),
            home.path().join("src").canonicalize().unwrap()
        );
        assert_eq!(fs::read_to_string(&dst).unwrap(), "content");
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let (home, config) = setup("~/src -> ~/dst\n");
        fs::write(home.path().join("src"), "content").unwrap();

        execute_for(&config, Platform::current()).unwrap();
        // Second run must leave the existing link untouched
        execute_for(&config, Platform::current()).unwrap();

        let dst = home.path().join("dst");
        assert!(dst.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "content");
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let (home, config) = setup("~/.doesnotexist -> ~/.target\n");

        execute_for(&config, Platform::current()).unwrap();

        assert!(home.path().join(".target").symlink_metadata().is_err());
    }

    #[test]
    fn test_existing_destination_untouched() {
        let (home, config) = setup("~/src -> ~/dst\n");
        fs::write(home.path().join("src"), "new").unwrap();
        fs::write(home.path().join("dst"), "precious").unwrap();

        execute_for(&config, Platform::current()).unwrap();

        let dst = home.path().join("dst");
        assert!(!dst.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "precious");
    }

    #[test]
    fn test_broken_symlink_destination_untouched() {
        let (home, config) = setup("~/src -> ~/dst\n");
        fs::write(home.path().join("src"), "content").unwrap();
        std::os::unix::fs::symlink(home.path().join("gone"), home.path().join("dst")).unwrap();

        execute_for(&config, Platform::current()).unwrap();

        assert_eq!(
            fs::read_link(home.path().join("dst")).unwrap(),
            home.path().join("gone")
        );
    }

    #[test]
    fn test_platform_filter() {
        let (home, config) = setup("~/src -> ~/dst [macos, linux]\n");
        fs::write(home.path().join("src"), "content").unwrap();

        execute_for(&config, Platform::Windows).unwrap();
        assert!(home.path().join("dst").symlink_metadata().is_err());

        execute_for(&config, Platform::Linux).unwrap();
        assert!(home.path().join("dst").symlink_metadata().is_ok());
    }

    #[test]
    fn test_invalid_line_does_not_stop_run() {
        let (home, config) = setup("justsometext\n~/src -> ~/dst\n");
        fs::write(home.path().join("src"), "content").unwrap();

        execute_for(&config, Platform::current()).unwrap();

        assert!(home.path().join("dst").symlink_metadata().is_ok());
    }

    #[test]
    fn test_creates_destination_parent_dirs() {
        let (home, config) = setup("~/src -> ~/.config/app/settings\n");
        fs::write(home.path().join("src"), "content").unwrap();

        execute_for(&config, Platform::current()).unwrap();

        let dst: PathBuf = home.path().join(".config/app/settings");
        assert!(dst.symlink_metadata().unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_directory_source() {
        let (home, config) = setup("~/store/nvim -> ~/.config/nvim\n");
        fs::create_dir_all(home.path().join("store/nvim")).unwrap();
        fs::write(home.path().join("store/nvim/init.vim"), "set nu").unwrap();

        execute_for(&config, Platform::current()).unwrap();

        let dst = home.path().join(".config/nvim");
        assert!(dst.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(dst.join("init.vim")).unwrap(), "set nu");
    }
}
