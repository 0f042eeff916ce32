//! Mapping file parser
//!
//! One rule per line, `source -> destination`, optionally restricted to a
//! set of platforms with a bracketed suffix:
//!
//! ```text
//! ~/dotfiles/vimrc -> ~/.vimrc
//! ~/dotfiles/karabiner -> ~/.config/karabiner [macos]
//! # comments and blank lines are ignored
//! ```
//!
//! Both the link and backup passes parse with [`parse_line`]; platform
//! filtering is applied only by the link pass.

use crate::platform::Platform;

/// Comment marker for mapping files
const COMMENT: char = '#';

/// Separator between source and destination
const ARROW: &str = "->";

/// One declarative instruction mapping a source path to a destination path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRule {
    /// Where the real file lives (may use `~` and `$VAR` references)
    pub source: String,
    /// Where the symlink should be created
    pub destination: String,
    /// Platforms the rule is restricted to; empty means all platforms
    pub platforms: Vec<Platform>,
}

impl LinkRule {
    /// Whether this rule applies on the given platform
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }
}

/// The outcome of parsing one mapping-file line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// A well-formed rule
    Rule(LinkRule),
    /// Blank line or comment; produces nothing
    Blank,
    /// Malformed line (no `->` separator); callers warn and continue
    Invalid {
        /// The trimmed offending line, for the warning message
        line: String,
    },
}

/// Parse one line of a mapping file.
///
/// The bracketed platform list is split off unconditionally before the
/// arrow check, so a line with brackets but no arrow is still reported as
/// invalid. Unrecognized platform tags are dropped from the set.
pub fn parse_line(raw: &str) -> ParsedLine {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT) {
        return ParsedLine::Blank;
    }

    let (body, platforms) = match line.split_once('[') {
        Some((body, tags)) => {
            let tags = tags.trim_end().trim_end_matches(']');
            let platforms = tags
                .split(',')
                .filter_map(|tag| Platform::from_tag(tag.trim()))
                .collect();
            (body.trim(), platforms)
        }
        None => (line, Vec::new()),
    };

    match body.split_once(ARROW) {
        Some((source, destination)) => ParsedLine::Rule(LinkRule {
            source: source.trim().to_string(),
            destination: destination.trim().to_string(),
            platforms,
        }),
        None => ParsedLine::Invalid {
            line: line.to_string(),
        },
    }
}
