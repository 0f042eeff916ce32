//! Platform detection and mapping-file platform tags

use std::fmt;

/// Operating system family a link rule can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux and anything else not recognized as the other two
    Linux,
    /// macOS
    Macos,
    /// Windows
    Windows,
}

impl Platform {
    /// Detect the platform this process is running on.
    ///
    /// Never fails: anything that is not windows or macOS is treated as
    /// linux.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            _ => Self::Linux,
        }
    }

    /// Parse a platform tag from the mapping file (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::Macos),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// The lowercase tag used in mapping files
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
