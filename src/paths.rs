//! Path expansion for mapping-file entries

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from path relativization
#[derive(Debug, Error)]
pub enum PathError {
    /// The path does not live under the user's home directory
    #[error("{} is outside the home directory {}", path.display(), home.display())]
    OutsideHome {
        /// The offending path
        path: PathBuf,
        /// The home directory it was checked against
        home: PathBuf,
    },
}

/// Expand a mapping-file path string into a filesystem path.
///
/// A leading `~` is replaced with `home`, then `$NAME` and `${NAME}`
/// references are substituted from the process environment. Expansion is
/// best-effort: references to unset variables pass through as the original
/// literal substring, and values substituted for variables are not
/// re-expanded.
pub fn expand(raw: &str, home: &Path) -> PathBuf {
    let tilded = expand_tilde(raw, home);
    PathBuf::from(expand_env(&tilded))
}

/// Compute the archive entry name for a path: its location relative to home.
pub fn home_relative<'a>(path: &'a Path, home: &Path) -> Result<&'a Path, PathError> {
    path.strip_prefix(home).map_err(|_| PathError::OutsideHome {
        path: path.to_path_buf(),
        home: home.to_path_buf(),
    })
}

fn expand_tilde(raw: &str, home: &Path) -> String {
    if raw == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        raw.to_string()
    }
}

fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        // ${NAME} form
        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &braced[end + 1..];
            } else {
                // Unterminated brace: keep the dollar sign literal
                out.push('$');
                rest = after;
            }
            continue;
        }

        // $NAME form
        let end = after
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
            .map_or(after.len(), |(i, _)| i);

        if end == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let name = &after[..end];
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[end..];
    }

    out.push_str(rest);
    out
}
