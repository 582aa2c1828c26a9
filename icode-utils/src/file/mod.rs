//! Path helpers
//!
//! The analyser reports file names relative to the directory it was run
//! from, with whatever separator the host platform used. These helpers
//! bring reported names and indexed paths to one comparable form.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path (`.` and `..` resolved, no filesystem access)
pub fn normalize_path(path: &Path) -> PathBuf {
    path_clean::clean(path)
}

/// Normalize a file name as reported by the analyser into a `/`-separated key
pub fn normalize_report_path(name: &str) -> String {
    let unified = name.trim().replace('\\', "/");
    if unified.is_empty() {
        return String::new();
    }
    let cleaned = normalize_path(Path::new(&unified));
    let key = join_components(&cleaned);
    if key == "." {
        String::new()
    } else {
        key
    }
}

/// Key of `path` relative to `base`, `/`-separated
pub fn relative_key(base: &Path, path: &Path) -> crate::Result<String> {
    let relative = path.strip_prefix(base).map_err(|_| {
        crate::UtilError::PathOperation(format!(
            "{} is not located under {}",
            path.display(),
            base.display()
        ))
    })?;
    Ok(join_components(&normalize_path(relative)))
}

fn join_components(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir => Some(".".to_string()),
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect();
    let joined = parts.join("/");
    if path.has_root() {
        format!("/{joined}")
    } else {
        joined
    }
}
