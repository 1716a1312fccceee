//! Format-preserving edits of `config.toml` via `toml_edit`, so alias
//! changes never destroy comments or hand-made formatting.

use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, Item, Table, value};

use crate::{CONFIG_FILENAME, ConfigError};

/// Load the config as a format-preserving TOML document. A missing
/// file yields an empty document.
pub fn load_document(dir: &Path) -> Result<(DocumentMut, PathBuf), ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok((DocumentMut::new(), path));
    }
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let doc: DocumentMut = content
        .parse()
        .map_err(|e: toml_edit::TomlError| ConfigError::Parse(e.to_string()))?;
    Ok((doc, path))
}

/// Save the TOML document back to disk, creating the directory first.
pub fn save_document(doc: &DocumentMut, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, doc.to_string()).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Add or replace an alias in the [aliases] section.
pub fn add_alias(doc: &mut DocumentMut, name: &str, job_url: &str) {
    ensure_table(doc, "aliases");
    doc["aliases"][name] = value(job_url);
}

/// Remove an alias. Returns true if it existed.
pub fn remove_alias(doc: &mut DocumentMut, name: &str) -> bool {
    if let Some(table) = doc.get_mut("aliases").and_then(|t| t.as_table_like_mut()) {
        return table.remove(name).is_some();
    }
    false
}

fn ensure_table(doc: &mut DocumentMut, key: &str) {
    if doc.get(key).is_none() {
        doc[key] = Item::Table(Table::new());
    }
}
