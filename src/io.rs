//! Line oriented text storage.
//!
//! One product per line, `name,quantity,price`, no header. Names are not
//! escaped, so a name containing a comma cannot be stored in this format.

use crate::error::{InventoryError, Result};
use crate::models::Product;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What to do with a stored record that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Drop the record, report it and keep going
    #[default]
    Skip,
    /// Stop at the first malformed record
    Abort,
}

/// A record that was dropped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line: u64,
    pub content: String,
    pub reason: String,
}

/// Outcome of loading a backing store
#[derive(Debug, Default)]
pub struct LoadReport {
    pub products: Vec<Product>,
    pub rejected: Vec<RejectedLine>,
    /// The backing store did not exist (first run)
    pub source_missing: bool,
}

impl LoadReport {
    /// Report for a backing store that does not exist yet
    pub fn missing(path: &Path) -> Self {
        info!(
            "{} does not exist yet, starting with an empty product list",
            path.display()
        );
        Self {
            source_missing: true,
            ..Self::default()
        }
    }
}

/// Applies the malformed-record policy to one bad record.
///
/// With `Skip` the record is logged and pushed to `rejected`; with `Abort`
/// it becomes the returned error.
pub(crate) fn reject(
    policy: MalformedPolicy,
    line: u64,
    content: &str,
    err: InventoryError,
    rejected: &mut Vec<RejectedLine>,
) -> Result<()> {
    let reason = match err {
        InventoryError::InvalidProduct(reason) => reason,
        other => other.to_string(),
    };
    match policy {
        MalformedPolicy::Skip => {
            warn!("Skipping line {line}: {reason} ('{content}')");
            rejected.push(RejectedLine {
                line,
                content: content.to_string(),
                reason,
            });
            Ok(())
        }
        MalformedPolicy::Abort => {
            warn!("Aborting at line {line}: {reason} ('{content}')");
            Err(InventoryError::MalformedLine {
                line,
                content: content.to_string(),
                reason,
            })
        }
    }
}

/// Reads all products from a text backing store.
///
/// A missing file is the normal first-run state and yields an empty report.
/// Fields are trimmed before parsing; a rejected line keeps its raw text.
pub fn read_products<P: AsRef<Path>>(path: P, policy: MalformedPolicy) -> Result<LoadReport> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(LoadReport::missing(path));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut report = LoadReport::default();

    for result in rdr.byte_records() {
        let record = result?;
        if record.iter().all(|field| field.trim_ascii().is_empty()) {
            continue;
        }
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let content = record
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(",");

        let parsed = decode_fields(&record).and_then(|fields| match fields.as_slice() {
            [name, quantity, price] => Product::from_fields(name, quantity, price),
            _ => Err(InventoryError::InvalidProduct(format!(
                "expected 3 fields, found {}",
                fields.len()
            ))),
        });

        match parsed {
            Ok(product) => report.products.push(product),
            Err(err) => reject(policy, line, &content, err, &mut report.rejected)?,
        }
    }

    info!(
        "Loaded {} products from {} ({} lines skipped)",
        report.products.len(),
        path.display(),
        report.rejected.len()
    );
    Ok(report)
}

fn decode_fields(record: &csv::ByteRecord) -> Result<Vec<&str>> {
    record
        .iter()
        .map(|field| {
            std::str::from_utf8(field).map_err(|_| {
                InventoryError::InvalidProduct("line is not valid UTF-8".to_string())
            })
        })
        .collect()
}

/// Writes every product to the text backing store, replacing its content
pub fn write_products<P: AsRef<Path>>(path: P, products: &[Product]) -> Result<()> {
    let path = path.as_ref();
    let mut contents = String::new();
    for product in products {
        contents.push_str(&product.to_line());
        contents.push('\n');
    }
    write_atomic(path, contents.as_bytes())?;
    info!("Saved {} products to {}", products.len(), path.display());
    Ok(())
}

/// Reads the non-empty raw lines of a text backing store.
///
/// A line that is not valid UTF-8 is reported as a malformed line.
pub fn read_raw_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| InventoryError::io(path, e))?;
    let mut lines = Vec::new();
    for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.trim_ascii().is_empty() {
            continue;
        }
        let line = std::str::from_utf8(raw).map_err(|_| InventoryError::MalformedLine {
            line: index as u64 + 1,
            content: String::from_utf8_lossy(raw).into_owned(),
            reason: "line is not valid UTF-8".to_string(),
        })?;
        lines.push(line.to_string());
    }
    Ok(lines)
}

/// Replaces the content of `path` with the given raw lines
pub fn write_raw_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let mut contents = lines.join("\n");
    if !lines.is_empty() {
        contents.push('\n');
    }
    write_atomic(path.as_ref(), contents.as_bytes())
}

/// Writes to a temporary sibling file and renames it over `path`, so readers
/// never observe a half-written store.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| InventoryError::io(dir, e))?;
    tmp.write_all(contents)
        .map_err(|e| InventoryError::io(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| InventoryError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| InventoryError::io(path, e.error))?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Sibling backup path: `<path>.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

/// Copies `path` byte for byte to its backup path and returns that path
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|e| InventoryError::io(&backup, e))?;
    info!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Creates the parent directory of a data file if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| InventoryError::io(parent, e))?;
            info!("Created directory: {}", parent.display());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "io_tests.rs"]
mod tests;
