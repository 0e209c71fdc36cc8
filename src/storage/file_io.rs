//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CuotasError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, CuotasError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| CuotasError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| CuotasError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), CuotasError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| CuotasError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write YAML to a file atomically
pub fn write_yaml_atomic<T, P>(path: P, data: &T) -> Result<(), CuotasError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    write_atomic(path, |writer| {
        serde_yaml::to_writer(writer, data)
            .map_err(|e| CuotasError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write through a temp file in the same directory, then rename over `path`
fn write_atomic<F>(path: &Path, write: F) -> Result<(), CuotasError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), CuotasError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CuotasError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| CuotasError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;

    writer
        .flush()
        .map_err(|e| CuotasError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| CuotasError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CuotasError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
