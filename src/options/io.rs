use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::OPTIONS_FILE_NAME;
use super::errors::OptionsIoError;
use super::types::WaveOptions;

/// Resolve the options file path inside the application directory.
pub fn options_path() -> Result<PathBuf, OptionsIoError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(OPTIONS_FILE_NAME))
}

/// Load options from the application directory, returning defaults if missing.
pub fn load_or_default() -> Result<WaveOptions, OptionsIoError> {
    load_from(&options_path()?)
}

/// Load and validate options from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<WaveOptions, OptionsIoError> {
    if !path.exists() {
        return Ok(WaveOptions::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| OptionsIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let options: WaveOptions = toml::from_str(&text).map_err(|source| OptionsIoError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    options
        .validate()
        .map_err(|source| OptionsIoError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!("Loaded waveform options from {}", path.display());
    Ok(options)
}

/// Persist options to the application directory.
pub fn save(options: &WaveOptions) -> Result<(), OptionsIoError> {
    save_to_path(options, &options_path()?)
}

/// Write options as TOML, creating parent directories as needed.
pub fn save_to_path(options: &WaveOptions, path: &Path) -> Result<(), OptionsIoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| OptionsIoError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(options).map_err(|source| OptionsIoError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, data.as_bytes())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), OptionsIoError> {
    use rand::TryRngCore;
    let write_err = |path: &Path, source: std::io::Error| OptionsIoError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().ok_or_else(|| {
        write_err(
            path,
            std::io::Error::other("options path has no parent directory"),
        )
    })?;
    let file_name = path
        .file_name()
        .ok_or_else(|| write_err(path, std::io::Error::other("options path has no file name")))?;

    let mut last_err = None;
    for _ in 0..5 {
        let mut bytes = [0u8; 6];
        rand::rngs::OsRng.try_fill_bytes(&mut bytes).map_err(|source| {
            write_err(
                path,
                std::io::Error::other(format!(
                    "failed to generate temporary file suffix: {source}"
                )),
            )
        })?;
        let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let tmp_path = dir.join(format!("{}.tmp-{suffix}", file_name.to_string_lossy()));

        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(err) => return Err(write_err(&tmp_path, err)),
        };
        let written = file.write_all(data).and_then(|_| file.sync_all());
        drop(file);
        if let Err(err) = written.and_then(|_| std::fs::rename(&tmp_path, path)) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(path, err));
        }
        return Ok(());
    }

    Err(write_err(
        path,
        std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!(
                "failed to create temporary file for {}: {}",
                path.display(),
                last_err
                    .as_ref()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "unknown error".into())
            ),
        ),
    ))
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> OptionsIoError {
    match error {
        app_dirs::AppDirError::NoBaseDir => OptionsIoError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            OptionsIoError::CreateDir { path, source }
        }
    }
}
