//! Thin wrappers around external decoder binaries, plus [`make_wave`], the
//! extension-dispatched "get me a WAV of this" entry point.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("no file extension on {0}")]
    NoExtension(String),
    #[error("unknown file type: {0}")]
    UnknownFileType(String),
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

async fn run(tool: &'static str, args: Vec<OsString>) -> Result<(), DecodeError> {
    let output = Command::new(tool)
        .args(&args)
        .output()
        .await
        .map_err(|source| DecodeError::Launch { tool, source })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(DecodeError::Failed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Decode an mp3 to WAV with lame.
pub async fn mp3(input: &Path, output: &Path) -> Result<(), DecodeError> {
    run("lame", vec!["--quiet".into(), "--decode".into(), input.into(), output.into()]).await
}

/// Decode a FLAC file to WAV.
pub async fn flac(input: &Path, output: &Path) -> Result<(), DecodeError> {
    run("flac", vec!["-d".into(), input.into(), "-o".into(), output.into()]).await
}

/// Decode an AAC-family file to WAV with faad.
pub async fn aac(input: &Path, output: &Path) -> Result<(), DecodeError> {
    run("faad", vec!["-o".into(), output.into(), input.into()]).await
}

/// Decode anything ffmpeg can read.
pub async fn ffmpeg(input: &Path, output: &Path) -> Result<(), DecodeError> {
    run("ffmpeg", vec!["-i".into(), input.into(), output.into()]).await
}

fn resolve_type(input: &Path, type_hint: Option<&str>) -> Result<String, DecodeError> {
    let file_type = match type_hint {
        Some(hint) => hint.trim_start_matches('.').to_lowercase(),
        None => input.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase(),
    };
    if file_type.is_empty() {
        return Err(DecodeError::NoExtension(input.display().to_string()));
    }
    Ok(file_type)
}

/// Convert a compressed audio file to a temporary WAV, picking the decoder
/// from the extension (or an explicit type hint). A WAV input passes
/// through unchanged.
pub async fn make_wave(input: &Path, type_hint: Option<&str>) -> Result<PathBuf, DecodeError> {
    let file_type = resolve_type(input, type_hint)?;
    if file_type == "wav" {
        return Ok(input.to_path_buf());
    }

    let output =
        std::env::temp_dir().join(format!("{}_decode_{}.wav", crate::APP_NAME, std::process::id()));
    match file_type.as_str() {
        "mp3" => mp3(input, &output).await?,
        "flac" => flac(input, &output).await?,
        "mp4" | "aac" | "m4a" | "m4b" => aac(input, &output).await?,
        "wma" => ffmpeg(input, &output).await?,
        other => return Err(DecodeError::UnknownFileType(other.to_string())),
    }
    Ok(output)
}
