//! Thin wrappers around external encoder binaries. The interesting part is
//! the per-tool argument shape; success is just the process exiting zero.

use std::ffi::OsString;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

use crate::metadata::TrackAttrs;

#[derive(Error, Debug)]
pub enum EncodeError {
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

async fn run(tool: &'static str, args: Vec<OsString>) -> Result<(), EncodeError> {
    let output = Command::new(tool)
        .args(&args)
        .output()
        .await
        .map_err(|source| EncodeError::Launch { tool, source })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(EncodeError::Failed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn push_flag(args: &mut Vec<OsString>, flag: &str, value: &Option<String>) {
    if let Some(value) = value {
        args.push(flag.into());
        args.push(value.into());
    }
}

fn m4a_args(wav: &Path, output: &Path, attrs: Option<&TrackAttrs>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-w".into(), "-o".into(), output.into()];
    if let Some(attrs) = attrs {
        push_flag(&mut args, "--artist", &attrs.artist);
        push_flag(&mut args, "--album", &attrs.album);
        push_flag(&mut args, "--title", &attrs.title);
        push_flag(&mut args, "--track", &attrs.track);
        push_flag(&mut args, "--year", &attrs.year);
    }
    args.push(wav.into());
    args
}

fn ffmpeg_args(input: &Path, output: &Path, attrs: Option<&TrackAttrs>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into(), "-vn".into()];
    if let Some(attrs) = attrs {
        let fields = [
            ("artist", &attrs.artist),
            ("album", &attrs.album),
            ("title", &attrs.title),
            ("track", &attrs.track),
            ("year", &attrs.year),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                args.push("-metadata".into());
                args.push(format!("{key}={value}").into());
            }
        }
    }
    args.push(output.into());
    args
}

fn flac_args(wav: &Path, output: &Path, attrs: Option<&TrackAttrs>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--best".into(),
        "-m".into(),
        "-r".into(),
        "8".into(),
        "-e".into(),
        "-p".into(),
        "-o".into(),
        output.into(),
    ];
    if let Some(attrs) = attrs {
        // flac has no compilation tag, and spells track "tracknumber".
        let fields = [
            ("artist", &attrs.artist),
            ("album", &attrs.album),
            ("title", &attrs.title),
            ("tracknumber", &attrs.track),
            ("year", &attrs.year),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                args.push(format!("--tag={key}={value}").into());
            }
        }
    }
    args.push(wav.into());
    args
}

/// Encode a WAV file to m4a with faac.
pub async fn m4a(wav: &Path, output: &Path, attrs: Option<&TrackAttrs>) -> Result<(), EncodeError> {
    run("faac", m4a_args(wav, output, attrs)).await
}

/// Encode a WAV file to FLAC at maximum compression.
pub async fn flac(wav: &Path, output: &Path, attrs: Option<&TrackAttrs>) -> Result<(), EncodeError> {
    run("flac", flac_args(wav, output, attrs)).await
}

/// Encode any ffmpeg-readable input to whatever the output extension says.
pub async fn ffmpeg(
    input: &Path,
    output: &Path,
    attrs: Option<&TrackAttrs>,
) -> Result<(), EncodeError> {
    run("ffmpeg", ffmpeg_args(input, output, attrs)).await
}
