pub mod config;
pub mod cover;
pub mod decode;
pub mod encode;
pub mod metadata;

/// Audio file extensions we support
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "opus", "wav", "m4a", "m4b", "mp4", "aac", "wma",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "waxtag";
