use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] BatchError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Input error: {0}")]
    Scan(#[from] ScanError),
}

/// Failure of a single OCR call. Neither variant is retried.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("OCR engine error: {0}")]
    Engine(String),
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Extraction of '{name}' failed: {source}")]
    Extraction {
        name: String,
        #[source]
        source: OcrError,
    },

    #[error("Failed to spawn worker: {0}")]
    WorkerSpawn(String),

    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("No extraction completed within {waited:?}")]
    Timeout { waited: Duration },
}

/// A logo or artwork image could not be drawn. Never fatal for a page.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Asset not found: {0}")]
    MissingAsset(PathBuf),

    #[error("Failed to read asset '{path}': {source}")]
    ReadAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid color '{value}': expected #RRGGBB")]
    InvalidColor { value: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to scan '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input path does not exist: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
