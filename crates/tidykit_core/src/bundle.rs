//! Read-only JSON resources shipped with an application.
//!
//! Resources are decoded once at startup. A missing or malformed resource
//! is reported as a `BundleError` instead of aborting the process.

use crate::model::product::Product;
use crate::model::quiz::QuizQuestion;
use log::{error, info};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Bundled resource failures.
#[derive(Debug)]
pub enum BundleError {
    Missing(PathBuf),
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode {
        resource: String,
        source: serde_json::Error,
    },
}

impl Display for BundleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "bundled resource not found: {}", path.display()),
            Self::Read { path, source } => {
                write!(f, "failed to read bundled resource {}: {source}", path.display())
            }
            Self::Decode { resource, source } => {
                write!(f, "failed to decode bundled resource {resource}: {source}")
            }
        }
    }
}

impl Error for BundleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing(_) => None,
            Self::Read { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// Decodes a bundled JSON file into `T`.
pub fn decode_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, BundleError> {
    let path = path.as_ref();
    if !path.is_file() {
        error!("event=bundle_load module=bundle status=error error_code=missing");
        return Err(BundleError::Missing(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| BundleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let resource = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    decode_slice(&resource, &bytes)
}

/// Decodes in-memory JSON (for example `include_bytes!` data) into `T`.
pub fn decode_slice<T: DeserializeOwned>(resource: &str, bytes: &[u8]) -> Result<T, BundleError> {
    match serde_json::from_slice(bytes) {
        Ok(value) => {
            info!(
                "event=bundle_load module=bundle status=ok resource={resource} bytes={}",
                bytes.len()
            );
            Ok(value)
        }
        Err(source) => {
            error!(
                "event=bundle_load module=bundle status=error resource={resource} error_code=decode_failed"
            );
            Err(BundleError::Decode {
                resource: resource.to_string(),
                source,
            })
        }
    }
}

const PRODUCT_DATA: &[u8] = include_bytes!("../resources/ProductData.json");
const QUIZ_DATA: &[u8] = include_bytes!("../resources/quiz_questions.json");

/// Product catalogue compiled into the crate.
pub fn bundled_products() -> Result<Vec<Product>, BundleError> {
    decode_slice("ProductData.json", PRODUCT_DATA)
}

/// Quiz question set compiled into the crate.
pub fn bundled_quiz_questions() -> Result<Vec<QuizQuestion>, BundleError> {
    decode_slice("quiz_questions.json", QUIZ_DATA)
}
