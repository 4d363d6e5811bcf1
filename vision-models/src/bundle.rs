//! Versioned model bundle persistence.
//!
//! A bundle is a directory holding everything inference needs: a
//! manifest (`bundle.json`) with the schema version, backend id, input
//! geometry, and label encoder, plus whatever weight files the backend
//! writes. The encoder travels with the weights so score indices always
//! decode with the exact mapping fixed at training time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vision_types::{ImageGeometry, LabelEncoder};

use crate::backend::ClassifierBackend;
use crate::error::{ModelError, Result};

/// Manifest file name inside a bundle directory.
pub const MANIFEST_FILE: &str = "bundle.json";

/// Bundle schema version.
///
/// Bundles load only when the major version matches; a minor bump marks
/// additive changes old readers can ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incompatible layout changes.
    pub major: u32,

    /// Additive changes.
    pub minor: u32,
}

impl SchemaVersion {
    /// The schema version this build writes.
    pub const CURRENT: Self = Self { major: 1, minor: 0 };

    /// Returns `true` if a bundle with this version can be loaded.
    #[must_use]
    pub const fn is_compatible(&self) -> bool {
        self.major == Self::CURRENT.major
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Bundle metadata stored in [`MANIFEST_FILE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Schema version the bundle was written with.
    pub schema: SchemaVersion,

    /// Identifier of the backend that wrote the weights.
    pub backend_id: String,

    /// Input geometry the model was fitted for.
    pub geometry: ImageGeometry,

    /// Label encoder fixed at training time.
    pub encoder: LabelEncoder,
}

impl BundleManifest {
    /// Creates a manifest at the current schema version.
    #[must_use]
    pub fn new(backend_id: impl Into<String>, geometry: ImageGeometry, encoder: LabelEncoder) -> Self {
        Self {
            schema: SchemaVersion::CURRENT,
            backend_id: backend_id.into(),
            geometry,
            encoder,
        }
    }
}

/// Saves a fitted model, its encoder, and a manifest as a bundle.
///
/// The bundle is staged in a temporary sibling directory and renamed
/// into place, so a crash mid-save never leaves a half-written bundle at
/// `path`. An existing bundle at `path` is replaced.
///
/// # Errors
///
/// Returns [`ModelError::SaveBundle`] or [`ModelError::Io`] if staging
/// or the final rename fails.
pub fn save_bundle<C: ClassifierBackend>(
    backend: &C,
    fitted: &C::Fitted,
    geometry: ImageGeometry,
    encoder: &LabelEncoder,
    path: &Path,
) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let stage = tempfile::Builder::new()
        .prefix(".bundle-")
        .tempdir_in(parent)?;

    let manifest = BundleManifest::new(backend.id(), geometry, encoder.clone());
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(stage.path().join(MANIFEST_FILE), json)?;
    backend.save(fitted, stage.path())?;

    if path.exists() {
        debug!(path = %path.display(), "replacing existing bundle");
        fs::remove_dir_all(path)?;
    }
    let staged = stage.keep();
    fs::rename(&staged, path)?;

    info!(
        path = %path.display(),
        backend = backend.id(),
        classes = encoder.len(),
        "saved model bundle"
    );
    Ok(())
}

/// Reads and validates the manifest of a bundle.
///
/// # Errors
///
/// Returns [`ModelError::BundleNotFound`] if no manifest exists at
/// `path` and [`ModelError::IncompatibleBundle`] if the schema major
/// version differs from [`SchemaVersion::CURRENT`].
pub fn load_manifest(path: &Path) -> Result<BundleManifest> {
    let manifest_path = path.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(ModelError::bundle_not_found(path.display().to_string()));
    }

    let json = fs::read_to_string(&manifest_path)?;
    let manifest: BundleManifest = serde_json::from_str(&json)?;

    if !manifest.schema.is_compatible() {
        return Err(ModelError::incompatible_bundle(
            format!("schema {}.x", SchemaVersion::CURRENT.major),
            format!("schema {}", manifest.schema),
        ));
    }

    Ok(manifest)
}

/// Loads a bundle with the given backend.
///
/// # Errors
///
/// In addition to the [`load_manifest`] errors, returns
/// [`ModelError::IncompatibleBundle`] if the bundle was written by a
/// different backend than `backend`.
pub fn load_bundle<C: ClassifierBackend>(
    backend: &C,
    path: &Path,
) -> Result<(C::Fitted, BundleManifest)> {
    let manifest = load_manifest(path)?;

    if manifest.backend_id != backend.id() {
        return Err(ModelError::incompatible_bundle(
            format!("backend {}", backend.id()),
            format!("backend {}", manifest.backend_id),
        ));
    }

    let fitted = backend.load(path, manifest.encoder.len())?;
    info!(
        path = %path.display(),
        backend = %manifest.backend_id,
        classes = manifest.encoder.len(),
        "loaded model bundle"
    );
    Ok((fitted, manifest))
}
