//! Model artifacts: loading, the shared `ModelBundle`, and version-gated reloads.
//!
//! The bundle is loaded once at startup and shared by `Arc`; requests never read the
//! disk. `ArtifactStore::reload` rebuilds it only when a file's size or modification
//! time changed, and a failed reload keeps the previous bundle serving.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::catalog::CareerCatalog;
use crate::matching::encoders::{
    EncoderArtifact, EncoderBank, LabelEncoder, TargetEncoder, Vocabulary,
};
use crate::matching::forest::{Classifier, RandomForest};

pub const RF_MODEL_FILE: &str = "rf_model.json";
pub const SKILLS_ENCODER_FILE: &str = "skills_encoder.json";
pub const INTERESTS_ENCODER_FILE: &str = "interests_encoder.json";
pub const EDUCATION_ENCODER_FILE: &str = "education_encoder.json";
pub const TARGET_ENCODER_FILE: &str = "target_encoder.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

const MODEL_FILES: [&str; 6] = [
    RF_MODEL_FILE,
    SKILLS_ENCODER_FILE,
    INTERESTS_ENCODER_FILE,
    EDUCATION_ENCODER_FILE,
    TARGET_ENCODER_FILE,
    FEATURE_NAMES_FILE,
];

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model_dir: PathBuf,
    pub catalog: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model_dir: impl Into<PathBuf>, catalog: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            catalog: catalog.into(),
        }
    }

    fn model_file(&self, name: &str) -> PathBuf {
        self.model_dir.join(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

/// Size and modification time of every artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactVersion {
    files: Vec<FileStamp>,
}

impl ArtifactVersion {
    /// Model files must exist; the catalogue is optional and stamped as absent.
    pub fn probe(paths: &ArtifactPaths) -> anyhow::Result<Self> {
        let mut files = Vec::with_capacity(MODEL_FILES.len() + 1);
        for name in MODEL_FILES {
            let path = paths.model_file(name);
            let meta = fs::metadata(&path)
                .with_context(|| format!("Model artifact {} is missing", path.display()))?;
            files.push(FileStamp {
                len: meta.len(),
                modified: meta.modified().ok(),
                path,
            });
        }

        let catalog = fs::metadata(&paths.catalog).ok();
        files.push(FileStamp {
            path: paths.catalog.clone(),
            len: catalog.as_ref().map(|m| m.len()).unwrap_or(0),
            modified: catalog.and_then(|m| m.modified().ok()),
        });

        Ok(Self { files })
    }
}

/// Everything one prediction needs, immutable once built.
pub struct ModelBundle {
    pub classifier: Box<dyn Classifier>,
    pub encoders: EncoderBank,
    pub feature_names: Vec<String>,
    pub catalog: CareerCatalog,
    pub version: ArtifactVersion,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleSummary {
    pub classifier: &'static str,
    pub trees: usize,
    pub classes: usize,
    pub features: usize,
    pub skills_vocabulary: usize,
    pub interests_vocabulary: usize,
    pub education_levels: Vec<String>,
    pub catalog_careers: usize,
    pub loaded_at: DateTime<Utc>,
}

impl ModelBundle {
    /// Checks that the classifier, the target encoder and the feature schema agree.
    pub fn new(
        classifier: Box<dyn Classifier>,
        encoders: EncoderBank,
        feature_names: Vec<String>,
        catalog: CareerCatalog,
    ) -> Result<Self, AppError> {
        if classifier.n_features() != feature_names.len() {
            return Err(AppError::ArtifactLoad(format!(
                "classifier expects {} features but feature_names lists {}",
                classifier.n_features(),
                feature_names.len()
            )));
        }
        if classifier.n_classes() != encoders.target.len() {
            return Err(AppError::ArtifactLoad(format!(
                "classifier has {} classes but the target encoder knows {}",
                classifier.n_classes(),
                encoders.target.len()
            )));
        }

        Ok(Self {
            classifier,
            encoders,
            feature_names,
            catalog,
            version: ArtifactVersion::default(),
            loaded_at: Utc::now(),
        })
    }

    /// Loads every artifact from disk. Blocking; call from `spawn_blocking` at runtime.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, AppError> {
        Self::try_load(paths).map_err(|e| AppError::ArtifactLoad(format!("{e:#}")))
    }

    fn try_load(paths: &ArtifactPaths) -> anyhow::Result<Self> {
        let version = ArtifactVersion::probe(paths)?;

        let forest_path = paths.model_file(RF_MODEL_FILE);
        let raw = fs::read_to_string(&forest_path)
            .with_context(|| format!("Failed to read {}", forest_path.display()))?;
        let forest = RandomForest::from_json(&raw)
            .with_context(|| format!("Invalid classifier in {}", forest_path.display()))?;

        let skills: EncoderArtifact = read_json(&paths.model_file(SKILLS_ENCODER_FILE))?;
        let interests: EncoderArtifact = read_json(&paths.model_file(INTERESTS_ENCODER_FILE))?;
        let education: EncoderArtifact = read_json(&paths.model_file(EDUCATION_ENCODER_FILE))?;
        let target: EncoderArtifact = read_json(&paths.model_file(TARGET_ENCODER_FILE))?;
        let feature_names: Vec<String> = read_json(&paths.model_file(FEATURE_NAMES_FILE))?;

        let encoders = EncoderBank {
            skills: Vocabulary::new(skills.classes),
            interests: Vocabulary::new(interests.classes),
            education: LabelEncoder::new(education.classes),
            target: TargetEncoder::new(target.classes),
        };
        let catalog = CareerCatalog::load(&paths.catalog)?;

        let mut bundle = Self::new(Box::new(forest), encoders, feature_names, catalog)
            .map_err(|e| match e {
                AppError::ArtifactLoad(msg) => anyhow!(msg),
                other => anyhow!("{other}"),
            })?;
        bundle.version = version;

        info!(
            "Loaded model from {} ({} trees, {} features, {} classes)",
            paths.model_dir.display(),
            bundle.classifier.estimators(),
            bundle.feature_names.len(),
            bundle.encoders.target.len()
        );
        Ok(bundle)
    }

    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            classifier: self.classifier.kind(),
            trees: self.classifier.estimators(),
            classes: self.classifier.n_classes(),
            features: self.feature_names.len(),
            skills_vocabulary: self.encoders.skills.len(),
            interests_vocabulary: self.encoders.interests.len(),
            education_levels: self.encoders.education.classes().to_vec(),
            catalog_careers: self.catalog.len(),
            loaded_at: self.loaded_at,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadOutcome {
    pub reloaded: bool,
    pub loaded_at: DateTime<Utc>,
}

/// Holds the bundle currently serving requests.
pub struct ArtifactStore {
    paths: ArtifactPaths,
    current: RwLock<Arc<ModelBundle>>,
}

impl ArtifactStore {
    /// Loads the initial bundle; startup fails if any model artifact is unusable.
    pub fn open(paths: ArtifactPaths) -> Result<Self, AppError> {
        let bundle = ModelBundle::load(&paths)?;
        Ok(Self::with_bundle(paths, bundle))
    }

    pub fn with_bundle(paths: ArtifactPaths, bundle: ModelBundle) -> Self {
        Self {
            paths,
            current: RwLock::new(Arc::new(bundle)),
        }
    }

    pub fn current(&self) -> Arc<ModelBundle> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Reloads from disk if the artifact files changed since the current bundle was built.
    pub async fn reload(&self) -> Result<ReloadOutcome, AppError> {
        let current = self.current();

        let paths = self.paths.clone();
        let probed = tokio::task::spawn_blocking(move || ArtifactVersion::probe(&paths))
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .map_err(|e| AppError::ArtifactLoad(format!("{e:#}")))?;

        if probed == current.version {
            info!("Model artifacts unchanged, keeping bundle from {}", current.loaded_at);
            return Ok(ReloadOutcome {
                reloaded: false,
                loaded_at: current.loaded_at,
            });
        }

        let paths = self.paths.clone();
        let bundle = tokio::task::spawn_blocking(move || ModelBundle::load(&paths))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        let loaded_at = bundle.loaded_at;

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(bundle);
        info!("Model bundle reloaded at {loaded_at}");

        Ok(ReloadOutcome {
            reloaded: true,
            loaded_at,
        })
    }
}
