use std::env;
use std::path::PathBuf;

/// Where rendered result documents are written before being mailed.
#[derive(Clone, Debug)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
}

impl ArtifactConfig {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("ARTIFACT_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("storage/artifacts")),
        }
    }
}
