//! Symlink placement into the ComfyUI model tree

use comfylet_core::{ComfyletResult, ModelKind, ModelPlacement};
use std::path::Path;
use tracing::{debug, info};

/// Create the directories ComfyUI reads models from, if absent
pub async fn ensure_model_dirs(models_root: &Path) -> ComfyletResult<()> {
    for kind in [ModelKind::Diffusion, ModelKind::Lora] {
        let dir = models_root.join(kind.dir_name());
        if !dir.exists() {
            tokio::fs::create_dir_all(&dir).await?;
            info!(path = %dir.display(), "Created model directory");
        }
    }
    Ok(())
}

/// Link a cached weight file into place, replacing any existing link
///
/// Replacement is remove-then-link: concurrent provisioning runs sharing
/// the cache volume are last-writer-wins.
pub async fn link_into_place(
    placement: &ModelPlacement,
    models_root: &Path,
    cached: &Path,
) -> ComfyletResult<()> {
    let target = placement.target_path(models_root);

    if tokio::fs::symlink_metadata(&target).await.is_ok() {
        tokio::fs::remove_file(&target).await?;
    }
    tokio::fs::symlink(cached, &target).await?;

    debug!(
        link = %target.display(),
        target = %cached.display(),
        "Linked weight file"
    );

    Ok(())
}
