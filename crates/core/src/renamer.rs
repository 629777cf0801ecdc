use crate::format::NameScheme;
use crate::store::{AssetStore, StoreError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TEMP_PREFIX: &str = "TEMP_SCENE_RENAMER_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntry {
    pub path: String,
    pub name: String,
    pub rename: bool,
    pub enabled: bool,
}

impl SceneEntry {
    pub fn from_path(path: impl Into<String>, enabled: bool) -> Self {
        let path = path.into();
        let name = file_stem_of(&path);
        Self {
            path,
            name,
            rename: true,
            enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRename {
    pub path: String,
    pub current_name: String,
    pub new_name: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub base_name: String,
    pub format: String,
    pub entries: Vec<PlannedRename>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RenameReport {
    pub renamed: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub fn plan_renames(scenes: &[SceneEntry], scheme: &NameScheme) -> RenamePlan {
    let mut index = 0u32;
    let entries = scenes
        .iter()
        .map(|scene| {
            let new_name = if scene.rename {
                index += 1;
                Some(scheme.render(index))
            } else {
                None
            };
            PlannedRename {
                path: scene.path.clone(),
                current_name: scene.name.clone(),
                new_name,
                enabled: scene.enabled,
            }
        })
        .collect();

    RenamePlan {
        base_name: scheme.base().to_string(),
        format: scheme.format().to_string(),
        entries,
    }
}

pub fn rename_batch(
    store: &mut dyn AssetStore,
    scenes: &mut [SceneEntry],
    scheme: &NameScheme,
) -> Result<RenameReport> {
    store
        .refresh()
        .context("アセットストアの更新に失敗しました")?;

    let mut report = RenameReport {
        skipped: scenes.iter().filter(|scene| !scene.rename).count(),
        ..RenameReport::default()
    };

    // pass 1 moves every target into the temp namespace, pass 2 assigns
    // the final names; temp names can never collide with real scene names
    for temp in [true, false] {
        let mut index = 0u32;
        for scene in scenes.iter_mut() {
            if !scene.rename {
                continue;
            }
            index += 1;
            let new_name = scene_name(scheme, index, temp);
            match rename_scene(store, scene, &new_name) {
                Ok(()) => {
                    if !temp {
                        report.renamed += 1;
                    }
                }
                Err(err) => {
                    log::error!(
                        "リネームに失敗しました: {} -> {new_name} ({err})",
                        scene.path
                    );
                    if !temp {
                        report.failed += 1;
                    }
                }
            }
        }
    }

    store
        .persist()
        .context("アセットストアの保存に失敗しました")?;

    Ok(report)
}

fn scene_name(scheme: &NameScheme, index: u32, temp: bool) -> String {
    if temp {
        format!("{TEMP_PREFIX}{}", scheme.render(index))
    } else {
        scheme.render(index)
    }
}

fn rename_scene(
    store: &mut dyn AssetStore,
    scene: &mut SceneEntry,
    new_name: &str,
) -> Result<(), StoreError> {
    let id = store.path_to_id(&scene.path)?;
    store.rename_asset(&scene.path, new_name)?;
    scene.path = store.id_to_path(&id)?;
    scene.name = new_name.to_string();
    Ok(())
}

fn file_stem_of(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
