use crate::renamer::SceneEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildListEntry {
    pub path: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildList {
    #[serde(default)]
    pub scenes: Vec<BuildListEntry>,
}

impl BuildList {
    pub fn to_scene_entries(&self) -> Vec<SceneEntry> {
        self.scenes
            .iter()
            .map(|scene| SceneEntry::from_path(scene.path.clone(), scene.enabled))
            .collect()
    }
}

pub fn load_build_list(path: &Path) -> Result<BuildList> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("ビルドリストを読めませんでした: {}", path.display()))?;
    let list = toml::from_str::<BuildList>(&raw).context("ビルドリストのパースに失敗しました")?;
    Ok(list)
}

pub fn save_build_list(path: &Path, list: &BuildList) -> Result<()> {
    let body = toml::to_string_pretty(list).context("ビルドリストのシリアライズに失敗しました")?;
    fs::write(path, body)
        .with_context(|| format!("ビルドリストを書き込めませんでした: {}", path.display()))?;
    Ok(())
}

pub fn build_list_from_entries(entries: &[SceneEntry]) -> BuildList {
    BuildList {
        scenes: entries
            .iter()
            .map(|entry| BuildListEntry {
                path: entry.path.clone(),
                enabled: entry.enabled,
            })
            .collect(),
    }
}
