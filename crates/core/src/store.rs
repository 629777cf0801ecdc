use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("アセットが見つかりません: {0}")]
    NotFound(String),
    #[error("同名のアセットが既に存在します: {0}")]
    NameTaken(String),
    #[error("アセット名に使えない文字が含まれています: {0}")]
    InvalidName(String),
    #[error("ファイル操作に失敗しました: {0}")]
    Io(#[from] std::io::Error),
}

pub trait AssetStore {
    fn rename_asset(&mut self, path: &str, new_name: &str) -> Result<(), StoreError>;
    fn path_to_id(&mut self, path: &str) -> Result<AssetId, StoreError>;
    fn id_to_path(&self, id: &AssetId) -> Result<String, StoreError>;
    fn refresh(&mut self) -> Result<(), StoreError>;
    fn persist(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub struct FsAssetStore {
    root: PathBuf,
    next_id: u64,
    paths_by_id: HashMap<AssetId, String>,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_id: 0,
            paths_by_id: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets_with_extension(&self, extension: &str) -> Vec<String> {
        let mut out = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let Ok(entry) = entry else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if matches {
                out.push(self.relative_string(entry.path()));
            }
        }
        out
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn relative_string(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }
}

impl AssetStore for FsAssetStore {
    fn rename_asset(&mut self, path: &str, new_name: &str) -> Result<(), StoreError> {
        if new_name.is_empty() || new_name.chars().any(is_disallowed_name_char) {
            return Err(StoreError::InvalidName(new_name.to_string()));
        }

        let source = self.absolute(path);
        if !source.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let mut file_name = new_name.to_string();
        if let Some(ext) = source.extension() {
            file_name.push('.');
            file_name.push_str(&ext.to_string_lossy());
        }
        let target = source.with_file_name(&file_name);
        if target == source {
            return Ok(());
        }
        if target.exists() {
            return Err(StoreError::NameTaken(file_name));
        }

        fs::rename(&source, &target)?;

        let renamed = self.relative_string(&target);
        for stored in self.paths_by_id.values_mut() {
            if stored.as_str() == path {
                *stored = renamed.clone();
            }
        }
        Ok(())
    }

    fn path_to_id(&mut self, path: &str) -> Result<AssetId, StoreError> {
        let known = self
            .paths_by_id
            .iter()
            .find(|(_, stored)| stored.as_str() == path)
            .map(|(id, _)| id.clone());
        if let Some(id) = known {
            return Ok(id);
        }

        if !self.absolute(path).is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        self.next_id += 1;
        let id = AssetId::new(format!("asset-{:08x}", self.next_id));
        self.paths_by_id.insert(id.clone(), path.to_string());
        Ok(id)
    }

    fn id_to_path(&self, id: &AssetId) -> Result<String, StoreError> {
        self.paths_by_id
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.as_str().to_string()))
    }

    fn refresh(&mut self) -> Result<(), StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::NotFound(
                self.root.to_string_lossy().into_owned(),
            ));
        }
        let root = &self.root;
        self.paths_by_id
            .retain(|_, stored| root.join(stored.as_str()).is_file());
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        // renames hit the filesystem as they happen; nothing is buffered
        Ok(())
    }
}

fn is_disallowed_name_char(ch: char) -> bool {
    matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || ch.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dirs must be creatable");
        }
        File::create(path).expect("file must be creatable");
    }

    #[test]
    fn rename_keeps_directory_and_extension() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("Scenes/Intro.unity"));

        let mut store = FsAssetStore::new(temp.path());
        store
            .rename_asset("Scenes/Intro.unity", "Scene01")
            .expect("rename should succeed");

        assert!(temp.path().join("Scenes/Scene01.unity").is_file());
        assert!(!temp.path().join("Scenes/Intro.unity").exists());
    }

    #[test]
    fn id_survives_rename() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("Intro.unity"));

        let mut store = FsAssetStore::new(temp.path());
        let id = store.path_to_id("Intro.unity").expect("id should resolve");
        store
            .rename_asset("Intro.unity", "Scene01")
            .expect("rename should succeed");

        let path = store.id_to_path(&id).expect("id should still resolve");
        assert_eq!(path, "Scene01.unity");
    }

    #[test]
    fn rename_onto_existing_file_is_rejected() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("Intro.unity"));
        touch(&temp.path().join("Scene01.unity"));

        let mut store = FsAssetStore::new(temp.path());
        let err = store
            .rename_asset("Intro.unity", "Scene01")
            .expect_err("occupied name must be rejected");
        assert!(matches!(err, StoreError::NameTaken(_)));
        assert!(temp.path().join("Intro.unity").is_file());
    }

    #[test]
    fn rename_rejects_separator_characters() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("Intro.unity"));

        let mut store = FsAssetStore::new(temp.path());
        let err = store
            .rename_asset("Intro.unity", "nested/Scene01")
            .expect_err("separators must be rejected");
        assert!(matches!(err, StoreError::InvalidName(_)));

        let err = store
            .rename_asset("Intro.unity", "")
            .expect_err("empty name must be rejected");
        assert!(matches!(err, StoreError::InvalidName(_)));
    }

    #[test]
    fn rename_to_current_name_is_a_no_op() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("Intro.unity"));

        let mut store = FsAssetStore::new(temp.path());
        store
            .rename_asset("Intro.unity", "Intro")
            .expect("same name should be accepted");
        assert!(temp.path().join("Intro.unity").is_file());
    }

    #[test]
    fn missing_asset_is_reported() {
        let temp = tempdir().expect("tempdir");
        let mut store = FsAssetStore::new(temp.path());

        let err = store
            .rename_asset("Missing.unity", "Scene01")
            .expect_err("missing file must be reported");
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store
            .path_to_id("Missing.unity")
            .expect_err("missing file must be reported");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn refresh_drops_ids_of_deleted_files() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("Intro.unity");
        touch(&file);

        let mut store = FsAssetStore::new(temp.path());
        let id = store.path_to_id("Intro.unity").expect("id should resolve");

        fs::remove_file(&file).expect("remove file");
        store.refresh().expect("refresh should succeed");

        let err = store
            .id_to_path(&id)
            .expect_err("stale id must be dropped");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn refresh_fails_for_missing_root() {
        let temp = tempdir().expect("tempdir");
        let mut store = FsAssetStore::new(temp.path().join("gone"));
        let err = store.refresh().expect_err("missing root must be reported");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn assets_with_extension_walks_nested_directories() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("Intro.unity"));
        touch(&temp.path().join("Levels/Level1.UNITY"));
        touch(&temp.path().join("Levels/readme.txt"));

        let store = FsAssetStore::new(temp.path());
        let found = store.assets_with_extension("unity");
        assert_eq!(found, vec!["Intro.unity", "Levels/Level1.UNITY"]);
    }
}
