mod build_list;
mod config;
mod format;
mod renamer;
mod store;

pub const DEFAULT_BASE_NAME: &str = "Scene";
pub const DEFAULT_FORMAT: &str = "000";

pub use build_list::{
    build_list_from_entries, load_build_list, save_build_list, BuildList, BuildListEntry,
};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use format::{clean_format, render_suffix, NameScheme};
pub use renamer::{
    plan_renames, rename_batch, PlannedRename, RenamePlan, RenameReport, SceneEntry, TEMP_PREFIX,
};
pub use store::{AssetId, AssetStore, FsAssetStore, StoreError};
