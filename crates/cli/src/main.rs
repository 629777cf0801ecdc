use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scene_renamer_core::{
    app_paths, build_list_from_entries, clean_format, load_build_list, load_config, plan_renames,
    rename_batch, save_build_list, save_config, FsAssetStore, NameScheme, RenamePlan, SceneEntry,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "scene-renamer-cli")]
#[command(about = "ビルドリストのシーンを連番で一括リネームします")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Reorder(ReorderArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Set(ConfigSetArgs),
}

#[derive(Debug, Args)]
struct ConfigSetArgs {
    #[arg(long)]
    base_name: Option<String>,
    #[arg(long)]
    format: Option<String>,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(long)]
    build_list: PathBuf,
    #[arg(long)]
    base_name: Option<String>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    skip: Vec<usize>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct ReorderArgs {
    #[arg(long)]
    build_list: PathBuf,
    #[arg(long)]
    from: usize,
    #[arg(long)]
    to: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Reorder(args) => cmd_reorder(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Set(args) => cmd_config_set(args),
        },
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;
    let scheme = NameScheme::new(
        args.base_name.unwrap_or(config.base_name),
        args.format.as_deref().unwrap_or(&config.format),
    );

    let list = load_build_list(&args.build_list)?;
    let mut scenes = list.to_scene_entries();
    for index in &args.skip {
        match index.checked_sub(1).and_then(|i| scenes.get_mut(i)) {
            Some(scene) => scene.rename = false,
            None => anyhow::bail!("--skip の番号が範囲外です: {index}"),
        }
    }

    let root = args
        .build_list
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let mut store = FsAssetStore::new(root);
    warn_unlisted_scenes(&store, &scenes);

    let plan = plan_renames(&scenes, &scheme);
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Table => print_table(&plan),
    }

    if !args.apply {
        eprintln!("dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。");
        return Ok(());
    }

    let report = rename_batch(&mut store, &mut scenes, &scheme)?;
    save_build_list(&args.build_list, &build_list_from_entries(&scenes))?;
    eprintln!(
        "適用完了: {}件 (失敗 {}件 / 対象外 {}件)",
        report.renamed, report.failed, report.skipped
    );
    Ok(())
}

fn cmd_reorder(args: ReorderArgs) -> Result<()> {
    let mut list = load_build_list(&args.build_list)?;
    let len = list.scenes.len();
    let (from, to) = match (args.from.checked_sub(1), args.to.checked_sub(1)) {
        (Some(from), Some(to)) if from < len && to < len => (from, to),
        _ => anyhow::bail!(
            "--from / --to の番号が範囲外です (シーン数: {len}、番号は1から始まります)"
        ),
    };

    let scene = list.scenes.remove(from);
    list.scenes.insert(to, scene);
    save_build_list(&args.build_list, &list)?;
    println!("並び替え完了: {} -> {}", args.from, args.to);
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_set(args: ConfigSetArgs) -> Result<()> {
    if args.base_name.is_none() && args.format.is_none() {
        anyhow::bail!("--base-name か --format のどちらかを指定してください");
    }

    let mut config = load_config()?;
    if let Some(base_name) = args.base_name {
        config.base_name = base_name;
    }
    if let Some(format) = args.format {
        config.format = clean_format(&format);
    }
    save_config(&config)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn warn_unlisted_scenes(store: &FsAssetStore, scenes: &[SceneEntry]) {
    let listed: HashSet<&str> = scenes.iter().map(|scene| scene.path.as_str()).collect();
    let extensions: HashSet<String> = scenes
        .iter()
        .filter_map(|scene| {
            Path::new(&scene.path)
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        })
        .collect();

    for extension in &extensions {
        for path in store.assets_with_extension(extension) {
            if !listed.contains(path.as_str()) {
                log::warn!("ビルドリストに載っていないシーンです: {path}");
            }
        }
    }
}

fn print_table(plan: &RenamePlan) {
    println!("現在名 -> 新しい名前");
    for entry in &plan.entries {
        match &entry.new_name {
            Some(new_name) => println!(
                "{} -> {} ({})",
                entry.current_name, new_name, entry.path
            ),
            None => println!("{} (対象外)", entry.current_name),
        }
    }

    let renamed = plan
        .entries
        .iter()
        .filter(|entry| entry.new_name.is_some())
        .count();
    println!(
        "\n集計: scenes={} rename={} skip={}",
        plan.entries.len(),
        renamed,
        plan.entries.len() - renamed
    );
}
