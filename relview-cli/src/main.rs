use anyhow::Result;
use clap::Parser;
use relview_core::{related, GlobSearch, SearchMode, SettingsManager};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "relview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect related-file resolution for a primary file")]
struct Args {
    /// The primary file to resolve related files for
    file: PathBuf,

    /// Workspace roots (for multi-root workspaces); defaults to the current directory
    #[arg(long, value_delimiter = ',')]
    workspace_roots: Option<Vec<String>>,

    /// Read settings from a specific file instead of ~/.relview/settings.toml
    #[arg(long, value_name = "PATH")]
    settings_path: Option<PathBuf>,

    /// Override the configured search mode
    #[arg(long, value_enum)]
    search_mode: Option<SearchModeArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum SearchModeArg {
    Root,
    Parent,
    Sibling,
    Custom,
}

impl From<SearchModeArg> for SearchMode {
    fn from(mode: SearchModeArg) -> Self {
        match mode {
            SearchModeArg::Root => SearchMode::Root,
            SearchModeArg::Parent => SearchMode::Parent,
            SearchModeArg::Sibling => SearchMode::Sibling,
            SearchModeArg::Custom => SearchMode::Custom,
        }
    }
}

fn canonicalize_workspace_root(root: String) -> Result<PathBuf> {
    let path = PathBuf::from(&root);
    path.canonicalize()
        .map_err(|e| anyhow::anyhow!("Failed to canonicalize workspace root {root}: {e:?}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let workspace_roots: Vec<PathBuf> = match args.workspace_roots {
        Some(roots) => roots
            .into_iter()
            .map(canonicalize_workspace_root)
            .collect::<Result<_>>()?,
        None => vec![std::env::current_dir()?],
    };

    let settings_manager = match args.settings_path {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    let mut settings = settings_manager.settings();
    if let Some(mode) = args.search_mode {
        settings.search_mode = mode.into();
    }

    let primary = args.file.canonicalize()?;
    let found = related::resolve(&primary, &settings, &workspace_roots, &GlobSearch::new())?;
    tracing::info!(primary = %primary.display(), count = found.len(), "resolved related files");

    if found.is_empty() {
        eprintln!("No related files found for {}", primary.display());
        return Ok(());
    }
    for path in found {
        println!("{}", path.display());
    }
    Ok(())
}
