use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use discosync::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sync a collection folder into Tidal playlists
    Sync(SyncOptions),

    /// List Discogs collection folders
    Folders,

    /// Show local state: playlists, cache, recent runs
    Info(InfoOptions),

    /// Inspect or clear the release resolution cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Discogs folder ID to sync (0 = entire collection)
    #[clap(long, default_value_t = 0)]
    pub folder: u64,

    /// Target playlist name
    #[clap(long)]
    pub playlist: Option<String>,

    /// Limit the number of releases processed
    #[clap(long)]
    pub max_releases: Option<usize>,

    /// Create one playlist per release style instead of a single playlist
    #[clap(long)]
    pub by_style: bool,

    /// Re-resolve releases even when cached
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InfoOptions {
    /// Show the playlist name to id mapping
    #[clap(long)]
    playlists: bool,

    /// Show release cache statistics
    #[clap(long)]
    cache: bool,

    /// Show the N most recent sync runs
    #[clap(long)]
    runs: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    /// Clear the cache instead of listing it
    #[clap(long)]
    clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Sync(opt) => {
            cli::sync(
                opt.folder,
                opt.playlist,
                opt.max_releases,
                opt.by_style,
                opt.force,
            )
            .await
        }
        Command::Folders => cli::folders().await,
        Command::Info(opt) => cli::info(opt.playlists, opt.cache, opt.runs).await,
        Command::Cache(opt) => cli::cache(opt.clear).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
