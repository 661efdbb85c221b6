//! favtube - your favorite YouTube channels, latest long-form upload only
//!
//! Search channels, keep favorites, and triage a feed of their newest videos.

use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use favtube::core::feed::{attach_channel_thumbnails, filter_feed};
use favtube::core::{ApiTransport, ChannelResolver, Transport, VideoAggregator};
use favtube::error::FavtubeError;
use favtube::storage::cache::ResponseCache;
use favtube::storage::favorites::FavoritesStore;
use favtube::storage::triage::TriageStore;
use favtube::storage::config;
use favtube::types::{Config, FeedTab, TriageState};
use favtube::ui::render::{format_channel, format_video};
use favtube::utils::logging::init_logging;
use favtube::utils::paths::{ensure_app_dirs, get_cache_dir, get_user_dir};

/// Your favorite YouTube channels, latest long-form upload only.
#[derive(Parser, Debug)]
#[command(name = "favtube")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Local user whose favorites and triage state to use
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search YouTube channels
    Search {
        /// Search query
        #[arg(trailing_var_arg = true, required = true)]
        query: Vec<String>,
    },
    /// Add a channel to favorites
    Add {
        /// Channel id (UC...)
        channel_id: String,
    },
    /// Remove a channel from favorites
    Remove {
        /// Channel id (UC...)
        channel_id: String,
    },
    /// List favorite channels
    Favorites,
    /// Show the latest video of every favorite
    Feed {
        /// Which videos to show
        #[arg(short, long, value_enum, default_value = "to-watch")]
        tab: TabArg,

        /// Only show videos of this channel
        #[arg(short, long)]
        channel: Option<String>,

        /// Ignore cached results
        #[arg(short, long)]
        refresh: bool,
    },
    /// Set the triage state of a video
    Mark {
        video_id: String,
        #[arg(value_enum)]
        state: StateArg,
    },
    /// Take a video off one triage list
    Unmark {
        video_id: String,
        #[arg(value_enum)]
        list: ListArg,
    },
    /// Edit the configuration file
    Config,
    /// Clear the response cache
    ClearCache,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TabArg {
    ToWatch,
    Watched,
    Later,
    Deleted,
}

impl From<TabArg> for FeedTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::ToWatch => FeedTab::ToWatch,
            TabArg::Watched => FeedTab::Watched,
            TabArg::Later => FeedTab::Later,
            TabArg::Deleted => FeedTab::Deleted,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StateArg {
    Unwatched,
    Watched,
    Later,
    Deleted,
}

impl From<StateArg> for TriageState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Unwatched => TriageState::Unwatched,
            StateArg::Watched => TriageState::Watched,
            StateArg::Later => TriageState::Later,
            StateArg::Deleted => TriageState::Deleted,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListArg {
    Watched,
    Later,
    Deleted,
}

/// Shared services built from the config
struct App {
    config: Config,
    cache: Arc<ResponseCache>,
    user_dir: std::path::PathBuf,
}

impl App {
    fn new(config: Config, user: Option<String>) -> Self {
        let user = user.unwrap_or_else(|| config.user.clone());
        Self {
            cache: Arc::new(ResponseCache::persistent(get_cache_dir().join("responses"))),
            user_dir: get_user_dir(&user),
            config,
        }
    }

    fn transport(&self) -> favtube::Result<Arc<dyn Transport>> {
        Ok(Arc::new(ApiTransport::from_config(&self.config)?))
    }

    fn resolver(&self) -> favtube::Result<ChannelResolver> {
        Ok(
            ChannelResolver::new(self.transport()?, self.cache.clone(), self.config.search_ttl_secs)
                .with_limit(self.config.search_limit),
        )
    }

    fn aggregator(&self) -> favtube::Result<VideoAggregator> {
        Ok(VideoAggregator::new(
            self.transport()?,
            self.cache.clone(),
            self.config.feed_ttl_secs,
        ))
    }

    async fn favorites(&self) -> favtube::Result<FavoritesStore> {
        let mut store = FavoritesStore::in_dir(&self.user_dir);
        store.load().await?;
        Ok(store)
    }

    async fn triage(&self) -> favtube::Result<TriageStore> {
        let mut store = TriageStore::in_dir(&self.user_dir);
        store.load().await?;
        Ok(store)
    }
}

/// Pick the config to run `command` with
///
/// A broken config file must still open in the editor, so `config` falls
/// back to defaults; every other command fails.
fn config_for(command: &Command, loaded: favtube::Result<Config>) -> favtube::Result<Config> {
    match (loaded, command) {
        (Ok(config), _) => Ok(config),
        (Err(e), Command::Config) => {
            eprintln!("{} {}", "Warning:".yellow(), e);
            Ok(Config::default())
        }
        (Err(e), _) => Err(e),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    ensure_app_dirs().await?;

    let config = config_for(&cli.command, config::load_config().await)?;
    let app = App::new(config, cli.user);

    match cli.command {
        Command::Search { query } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                return Err(FavtubeError::InvalidInput("Search query cannot be empty".into()).into());
            }

            println!("{}", "Searching...".dimmed());
            let outcome = app.resolver()?.search_with_report(&query).await?;
            if outcome.channels.is_empty() {
                println!("{}", "No channels found.".yellow());
            }
            if let Some(report) = outcome.report.filter(|r| r.is_degraded()) {
                eprintln!(
                    "{} only {}/{} results could be read",
                    "Warning:".yellow(),
                    report.valid,
                    report.total
                );
            }
            for channel in &outcome.channels {
                println!("{}", format_channel(channel));
            }
        }

        Command::Add { channel_id } => {
            let channel = app
                .resolver()?
                .channel_details(&channel_id)
                .await
                .ok_or_else(|| FavtubeError::NotFound(format!("channel {}", channel_id)))?;

            let mut favorites = app.favorites().await?;
            println!("{} {}", "Added:".green(), channel.title);
            favorites.add(channel).await?;
        }

        Command::Remove { channel_id } => {
            let mut favorites = app.favorites().await?;
            if favorites.remove(&channel_id).await? {
                println!("{} {}", "Removed:".green(), channel_id);
            } else {
                println!("{} {} is not a favorite", "Note:".yellow(), channel_id);
            }
        }

        Command::Favorites => {
            let favorites = app.favorites().await?;
            if favorites.list().is_empty() {
                println!("{}", "No favorites yet. Try `favtube search`.".yellow());
            }
            for channel in favorites.list() {
                println!("{}", format_channel(channel));
            }
        }

        Command::Feed { tab, channel, refresh } => {
            let favorites = app.favorites().await?;
            if favorites.list().is_empty() {
                println!("{}", "No favorites yet. Try `favtube search`.".yellow());
                return Ok(());
            }

            let aggregator = app.aggregator()?;
            if refresh {
                aggregator.invalidate(&favorites.ids()).await?;
            }

            let videos = aggregator.latest_videos(&favorites.ids()).await?;
            let videos = attach_channel_thumbnails(videos, favorites.list());
            let triage = app.triage().await?;

            let shown = filter_feed(&videos, triage.lists(), tab.into(), channel.as_deref());
            if shown.is_empty() {
                println!("{}", "No videos here.".yellow());
            }

            let now = Utc::now();
            for video in shown {
                println!("{}", format_video(video, triage.state(&video.id), now));
            }
        }

        Command::Mark { video_id, state } => {
            let mut triage = app.triage().await?;
            triage.set(&video_id, state.into()).await?;
        }

        Command::Unmark { video_id, list } => {
            let mut triage = app.triage().await?;
            match list {
                ListArg::Watched => triage.unmark_watched(&video_id).await?,
                ListArg::Later => triage.unmark_later(&video_id).await?,
                ListArg::Deleted => triage.restore_deleted(&video_id).await?,
            }
        }

        Command::ClearCache => {
            app.cache.clear().await?;
            println!("{}", "Cache cleared.".green());
        }

        Command::Config => {
            config::edit_config(&app.config.editor).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red(), e);
        let code = e
            .downcast_ref::<FavtubeError>()
            .map(|e| e.code().exit_code())
            .unwrap_or(1);
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken() -> favtube::Result<Config> {
        Err(FavtubeError::InvalidConfig("config.json: expected value".into()))
    }

    #[test]
    fn test_config_command_survives_broken_file() {
        let config = config_for(&Command::Config, broken()).unwrap();
        assert_eq!(config.editor, Config::default().editor);
    }

    #[test]
    fn test_other_commands_reject_broken_file() {
        let err = config_for(&Command::Favorites, broken()).unwrap_err();
        assert!(matches!(err, FavtubeError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_parses_feed_refresh() {
        let cli = Cli::try_parse_from(["favtube", "feed", "--refresh", "-t", "later"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Feed { refresh: true, tab: TabArg::Later, channel: None }
        ));
    }
}
