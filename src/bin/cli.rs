//! GovtJobs CLI
//!
//! Terminal front-end over the notice client core.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use govtjobs::{
    FeedMode, Session, Tab,
    api::{HttpNoticeApi, NoticeApi},
    error::{AppError, Result},
    feed::{
        Column, ENGINEERING_BRANCHES, FeedReconciler, FeedSnapshot, FeedStatus, FilterState,
        LoadOutcome, Period, SortBy,
    },
    models::{Config, Notice, NoticeId, RegionKind, search_regions},
    state::BookmarkStore,
    storage::{KeyValueStore, LocalStore},
};

/// GovtJobs - Indian government job notices
#[derive(Parser, Debug)]
#[command(name = "govtjobs", version, about = "Government job notices client")]
struct Cli {
    /// Directory holding config.toml and saved state
    #[arg(short, long, default_value = ".govtjobs")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,

    /// Show the Jobs view: home state + Central, or the aggregated feed
    Feed {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Query the aggregated feed with filters
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long = "type")]
        notice_type: Option<String>,
        /// all, today or this_week
        #[arg(long)]
        period: Option<String>,
        /// newest, deadline or fetched
        #[arg(long)]
        sort: Option<String>,
        /// Only show notices flagged new
        #[arg(long)]
        new_only: bool,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Engineering notices by branch
    Engineering {
        /// Branch code, e.g. CSE or CIVIL
        #[arg(long)]
        branch: Option<String>,
        #[arg(long = "type")]
        notice_type: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List states, from the backend or the local catalogue with --search
    States {
        #[arg(long)]
        search: Option<String>,
    },

    /// Choose a home state, or skip to the aggregated feed
    Onboard {
        state: Option<String>,
        #[arg(long, conflicts_with = "state")]
        skip: bool,
    },

    /// Forget the home state so onboarding shows again
    ResetState,

    /// Toggle the bookmark on a notice
    Save { id: String },

    /// List bookmarked notices
    Saved,

    /// Ask the backend to re-ingest its sources
    Refresh,

    /// Show the number of new notices
    NewCount,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_notices(notices: &[Notice], template: &str, bookmarks: &BookmarkStore) {
    for notice in notices {
        let marker = if bookmarks.is_saved(&notice.id) { "*" } else { " " };
        println!("{} {}", marker, notice.format(template));
    }
}

fn print_snapshot(title: &str, snapshot: &FeedSnapshot, template: &str, bookmarks: &BookmarkStore) {
    println!(
        "== {} ({} of {} notices, page {}/{}) ==",
        title,
        snapshot.notices.len(),
        snapshot.total_elements,
        snapshot.page + 1,
        snapshot.total_pages.max(1)
    );
    match (&snapshot.status, &snapshot.error) {
        (FeedStatus::Error, Some(error)) => println!("! {}", error),
        _ if snapshot.is_empty_result() => println!("No notices found."),
        _ => print_notices(&snapshot.notices, template, bookmarks),
    }
}

/// Load up to `pages - 1` further pages, stopping at the last one.
async fn continue_pages(feed: &FeedReconciler, pages: u32) -> Result<()> {
    for _ in 1..pages {
        if feed.request_next_page().await? == LoadOutcome::Skipped {
            break;
        }
    }
    Ok(())
}

fn parse_or_default<T: std::str::FromStr<Err = AppError> + Default>(
    value: Option<String>,
) -> Result<T> {
    value.as_deref().map(str::parse).transpose().map(Option::unwrap_or_default)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.data_dir.join("config.toml");

    if let Command::Init { force } = &cli.command {
        if config_path.exists() && !force {
            log::warn!(
                "Config already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
            return Ok(());
        }
        Config::default().save(&config_path)?;
        log::info!("Config written to {}", config_path.display());
        return Ok(());
    }

    let config = Config::load_or_default(&config_path).with_env_overrides();
    log::debug!("Using API at {}", config.api.base_url);

    let api: Arc<dyn NoticeApi> = Arc::new(HttpNoticeApi::new(&config.api)?);
    let store: Arc<dyn KeyValueStore> = Arc::new(LocalStore::new(&cli.data_dir));
    let template = config.output.notice_template.clone();

    match cli.command {
        Command::Init { .. } => {}

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }

        Command::Feed { pages } => {
            let mut session = Session::new(api, store, &config);
            session.start().await?;
            match session.mode() {
                FeedMode::Onboarding => {
                    println!("No home state chosen yet. Run `govtjobs onboard <STATE>` or `govtjobs onboard --skip`.");
                }
                FeedMode::Dual => {
                    if let Some(dual) = session.dual() {
                        for column in [Column::State, Column::Central] {
                            continue_pages(dual.column(column), pages).await?;
                        }
                        println!("{}", session.headline());
                        for column in [Column::State, Column::Central] {
                            let feed = dual.column(column);
                            print_snapshot(feed.label(), &feed.snapshot(), &template, session.bookmarks());
                        }
                    }
                }
                FeedMode::Aggregated => {
                    continue_pages(session.feed(), pages).await?;
                    println!("{}", session.headline());
                    if let Some(count) = session.refresher().new_count().filter(|c| *c > 0) {
                        println!("{} new", count);
                    }
                    print_snapshot("All notices", &session.feed().snapshot(), &template, session.bookmarks());
                }
            }
        }

        Command::List {
            category,
            state,
            notice_type,
            period,
            sort,
            new_only,
            pages,
        } => {
            let filters = FilterState {
                category,
                state,
                notice_type,
                period: parse_or_default::<Period>(period)?,
                sort_by: parse_or_default::<SortBy>(sort)?,
                show_new_only: new_only,
                ..FilterState::with_size(config.feed.page_size)
            };
            let bookmarks = BookmarkStore::load(store);
            let feed = FeedReconciler::new("all", api, filters.clone());
            feed.load(&filters, 0, true).await?;
            continue_pages(&feed, pages).await?;
            print_snapshot("Notices", &feed.snapshot(), &template, &bookmarks);
        }

        Command::Engineering {
            branch,
            notice_type,
            pages,
        } => {
            if let Some(code) = branch.as_deref() {
                if govtjobs::feed::branch_label(code).is_none() {
                    let known: Vec<&str> = ENGINEERING_BRANCHES.iter().map(|(c, _)| *c).collect();
                    log::warn!("Unknown branch '{}'; known: {}", code, known.join(", "));
                }
            }
            let mut session = Session::new(api, store, &config);
            // A loaded feed makes the tab switch skip its own first load.
            session
                .engineering_mut()
                .select(branch.as_deref(), notice_type.as_deref())
                .await?;
            session.select_tab(Tab::Engineering).await?;
            continue_pages(session.engineering().feed(), pages).await?;
            println!("{}", session.headline());
            print_snapshot(
                "Engineering",
                &session.engineering().feed().snapshot(),
                &template,
                session.bookmarks(),
            );
        }

        Command::States { search } => match search {
            Some(query) => {
                for region in search_regions(&query) {
                    let kind = match region.kind {
                        RegionKind::State => "state",
                        RegionKind::UnionTerritory => "union territory",
                    };
                    println!("{} ({})", region.name, kind);
                }
            }
            None => {
                let mut session = Session::new(api, store, &config);
                session.start().await?;
                for state in session.states() {
                    println!("{}", state);
                }
            }
        },

        Command::Onboard { state, skip } => {
            if state.is_none() && !skip {
                return Err(AppError::validation("pass a state name or --skip"));
            }
            let mut session = Session::new(api, store, &config);
            session.complete_onboarding(state.as_deref()).await?;
            match session.onboarding().selected_state() {
                Some(state) => log::info!("Home state set to {}", state),
                None => log::info!("Onboarding skipped; showing all notices"),
            }
        }

        Command::ResetState => {
            let mut session = Session::new(api, store, &config);
            session.reset_onboarding()?;
            log::info!("Home state cleared");
        }

        Command::Save { id } => {
            let id = NoticeId::new(id);
            let mut session = Session::new(api.clone(), store, &config);
            let notice = match session
                .bookmarks()
                .saved_notices()
                .iter()
                .find(|n| n.id == id)
            {
                Some(saved) => saved.clone(),
                None => api.fetch_notice(&id).await?,
            };
            if session.toggle_save(&notice)? {
                log::info!("Saved: {}", notice.title);
            } else {
                log::info!("Removed: {}", notice.title);
            }
        }

        Command::Saved => {
            let mut session = Session::new(api, store, &config);
            session.select_tab(Tab::Saved).await?;
            println!("{}", session.headline());
            if session.bookmarks().is_empty() {
                println!("No saved notices.");
            }
            print_notices(session.bookmarks().saved_notices(), &template, session.bookmarks());
        }

        Command::Refresh => {
            let session = Session::new(api, store, &config);
            let result = session.refresh().await;
            if let Some(toast) = session.refresher().toast() {
                println!("{}", toast.message);
            }
            result?;
        }

        Command::NewCount => {
            let session = Session::new(api, store, &config);
            let count = session.refresher().sync_new_count().await?;
            println!("{}", count);
        }
    }

    Ok(())
}
