//! Command-line shell for the marquee catalog session.
//!
//! This binary is a thin shell: it parses arguments, builds a session through
//! [`marquee::connect`], turns the subcommand into [`Event`]s for
//! [`handle_event`], and prints snapshots and actions. All session rules live
//! in the library.
//!
//! # Lifecycle
//!
//! 1. **Load**: configuration, tracing, and the key-value store
//! 2. **Sign in**: restore the persisted user; `login` and `logout` manage it
//! 3. **Local commands**: `theme` and `favorites list` read the store directly
//!    and need no API key
//! 4. **Start**: `trending` and `resume` run the full bootstrap; other commands
//!    only load favorites
//! 5. **Dispatch**: run the command and print the result

use clap::{Parser, Subcommand};
use marquee::app::{Action, CatalogSession, SessionSnapshot, SessionState, ViewMode};
use marquee::domain::{DetailItem, Item, ItemPage, SessionIdentity, Theme};
use marquee::infrastructure::{image_url, DEFAULT_IMAGE_SIZE};
use marquee::storage::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceBridge};
use marquee::{connect, handle_event, initialize_auth, Authenticator, CatalogError, Config, Event, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Marquee - browse trending movies, search the catalog, and keep favorites
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(version)]
#[command(about = "Browse trending movies, search the catalog, and keep favorites", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Keep all state in memory for this run only
    #[arg(long)]
    no_persist: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override the data directory
    #[arg(long)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with a configured account
    Login { username: String, password: String },
    /// Sign out and forget the stored user
    Logout,
    /// Show who is signed in
    Whoami,
    /// Start the session and show today's trending movies
    Trending,
    /// Start the session and show the restored last search
    Resume,
    /// Search the catalog
    Search {
        /// Words to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Number of result pages to accumulate
        #[arg(long, short = 'p', default_value_t = 1)]
        pages: u32,
    },
    /// Show the full record for a movie
    Detail { id: u64 },
    /// Print the trailer URL for a movie
    Trailer { id: u64 },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },
    /// List genres
    Genres,
    /// Browse one genre
    Discover {
        genre_id: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show, set (`light`, `dark`), or `toggle` the theme
    Theme { name: Option<String> },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorites (default)
    List,
    /// Add a movie by id
    Add { id: u64 },
    /// Remove a movie by id
    Remove { id: u64 },
    /// Remove every favorite
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    if let Some(log_file) = marquee::observability::init_tracing(&config) {
        tracing::debug!(log_file = %log_file.display(), command = ?args.command, "marquee starting");
    }

    let store: Arc<dyn KeyValueStore> = if args.no_persist {
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(JsonFileStore::open(config.store_path())?)
    };

    let (persistence, mut auth) = initialize_auth(&config, store);

    match args.command {
        Command::Login { username, password } => {
            let identity = auth.login(&username, &password)?;
            println!("Signed in as {}", identity.username);
            Ok(())
        }
        Command::Logout => {
            auth.logout();
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            match auth.current() {
                Some(identity) => println!("{}", identity.username),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Command::Theme { name } => run_theme(&persistence, name.as_deref()),
        Command::Favorites {
            action: None | Some(FavoritesCommand::List),
        } => {
            signed_in(&auth)?;
            let mut state = SessionState::new(persistence);
            state.favorites.load();
            print_view(ViewMode::Favorites, &state.snapshot());
            Ok(())
        }
        command => {
            signed_in(&auth)?;
            let session = connect(&config, persistence)?;
            run_signed_in(&session, &auth, &config, command).await
        }
    }
}

fn signed_in(auth: &Authenticator) -> Result<&SessionIdentity> {
    auth.current()
        .ok_or_else(|| CatalogError::Auth("not signed in; run `marquee login <username> <password>`".to_string()))
}

/// Prints, sets, or toggles the stored theme preference.
fn run_theme(persistence: &PersistenceBridge, name: Option<&str>) -> Result<()> {
    let current = persistence.read_theme().unwrap_or_default();
    let theme = match name {
        None => current,
        Some("toggle") => current.toggled(),
        Some(name) => Theme::from_name(name)
            .ok_or_else(|| CatalogError::Config(format!("unknown theme `{name}`; use light, dark, or toggle")))?,
    };

    if theme != current {
        persistence.write_theme(theme)?;
        tracing::debug!(theme = theme.as_str(), "theme changed");
    }
    println!("{}", theme.as_str());
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut overrides = BTreeMap::new();
    if let Some(level) = &args.log_level {
        overrides.insert("trace_level".to_string(), level.clone());
    }
    if let Some(dir) = &args.data_dir {
        overrides.insert("data_dir".to_string(), dir.clone());
    }

    Ok(Config::load(args.config.as_deref())?.with_overrides(&overrides))
}

async fn run_signed_in(
    session: &CatalogSession,
    auth: &Authenticator,
    config: &Config,
    command: Command,
) -> Result<()> {
    let identity = signed_in(auth)?;

    match command {
        Command::Trending | Command::Resume => {
            let report = session.bootstrap(Some(identity)).await;
            if let Some(error) = report.as_ref().and_then(|r| r.restoration_error.as_ref()) {
                println!("(could not restore last search: {error})");
            }

            let mode = if matches!(command, Command::Trending) {
                ViewMode::Trending
            } else {
                ViewMode::Search
            };
            present(session, config, vec![Action::ShowView(mode)]);
            Ok(())
        }
        Command::Search { query, pages } => {
            session.load_favorites();
            let query = query.join(" ");
            let (_, actions) = handle_event(session, Event::Search { query, page: 1 }).await?;
            for _ in 1..pages {
                if !session.snapshot().has_more {
                    break;
                }
                session.load_more().await?;
            }
            present(session, config, actions);
            Ok(())
        }
        Command::Detail { id } => dispatch(session, config, Event::ShowDetail(id)).await,
        Command::Trailer { id } => dispatch(session, config, Event::PlayTrailer(id)).await,
        Command::Favorites { action } => {
            session.load_favorites();
            match action.unwrap_or(FavoritesCommand::List) {
                FavoritesCommand::List => {
                    present(session, config, vec![Action::ShowView(ViewMode::Favorites)]);
                    Ok(())
                }
                FavoritesCommand::Clear => dispatch(session, config, Event::ClearFavorites).await,
                FavoritesCommand::Add { id } => {
                    let detail = session.item_detail(id).await?;
                    dispatch(session, config, Event::AddFavorite(detail.item)).await
                }
                FavoritesCommand::Remove { id } => {
                    dispatch(session, config, Event::RemoveFavorite(id)).await
                }
            }
        }
        Command::Genres => dispatch(session, config, Event::ListGenres).await,
        Command::Discover { genre_id, page } => {
            session.load_favorites();
            dispatch(session, config, Event::Discover { genre_id, page }).await
        }
        Command::Login { .. } | Command::Logout | Command::Whoami | Command::Theme { .. } => Ok(()),
    }
}

async fn dispatch(session: &CatalogSession, config: &Config, event: Event) -> Result<()> {
    let (_, actions) = handle_event(session, event).await?;
    present(session, config, actions);
    Ok(())
}

fn present(session: &CatalogSession, config: &Config, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::ShowView(mode) => print_view(mode, &session.snapshot()),
            Action::ShowDetail(detail) => print_detail(&detail, config),
            Action::ShowGenres(genres) => {
                for genre in genres {
                    println!("{:>6}  {}", genre.id, genre.name);
                }
            }
            Action::ShowDiscover { genre_id, page } => print_page(session, genre_id, &page),
            Action::OpenUrl(url) => println!("{url}"),
            Action::Notify(message) => println!("{message}"),
        }
    }
}

fn print_view(mode: ViewMode, snapshot: &SessionSnapshot) {
    let items = mode.items(snapshot);
    println!("{}", mode.title());
    if mode == ViewMode::Search && !snapshot.search_query.is_empty() {
        println!(
            "\"{}\" page {} of {}",
            snapshot.search_query, snapshot.current_page, snapshot.total_pages
        );
    }
    if items.is_empty() {
        println!("  {}", mode.empty_message(snapshot));
    }
    for item in items {
        print_item(item, snapshot.is_favorite(item.id));
    }
}

fn print_item(item: &Item, favorite: bool) {
    let year = item
        .release_year()
        .map_or_else(|| "Unknown".to_string(), |year| year.to_string());
    let heart = if favorite { " ♥" } else { "" };
    println!(
        "  {:>8}  {} ({year})  ★ {}{heart}",
        item.id,
        item.title,
        item.rating_label()
    );
}

fn print_page(session: &CatalogSession, genre_id: u32, page: &ItemPage) {
    println!("Genre {genre_id}: page {} of {}", page.page, page.total_pages);
    for item in &page.results {
        print_item(item, session.is_favorite(item.id));
    }
}

fn print_detail(detail: &DetailItem, config: &Config) {
    let item = &detail.item;
    println!("{} ({})", item.title, item.release_date);
    println!("  ★ {} from {} votes", item.rating_label(), item.vote_count);
    if let Some(runtime) = detail.runtime_label() {
        println!("  {runtime}");
    }
    let genres: Vec<&str> = detail.genres().iter().map(|g| g.name.as_str()).collect();
    if !genres.is_empty() {
        println!("  {}", genres.join(", "));
    }
    println!(
        "  {}",
        image_url(&config.image_base_url, item.poster_path.as_deref(), DEFAULT_IMAGE_SIZE)
    );
    if !item.overview.is_empty() {
        println!();
        println!("{}", item.overview);
    }
    let cast: Vec<String> = detail
        .cast()
        .iter()
        .take(5)
        .map(|member| format!("{} as {}", member.name, member.character))
        .collect();
    if !cast.is_empty() {
        println!();
        println!("Cast: {}", cast.join("; "));
    }
}
