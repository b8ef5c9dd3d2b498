// src/main.rs
//
// GameShelf command-line host

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc;

use gameshelf::commands;
use gameshelf::dto::{CreateGameDto, GameDto, SetSaleDto, UpdateGameDto};
use gameshelf::{
    open_database, AppState, CatalogConfig, GameFilter, GameId, GameSort, LocalNotificationBackend,
    ReminderPayload, ReminderResponse,
};

#[derive(Parser)]
#[command(name = "gameshelf")]
#[command(about = "GameShelf - a local video game catalog with sale and release reminders", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog database file (defaults to $GAMESHELF_DB or the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a game to the catalog
    Add {
        title: String,
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        price: f64,
        /// Release date (YYYY-MM-DD)
        #[arg(short, long)]
        release: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// low, medium or high
        #[arg(long)]
        rating: Option<String>,
        /// Remind me the day before release
        #[arg(long)]
        notify: bool,
        #[arg(long)]
        wishlist: bool,
    },

    /// List all games
    List {
        /// date-desc, date-asc, price-desc, price-asc, title-asc, rating-desc, release-asc
        #[arg(long, default_value = "date-desc")]
        sort: GameSort,
    },

    /// Show one game (clears its NEW badge)
    Show { id: GameId },

    /// Case-insensitive search in titles and descriptions
    Search { text: String },

    /// all, wishlist, new, sale, upcoming or sold
    Filter { filter: GameFilter },

    /// Catalog statistics
    Stats {
        /// Also show database file information
        #[arg(long)]
        db_info: bool,
    },

    /// Put a game on sale
    Sale {
        id: GameId,
        /// Discount in percent (0-100)
        percent: u32,
        /// First day the sale no longer applies (YYYY-MM-DD)
        until: String,
    },

    /// End a sale and restore the original price
    Unsale { id: GameId },

    ToggleSold { id: GameId },

    ToggleWishlist { id: GameId },

    /// Change fields of a game; an empty description or image clears it
    Update {
        id: GameId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        release: Option<String>,
        #[arg(long)]
        rating: Option<String>,
        #[arg(long)]
        notify: Option<bool>,
    },

    Delete { id: GameId },

    /// Delete every game and cancel every reminder
    Clear {
        #[arg(long)]
        yes: bool,
    },

    /// List scheduled reminders
    Reminders {
        /// Recompute wishlist, stats and new-games reminders first
        #[arg(long)]
        refresh: bool,
    },

    /// Fire every reminder that is due now
    Deliver {
        /// Respond to each delivered reminder with this action
        #[arg(long)]
        action: Option<String>,
    },

    /// Respond to a reminder as if its action button was pressed
    Respond {
        action: String,
        /// Reminder payload as JSON
        #[arg(long)]
        payload: Option<String>,
    },

    /// Send a notification immediately
    TestNotify,

    /// Write a JSON backup of the catalog
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gameshelf=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = CatalogConfig::from_env()?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    let pool = open_database(&config)?;
    let backend = Arc::new(LocalNotificationBackend::new(pool.clone()));
    let state = AppState::build(pool, backend.clone(), &config)?;

    run(cli.command, &state, &backend).await
}

async fn run(command: Commands, state: &AppState, backend: &LocalNotificationBackend) -> Result<()> {
    match command {
        Commands::Add {
            title,
            category,
            price,
            release,
            description,
            image,
            rating,
            notify,
            wishlist,
        } => {
            let dto = CreateGameDto {
                title,
                price,
                description,
                category,
                image,
                release_date: release,
                rating,
                notify_on_release: notify,
                is_wishlist: wishlist,
            };
            print_json(&commands::create_game(state, dto).await?)
        }

        Commands::List { sort } => print_games(&commands::list_games(state, sort).await?),

        Commands::Show { id } => print_json(&commands::open_game(state, id).await?),

        Commands::Search { text } => print_games(&commands::search_games(state, text).await?),

        Commands::Filter { filter } => print_games(&commands::filter_games(state, filter).await?),

        Commands::Stats { db_info } => {
            print_json(&commands::get_statistics(state).await?)?;
            if db_info {
                print_json(&commands::get_database_info(state).await?)?;
            }
            Ok(())
        }

        Commands::Sale { id, percent, until } => {
            let dto = SetSaleDto {
                game_id: id,
                discount_percent: percent,
                sale_end_date: until,
            };
            print_json(&commands::set_sale(state, dto).await?)
        }

        Commands::Unsale { id } => print_json(&commands::remove_sale(state, id).await?),

        Commands::ToggleSold { id } => print_json(&commands::toggle_sold(state, id).await?),

        Commands::ToggleWishlist { id } => {
            print_json(&commands::toggle_wishlist(state, id).await?)
        }

        Commands::Update {
            id,
            title,
            price,
            description,
            category,
            image,
            release,
            rating,
            notify,
        } => {
            let dto = UpdateGameDto {
                title,
                price,
                description,
                category,
                image,
                release_date: release,
                rating,
                notify_on_release: notify,
                ..UpdateGameDto::default()
            };
            print_json(&commands::update_game(state, id, dto).await?)
        }

        Commands::Delete { id } => {
            commands::delete_game(state, id).await?;
            println!("Deleted game {}", id);
            Ok(())
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete every game without --yes");
            }
            let removed = commands::clear_catalog(state).await?;
            println!("Removed {} games", removed);
            Ok(())
        }

        Commands::Reminders { refresh } => {
            if refresh {
                let scheduled = commands::refresh_reminders(state).await?;
                println!("Scheduled {} periodic reminders", scheduled);
            }
            print_json(&commands::list_reminders(state).await?)
        }

        Commands::Deliver { action } => deliver(state, backend, action).await,

        Commands::Respond { action, payload } => {
            let payload = payload
                .map(|json| serde_json::from_str::<ReminderPayload>(&json))
                .transpose()
                .context("Invalid reminder payload")?;
            print_json(&commands::respond_to_reminder(state, action, payload).await?)
        }

        Commands::TestNotify => {
            commands::send_test_notification(state).await?;
            println!("Notification sent");
            Ok(())
        }

        Commands::Export { output } => {
            let json = commands::export_catalog(state).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported catalog to {}", path.display());
                }
                None => println!("{}", json),
            }
            Ok(())
        }
    }
}

/// Fire due reminders, then route the chosen action for each through the
/// action router.
async fn deliver(
    state: &AppState,
    backend: &LocalNotificationBackend,
    action: Option<String>,
) -> Result<()> {
    let delivered = backend.deliver_due(state.now()).await?;
    if delivered.is_empty() {
        println!("No reminders due");
        return Ok(());
    }

    let (tx, rx) = mpsc::channel(delivered.len());
    for reminder in &delivered {
        println!("{}: {}", reminder.title, reminder.body);
        state.action_router.on_notice(reminder);

        if let Some(action) = &action {
            tx.send(ReminderResponse::new(action.clone(), reminder.payload.clone()))
                .await
                .context("Action router stopped")?;
        }
    }
    drop(tx);

    let handled = state.action_router.run(rx).await;
    if handled > 0 {
        println!("Handled {} responses", handled);
    }
    Ok(())
}

fn print_games(games: &[GameDto]) -> Result<()> {
    if games.is_empty() {
        println!("No games");
        return Ok(());
    }
    for game in games {
        let badge = game
            .status_badge
            .as_deref()
            .map(|b| format!(" [{}]", b))
            .unwrap_or_default();
        println!(
            "#{:<4} {:<32} {:>8.2}  {}  {}{}",
            game.id, game.title, game.final_price, game.category, game.release_date, badge
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
