mod auth;
mod config;
mod render;
mod store;

use clap::Parser;
use knockout_core::{Advance, Bracket, Slot, round_name};
use std::path::PathBuf;

use crate::auth::Role;
use crate::store::{Store, TournamentRow};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "knockout", version, about = "Manage single-elimination tournament brackets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file at ~/.config/knockout/config.toml
    Init,
    /// Start a new tournament with a fresh bracket
    Create(CreateArgs),
    /// Show the active tournament's bracket
    Show(ShowArgs),
    /// Record a match winner and advance them
    Win(WinArgs),
    /// Clear a match result and everything that followed from it
    Reset(ResetArgs),
    /// Rename the entrant in one slot
    Rename(RenameArgs),
    /// Archive the active tournament
    Archive(ArchiveArgs),
    /// List archived tournaments and their champions
    Past(PastArgs),
}

/// Connection settings shared by every command that talks to the service.
#[derive(Parser)]
struct ConnectionArgs {
    /// Service base URL (e.g. https://your-project.supabase.co)
    #[arg(long)]
    service_url: Option<String>,

    /// Publishable anon key, sent as the apikey header
    #[arg(long)]
    service_key: Option<String>,

    /// Admin access token (also reads KNOCKOUT_ACCESS_TOKEN env var)
    #[arg(long)]
    access_token: Option<String>,

    /// Path to config file (default: ~/.config/knockout/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show requests as they are issued
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser)]
struct CreateArgs {
    /// Tournament name
    #[arg(long)]
    name: String,

    /// Number of entrants; must be a power of two (2, 4, 8, 16, ...)
    #[arg(long)]
    size: u32,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[derive(Parser)]
struct ShowArgs {
    /// Output the stored bracket JSON instead of a table
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[derive(Parser)]
struct WinArgs {
    /// Round index, 0-based
    round: usize,

    /// Match index within the round, 0-based
    #[arg(value_name = "MATCH")]
    match_index: usize,

    /// Winning slot: p1 or p2
    slot: Slot,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[derive(Parser)]
struct ResetArgs {
    /// Round index, 0-based
    round: usize,

    /// Match index within the round, 0-based
    #[arg(value_name = "MATCH")]
    match_index: usize,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[derive(Parser)]
struct RenameArgs {
    /// Round index, 0-based
    round: usize,

    /// Match index within the round, 0-based
    #[arg(value_name = "MATCH")]
    match_index: usize,

    /// Slot to relabel: p1 or p2
    slot: Slot,

    /// New entrant name
    name: String,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[derive(Parser)]
struct ArchiveArgs {
    /// Archive even though no champion has been crowned
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[derive(Parser)]
struct PastArgs {
    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    conn: ConnectionArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your service URL and anon key.");
        }
        Commands::Create(args) => run_create(args).await,
        Commands::Show(args) => run_show(args).await,
        Commands::Win(args) => run_win(args).await,
        Commands::Reset(args) => run_reset(args).await,
        Commands::Rename(args) => run_rename(args).await,
        Commands::Archive(args) => run_archive(args).await,
        Commands::Past(args) => run_past(args).await,
    }
}

/// Resolve connection settings (flags override config) and build the store.
fn open_store(conn: &ConnectionArgs) -> Store {
    let config_path = conn.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let service_url = conn.service_url.clone().or(cfg.service_url).unwrap_or_else(|| {
        bail(format!(
            "No service URL specified. Pass --service-url or set it in {}",
            config_path.display()
        ));
    });
    let service_key = conn.service_key.clone().or(cfg.service_key).unwrap_or_else(|| {
        bail(format!(
            "No service key specified. Pass --service-key or set it in {}",
            config_path.display()
        ));
    });
    let access_token = conn
        .access_token
        .clone()
        .or_else(|| std::env::var("KNOCKOUT_ACCESS_TOKEN").ok());

    Store::new(service_url, service_key, access_token, conn.verbose)
}

/// Mutating commands need an admin session before anything is fetched.
async fn require_admin(store: &Store) {
    match auth::fetch_role(store).await {
        Ok(Role::Admin) => {}
        Ok(Role::Viewer) => bail(
            "This command requires an admin session. \
             Pass --access-token or set KNOCKOUT_ACCESS_TOKEN.",
        ),
        Err(e) => bail(format!("Could not resolve the session role: {e}")),
    }
}

async fn fetch_active_or_bail(store: &Store) -> TournamentRow {
    match store.fetch_active().await {
        Ok(Some(row)) => row,
        Ok(None) => bail("No active tournament. Start one with `knockout create`."),
        Err(e) => bail(e),
    }
}

async fn run_create(args: CreateArgs) {
    let name = args.name.trim().to_string();
    if name.is_empty() {
        bail("Tournament name cannot be empty.");
    }
    let bracket = Bracket::generate(args.size).unwrap_or_else(|e| bail(e));

    let store = open_store(&args.conn);
    require_admin(&store).await;

    match store.fetch_active().await {
        Ok(Some(existing)) => bail(format!(
            "An active tournament already exists (\"{}\"). Archive it first.",
            existing.name
        )),
        Ok(None) => {}
        Err(e) => bail(e),
    }

    store
        .create(&name, args.size, &bracket)
        .await
        .unwrap_or_else(|e| bail(e));
    println!("Created tournament \"{name}\" with {} entrants.", args.size);
}

async fn run_show(args: ShowArgs) {
    let store = open_store(&args.conn);
    let row = fetch_active_or_bail(&store).await;

    if args.json {
        render::print_bracket_json(&row.data);
    } else {
        render::print_bracket(&row.name, &row.data);
    }
}

async fn run_win(args: WinArgs) {
    let store = open_store(&args.conn);
    require_admin(&store).await;
    let mut row = fetch_active_or_bail(&store).await;

    let advance = row
        .data
        .record_winner(args.round, args.match_index, args.slot)
        .unwrap_or_else(|e| bail(e));

    match advance {
        Advance::Undecided => {
            println!(
                "Both entrants of round {}, match {} must be known before a winner \
                 can be recorded. Nothing changed.",
                args.round, args.match_index
            );
        }
        Advance::NextRound { round, index, slot, name } => {
            store
                .update_data(row.id, &row.data)
                .await
                .unwrap_or_else(|e| bail(e));
            println!(
                "{name} advances to {} (match {index}, {slot}).",
                round_name(round, row.data.total_rounds(), row.data.size()),
            );
        }
        Advance::Champion { name } => {
            store
                .update_data(row.id, &row.data)
                .await
                .unwrap_or_else(|e| bail(e));
            println!("{name} is the champion!");
        }
    }
}

async fn run_reset(args: ResetArgs) {
    let store = open_store(&args.conn);
    require_admin(&store).await;
    let mut row = fetch_active_or_bail(&store).await;

    let report = row
        .data
        .reset_match(args.round, args.match_index)
        .unwrap_or_else(|e| bail(e));

    if report.winners_cleared == 0 {
        println!("That match has no recorded result. Nothing changed.");
        return;
    }

    store
        .update_data(row.id, &row.data)
        .await
        .unwrap_or_else(|e| bail(e));

    let mut parts = vec![format!("{} result(s) cleared", report.winners_cleared)];
    if report.slots_cleared > 0 {
        parts.push(format!("{} slot(s) reopened", report.slots_cleared));
    }
    if report.champion_cleared {
        parts.push("champion vacated".to_string());
    }
    println!("{}.", parts.join(", "));
}

async fn run_rename(args: RenameArgs) {
    let store = open_store(&args.conn);
    require_admin(&store).await;
    let mut row = fetch_active_or_bail(&store).await;

    row.data
        .set_entrant(args.round, args.match_index, args.slot, &args.name)
        .unwrap_or_else(|e| bail(e));

    store
        .update_data(row.id, &row.data)
        .await
        .unwrap_or_else(|e| bail(e));
    println!(
        "Renamed {} of round {}, match {} to \"{}\".",
        args.slot,
        args.round,
        args.match_index,
        args.name.trim(),
    );
}

async fn run_archive(args: ArchiveArgs) {
    let store = open_store(&args.conn);
    require_admin(&store).await;
    let row = fetch_active_or_bail(&store).await;

    if row.data.champion.is_none() && !args.force {
        bail("The bracket has no champion yet. Pass --force to archive it anyway.");
    }

    store.archive(row.id).await.unwrap_or_else(|e| bail(e));
    match row.data.champion.as_deref() {
        Some(champion) => println!("Archived \"{}\". Champion: {champion}.", row.name),
        None => println!("Archived \"{}\" without a champion.", row.name),
    }
}

async fn run_past(args: PastArgs) {
    let store = open_store(&args.conn);
    let rows = store.fetch_archived().await.unwrap_or_else(|e| bail(e));

    if args.json {
        render::print_past_json(&rows);
    } else {
        render::print_past(&rows);
    }
}
