//! Консольный клиент карты мест: загружает зал, восстанавливает выбор,
//! подключается к ретранслятору и принимает команды со stdin.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_map::config::Config;
use seat_map::models::{SelectedSeat, Venue};
use seat_map::navigation::Direction;
use seat_map::relay::{ConnectionState, RelayClient, RelayHandle};
use seat_map::selection::SelectOutcome;
use seat_map::session::SeatMapSession;
use seat_map::storage::SelectionStore;
use seat_map::venue_client::VenueClient;
use seat_map::venue_state::VenueStore;
use seat_map::viewport::center_on;

#[derive(Parser)]
#[command(name = "seat_console", version, about = "Browse and select seats from the terminal")]
struct Cli {
    #[arg(long, env = "VENUE_BASE_URL")]
    venue_url: Option<String>,
    #[arg(long, env = "RELAY_URL")]
    relay_url: Option<String>,
    #[arg(long, env = "SELECTION_STORE_PATH")]
    selection_path: Option<std::path::PathBuf>,
    /// Не подключаться к ретранслятору
    #[arg(long)]
    offline: bool,
    /// Размер окна карты в пикселях, для расчёта прокрутки к фокусу
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

const HELP: &str = "commands: up | down | left | right | focus <id> | find <id> | select | enter | remove <id> | list | status | help | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.venue_url.clone() {
        config.client.venue_base_url = url;
    }
    if let Some(url) = cli.relay_url.clone() {
        config.client.relay_url = url;
    }
    if let Some(path) = cli.selection_path.clone() {
        config.client.selection_path = path;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let client = VenueClient::new(&config.client.venue_base_url)?;
    let venue = match load_with_manual_reload(&client, &mut lines).await? {
        Some(venue) => venue,
        None => return Ok(()),
    };
    println!(
        "{}: {} seats",
        venue.name.as_deref().unwrap_or("Venue"),
        venue.seat_count()
    );

    let store = VenueStore::new(venue);
    let relay: Option<RelayHandle> = if cli.offline {
        None
    } else {
        Some(RelayClient::from_config(&config.client).spawn(store.clone()))
    };

    let (_offline_tx, offline_rx) = watch::channel(ConnectionState::Offline);
    let mut connection = relay.as_ref().map(|r| r.state()).unwrap_or(offline_rx);
    let mut snapshots = store.subscribe();

    let mut session = SeatMapSession::new(
        store.snapshot(),
        Some(SelectionStore::new(&config.client.selection_path)),
        relay.as_ref().map(|r| r.sender()),
    );
    print_selection(&session);
    println!("{}", HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&mut session, line.trim(), &cli, *connection.borrow()) {
                    break;
                }
            }
            Ok(()) = snapshots.changed() => {
                let venue = snapshots.borrow_and_update().clone();
                session.replace_venue(venue);
            }
            Ok(()) = connection.changed() => {
                let state = *connection.borrow_and_update();
                println!("relay: {}", describe(state));
            }
        }
    }

    if let Some(relay) = relay {
        relay.shutdown().await;
    }
    Ok(())
}

// Ошибка загрузки показывается пользователю; повтор только по команде reload
async fn load_with_manual_reload<R>(
    client: &VenueClient,
    lines: &mut tokio::io::Lines<R>,
) -> anyhow::Result<Option<Venue>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    loop {
        match client.load().await {
            Ok(venue) => return Ok(Some(venue)),
            Err(e) => {
                println!("Error loading venue: {}", e);
                println!("Type `reload` to try again or `quit` to exit.");
            }
        }
        loop {
            match lines.next_line().await? {
                Some(line) if line.trim() == "reload" => break,
                Some(line) if line.trim() == "quit" => return Ok(None),
                Some(_) => println!("Type `reload` to try again or `quit` to exit."),
                None => return Ok(None),
            }
        }
    }
}

fn run_command(session: &mut SeatMapSession, line: &str, cli: &Cli, state: ConnectionState) -> bool {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "quit" | "exit" => return false,
        "help" => println!("{}", HELP),
        "status" => println!("relay: {}", describe(state)),
        "focus" => match session.focus(arg) {
            Some(_) => print_focus(session, cli),
            None => println!("Seat \"{}\" not found.", arg),
        },
        "find" => match session.search(arg) {
            Ok(Some(_)) => print_focus(session, cli),
            Ok(None) => {}
            Err(e) => println!("{}", e),
        },
        "select" => match session.focused().map(|s| s.id().to_string()) {
            Some(id) => print_outcome(&id, session.select(&id)),
            None => println!("No seat focused."),
        },
        "enter" => match session.select_focused() {
            Some(outcome) => {
                let id = session.focused().map(|s| s.id().to_string()).unwrap_or_default();
                print_outcome(&id, outcome);
            }
            None => println!("No seat focused."),
        },
        "remove" => {
            if session.remove(arg) {
                print_selection(session);
            } else {
                println!("{} is not selected.", arg);
            }
        }
        "list" => print_selection(session),
        other => match other.parse::<Direction>() {
            Ok(direction) => {
                if session.navigate(direction) {
                    print_focus(session, cli);
                }
            }
            Err(_) => println!("{}", HELP),
        },
    }
    true
}

fn print_focus(session: &SeatMapSession, cli: &Cli) {
    let Some(seat) = session.focused() else { return };
    print_seat(seat);
    if let Some((x, y)) = session.focus_position() {
        let target = center_on(x, y, cli.width, cli.height);
        println!("  scroll to ({:.0}, {:.0})", target.left, target.top);
    }
}

fn print_seat(seat: &SelectedSeat) {
    println!(
        "{}  {}, row {}, seat {}  tier {} (${})  {}",
        seat.id(),
        seat.section_label,
        seat.row_index,
        seat.seat.col,
        seat.seat.price_tier,
        seat.seat.price(),
        seat.seat.status
    );
}

fn print_outcome(id: &str, outcome: SelectOutcome) {
    match outcome {
        SelectOutcome::Added => println!("Selected {}.", id),
        SelectOutcome::Removed => println!("Removed {}.", id),
        SelectOutcome::AlreadySelected => println!("{} is already selected.", id),
        SelectOutcome::NotSelectable => println!("{} is not available.", id),
        SelectOutcome::Full => println!("Selection is full."),
    }
}

fn print_selection(session: &SeatMapSession) {
    let selection = session.selection();
    println!("Selected {}/{} seats:", selection.len(), selection.capacity());
    for seat in selection.seats() {
        print!("  ");
        print_seat(seat);
    }
    println!("Subtotal: ${}.00", selection.subtotal());
}

fn describe(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "live",
        ConnectionState::Offline => "not connected",
    }
}
