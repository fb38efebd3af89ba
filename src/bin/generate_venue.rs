use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_map::generator::{generate_venue, GeneratorConfig, GENERATED_VENUE_FILE};

#[derive(Parser)]
#[command(name = "generate_venue", version, about = "Generate or delete the large test venue")]
struct Cli {
    /// Каталог с документами зала
    #[arg(long, env = "VENUE_DIR", default_value = "public")]
    venue_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Сгенерировать venue-generated.json
    Generate {
        #[arg(long, default_value_t = 15_000)]
        seats: usize,
        #[arg(long, default_value_t = 50)]
        rows_per_section: u32,
    },
    /// Удалить venue-generated.json
    Delete,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "generate_venue=info,seat_map=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let path = cli.venue_dir.join(GENERATED_VENUE_FILE);

    match cli.command {
        Command::Generate { seats, rows_per_section } => {
            let config = GeneratorConfig {
                target_seats: seats,
                rows_per_section,
                ..GeneratorConfig::default()
            };
            info!("Generating venue with ~{} seats...", seats);
            let venue = generate_venue(&config, &mut rand::thread_rng());

            std::fs::create_dir_all(&cli.venue_dir)?;
            std::fs::write(&path, serde_json::to_string_pretty(&venue)?)?;

            let rows: usize = venue.sections.iter().map(|s| s.rows.len()).sum();
            info!(
                "Generated {} seats across {} sections ({} rows)",
                venue.seat_count(),
                venue.sections.len(),
                rows
            );
            if let Some(map) = &venue.map {
                info!("Map dimensions: {} x {}", map.width, map.height);
            }
            info!("Venue data saved to: {}", path.display());
        }
        Command::Delete => match std::fs::remove_file(&path) {
            Ok(()) => info!("Deleted {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} does not exist", path.display())
            }
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}
