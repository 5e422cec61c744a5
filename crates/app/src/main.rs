mod args;
mod play;

use std::sync::Arc;

use args::{Args, Command, prepare_sqlite_file, print_usage};
use services::{ApiConfig, AppServices};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wordbottle_core::IdentityPolicy;
use wordbottle_core::model::TimerRules;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let rules = parsed
        .initial_secs
        .map_or_else(TimerRules::default, |secs| {
            TimerRules::default().with_initial_secs(secs)
        });
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        ApiConfig::from_env()?,
        rules,
        Arc::new(parsed.scoring),
    )
    .await?;

    let identity = if parsed.demo {
        IdentityPolicy::demo()
    } else {
        IdentityPolicy::Require
    };

    match cmd {
        Command::Play => {
            let user = identity.resolve(parsed.user_id)?;
            play::play(&services, user).await
        }
        Command::Profile => {
            let user = identity.resolve(parsed.user_id)?;
            let view = services.profiles().load_welcome(user).await?;
            play::print_welcome(&view);
            Ok(())
        }
        Command::Prefs => {
            let prefs = services.preferences();
            if let Some(sound) = parsed.prefs.sound {
                prefs.set_sound(sound).await?;
            }
            if let Some(swap) = parsed.prefs.swap {
                prefs.set_direction_swap(swap).await?;
            }
            let current = prefs.load().await?;
            println!("sound: {}", on_off(current.sound_enabled));
            println!("swap:  {}", on_off(current.direction_swapped));
            Ok(())
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
