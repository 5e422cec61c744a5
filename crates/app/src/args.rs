use std::fmt;

use wordbottle_core::ScoringRule;
use wordbottle_core::model::UserId;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidScoring { raw: String },
    InvalidTime { raw: String },
    InvalidToggle { name: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidScoring { raw } => {
                write!(f, "invalid --scoring value (plain, doubled, fifth-bonus): {raw}")
            }
            ArgsError::InvalidTime { raw } => write!(f, "invalid --time value: {raw}"),
            ArgsError::InvalidToggle { name, raw } => {
                write!(f, "invalid {name} value (expected on or off): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  wordbottle play    [--user-id <id>] [--demo] [--db <sqlite_url>]");
    eprintln!("                     [--scoring <plain|doubled|fifth-bonus>] [--time <secs>]");
    eprintln!("  wordbottle profile [--user-id <id>] [--demo]");
    eprintln!("  wordbottle prefs   [sound on|off] [swap on|off] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://wordbottle.sqlite3");
    eprintln!("  --scoring fifth-bonus");
    eprintln!("  --time 20");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  WORDBOTTLE_USER_ID, WORDBOTTLE_DB_URL, WORDBOTTLE_SCORING,");
    eprintln!("  WORDBOTTLE_API_URL, WORDBOTTLE_PROFILE_API_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Profile,
    Prefs,
}

impl Command {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "profile" => Some(Self::Profile),
            "prefs" => Some(Self::Prefs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefsUpdate {
    pub sound: Option<bool>,
    pub swap: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Args {
    pub db_url: String,
    pub user_id: Option<UserId>,
    pub demo: bool,
    pub scoring: ScoringRule,
    pub initial_secs: Option<u32>,
    pub prefs: PrefsUpdate,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_toggle(name: &'static str, raw: String) -> Result<bool, ArgsError> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(ArgsError::InvalidToggle { name, raw }),
    }
}

impl Args {
    /// Parse flags after the subcommand, with environment fallbacks.
    pub fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("WORDBOTTLE_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://wordbottle.sqlite3".into(), normalize_sqlite_url);
        let mut user_id = match std::env::var("WORDBOTTLE_USER_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<UserId>()
                    .map_err(|_| ArgsError::InvalidUserId { raw })?,
            ),
            _ => None,
        };
        let mut scoring = match std::env::var("WORDBOTTLE_SCORING") {
            Ok(raw) => raw
                .parse::<ScoringRule>()
                .map_err(|_| ArgsError::InvalidScoring { raw })?,
            Err(_) => ScoringRule::default(),
        };
        let mut demo = false;
        let mut initial_secs = None;
        let mut prefs = PrefsUpdate::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user-id" => {
                    let value = require_value(args, "--user-id")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = Some(parsed);
                }
                "--demo" => demo = true,
                "--scoring" => {
                    let value = require_value(args, "--scoring")?;
                    scoring = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidScoring { raw: value.clone() })?;
                }
                "--time" => {
                    let value = require_value(args, "--time")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTime { raw: value.clone() })?;
                    initial_secs = Some(parsed);
                }
                "sound" => prefs.sound = Some(parse_toggle("sound", require_value(args, "sound")?)?),
                "swap" => prefs.swap = Some(parse_toggle("swap", require_value(args, "swap")?)?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user_id,
            demo,
            scoring,
            initial_secs,
            prefs,
        })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its directory exist; sqlx will not create them.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
