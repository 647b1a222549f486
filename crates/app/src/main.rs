use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{ApiConfig, AppServices, Clock, ProgressService, RoadmapService};
use skills_core::model::SkillName;
use skills_core::{RoadmapSummary, derive_steps};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://dev.sqlite3";
const DEFAULT_SKILL: &str = "Rust";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSkill { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSkill { raw } => write!(f, "invalid --skill value: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    skill: SkillName,
    progress: Arc<ProgressService>,
    roadmaps: Arc<RoadmapService>,
}

impl UiApp for DesktopApp {
    fn skill(&self) -> SkillName {
        self.skill.clone()
    }

    fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    fn roadmap_service(&self) -> Arc<RoadmapService> {
        Arc::clone(&self.roadmaps)
    }
}

struct Args {
    db_url: String,
    skill: SkillName,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--skill <name>]");
    eprintln!("  cargo run -p app -- status [--db <sqlite_url>] [--skill <name>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --skill {DEFAULT_SKILL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SKILLS_DB_URL, SKILLS_SKILL");
    eprintln!("  SKILLS_API_BASE_URL, SKILLS_API_TOKEN (unset: offline, local cache only)");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Status,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("SKILLS_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut skill_raw =
            std::env::var("SKILLS_SKILL").unwrap_or_else(|_| DEFAULT_SKILL.to_owned());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--skill" => {
                    skill_raw = require_value(args, "--skill")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let skill = SkillName::new(&skill_raw)
            .map_err(|_| ArgsError::InvalidSkill { raw: skill_raw })?;
        Ok(Self { db_url, skill })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
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

    init_tracing();

    let api = ApiConfig::from_env();
    info!(
        db = %parsed.db_url,
        skill = %parsed.skill,
        online = api.is_some(),
        "starting"
    );

    // The SQLite file must exist before the pool connects.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::system(), api).await?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                skill: parsed.skill,
                progress: services.progress(),
                roadmaps: services.roadmaps(),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Skills Roadmap")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Status => print_status(&services, &parsed.skill).await,
    }
}

async fn print_status(
    services: &AppServices,
    skill: &SkillName,
) -> Result<(), Box<dyn std::error::Error>> {
    let roadmap = services.roadmaps().load(skill).await?;
    let progress = services.progress().load(skill).await?;
    let steps = derive_steps(&roadmap, &progress);
    let summary = RoadmapSummary::from_steps(&steps);

    println!("{skill}");
    for step in &steps {
        let lock = if step.accessible { "" } else { " [locked]" };
        println!(
            "{:>3}. {:<12} {}{lock}",
            step.index + 1,
            step.status.as_str(),
            step.label
        );
    }
    println!(
        "{} of {} completed ({}%), {} in progress",
        summary.completed,
        summary.total,
        summary.percent_complete(),
        summary.in_progress
    );
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_owned());
        Args::parse(&mut iter)
    }

    #[test]
    fn sqlite_urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/skills.db".into()),
            "sqlite:///tmp/skills.db"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/var/skills.db".into()),
            "sqlite:///var/skills.db"
        );
        assert!(normalize_sqlite_url("local.db".into()).ends_with("/local.db"));
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["--db", "/tmp/x.db", "--skill", "  Go  "]).unwrap();
        assert_eq!(args.db_url, "sqlite:///tmp/x.db");
        assert_eq!(args.skill.as_str(), "Go");
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(matches!(
            parse(&["--skill"]),
            Err(ArgsError::MissingValue { flag: "--skill" })
        ));
        assert!(matches!(
            parse(&["--skill", "   "]),
            Err(ArgsError::InvalidSkill { .. })
        ));
        assert!(matches!(parse(&["--db", " "]), Err(ArgsError::InvalidDbUrl { .. })));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn subcommands_parse() {
        assert_eq!(Command::from_arg("ui"), Some(Command::Ui));
        assert_eq!(Command::from_arg("status"), Some(Command::Status));
        assert_eq!(Command::from_arg("seed"), None);
    }
}
