use anyhow::{bail, Context, Result};
use clap::Parser;
use faceit_h2h::cli::{Args, Command, ConfigSubcommand};
use faceit_h2h::config::Config;
use faceit_h2h::faceit::{FaceitClient, FaceitError};
use faceit_h2h::pipeline::{self, MatchFilter, PipelineError, RunOptions};
use faceit_h2h::settings::{self, JsonFileSettings, SettingsStore};
use faceit_h2h::ui::{self, ColumnPrefs};
use std::io::{self, Write};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args.log_level);

    let rt = Runtime::new().expect("failed to create tokio runtime");
    let res = rt.block_on(async_main(args));
    if let Err(err) = res {
        // map rate limiting
        if let Some(PipelineError::Faceit(FaceitError::RateLimited(_))) = err.downcast_ref::<PipelineError>() {
            eprintln!("Rate limit hit. Please try again later.");
            std::process::exit(29);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn async_main(args: Args) -> Result<()> {
    let cfg = Config::from_env();
    let mut store = JsonFileSettings::new(&cfg.settings_path);
    let mut want_json = args.json;

    match args.command {
        Some(Command::Config { cmd }) => return run_config(cmd, &mut store),
        Some(Command::Stats { link, head_to_head, concurrency, all_columns }) => {
            let opts = RunOptions {
                filter: if head_to_head { MatchFilter::HeadToHead } else { MatchFilter::Either },
                concurrency,
            };
            return fetch_and_print(&cfg, &store, &link, opts, want_json, all_columns).await;
        }
        None => {}
    }

    loop {
        println!("FACEIT head-to-head");
        println!("1) Fetch stats for a match room link");
        println!("2) Set API key");
        println!("3) Show player table columns");
        println!("j) Toggle JSON output [{}]", if want_json { "on" } else { "off" });
        println!("q) Quit");
        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        // stdin closed
        if !matches!(io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            return Ok(());
        }
        match line.trim() {
            "1" => {
                let link = prompt("Enter match room link: ")?;
                if link.is_empty() {
                    println!("Please enter a valid match link.\n");
                    continue;
                }
                // a failed lookup returns to the menu
                if let Err(e) = fetch_and_print(&cfg, &store, &link, RunOptions::default(), want_json, false).await {
                    eprintln!("Error: {:#}\n", e);
                }
            }
            "2" => {
                let key = prompt("Enter FACEIT API key: ")?;
                if key.is_empty() {
                    println!("API key cannot be empty.\n");
                    continue;
                }
                settings::set_api_key(&mut store, &key)?;
                println!("API key saved.\n");
            }
            "3" => ui::print_columns(&ColumnPrefs::from_hidden(settings::hidden_columns(&store))),
            "j" | "J" => want_json = !want_json,
            "q" | "Q" => return Ok(()),
            _ => println!("Invalid choice. Please try again.\n"),
        }
    }
}

async fn fetch_and_print(
    cfg: &Config,
    store: &dyn SettingsStore,
    link: &str,
    opts: RunOptions,
    want_json: bool,
    all_columns: bool,
) -> Result<()> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("faceit-h2h/", env!("CARGO_PKG_VERSION")))
        .timeout(cfg.http_timeout)
        .build()?;
    let api_key = cfg.api_key.clone().or_else(|| settings::api_key(store));
    let client = FaceitClient::new(&cfg.api_base, api_key, http).context("invalid FACEIT_API_BASE")?;

    if !want_json {
        eprintln!("Fetching match data...");
    }
    let report = tokio::select! {
        res = pipeline::run(&client, link, opts) => res?,
        _ = tokio::signal::ctrl_c() => bail!("cancelled"),
    };

    if want_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let prefs = if all_columns {
        ColumnPrefs::show_all()
    } else {
        ColumnPrefs::from_hidden(settings::hidden_columns(store))
    };
    ui::print_report(&report, &prefs);

    if let Some(p) = report.partial {
        eprintln!("Note: {}.", p);
    }
    Ok(())
}

fn run_config(cmd: ConfigSubcommand, store: &mut JsonFileSettings) -> Result<()> {
    match cmd {
        ConfigSubcommand::SetKey { key } => {
            if key.trim().is_empty() {
                bail!("API key cannot be empty.");
            }
            settings::set_api_key(store, &key)?;
            println!("API key saved to {}.", store.path().display());
        }
        ConfigSubcommand::Show => {
            println!("Settings file: {}", store.path().display());
            let state = if settings::api_key(&*store).is_some() { "set" } else { "not set" };
            println!("API key: {}", state);
        }
        ConfigSubcommand::Columns => {
            ui::print_columns(&ColumnPrefs::from_hidden(settings::hidden_columns(&*store)));
        }
        ConfigSubcommand::Hide { columns } => {
            check_columns(&columns)?;
            let mut prefs = ColumnPrefs::from_hidden(settings::hidden_columns(&*store));
            columns.iter().for_each(|c| prefs.hide(c));
            settings::set_hidden_columns(store, prefs.hidden())?;
            println!("Hidden: {}", columns.join(", "));
        }
        ConfigSubcommand::Unhide { columns } => {
            check_columns(&columns)?;
            let mut prefs = ColumnPrefs::from_hidden(settings::hidden_columns(&*store));
            columns.iter().for_each(|c| prefs.show(c));
            settings::set_hidden_columns(store, prefs.hidden())?;
            println!("Shown: {}", columns.join(", "));
        }
        ConfigSubcommand::ResetColumns => {
            settings::clear_hidden_columns(store)?;
            println!("Column preference reset.");
        }
    }
    Ok(())
}

fn check_columns(columns: &[String]) -> Result<()> {
    let unknown = ui::unknown_columns(columns);
    if !unknown.is_empty() {
        bail!("unknown columns: {} (see `faceit-h2h config columns`)", unknown.join(", "));
    }
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s).context("failed to read input")?;
    Ok(s.trim().to_string())
}
