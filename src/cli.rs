use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use datavista::analyser::View;
use datavista::analyser::charts::CustomKind;
use datavista::analyser::logic::load_df;
use datavista::config::{get_config_path, load_app_config, save_app_config};
use datavista::explorer::{Explorer, Session};
use serde_json::{Value, json};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datavista", about = "Upload and explore tabular datasets")]
pub struct Cli {
    /// Database connection URL (e.g. <sqlite://data.db?mode=rwc>)
    #[arg(long, global = true, env = "DATAVISTA_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct Credentials {
    #[arg(short, long, env = "DATAVISTA_USERNAME")]
    username: String,

    #[arg(short, long, env = "DATAVISTA_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Info,
    Visualize,
    CustomGraph,
    Quality,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup(Credentials),
    /// Check a username and password
    Login(Credentials),
    /// Upload a CSV, Excel, Parquet or JSON file as a new dataset
    Upload {
        #[command(flatten)]
        credentials: Credentials,

        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Dataset name. Defaults to the file stem.
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List all uploaded datasets
    List,
    /// Print the effective settings
    Config {
        /// Also write them to the config file
        #[arg(long)]
        save: bool,
    },
    /// Show one view of a dataset
    Explore {
        #[command(flatten)]
        credentials: Credentials,

        /// Dataset id as printed by `list`
        #[arg(long)]
        id: i64,

        #[arg(long, value_enum, default_value = "info")]
        view: ViewArg,

        /// X column for `custom-graph`
        #[arg(short, long)]
        x: Option<String>,

        /// Y column for `custom-graph`
        #[arg(short, long)]
        y: Option<String>,

        /// Graph type for `custom-graph` (scatter, line or bar)
        #[arg(long, default_value = "scatter")]
        kind: CustomKind,
    },
}

pub async fn run_command(cli: Cli) -> Result<Value> {
    let mut config = load_app_config();
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    // The store is only opened by commands that use it
    let open = || Explorer::open(config.clone());

    match cli.command {
        Commands::Signup(credentials) => {
            let explorer = open().await?;
            let session = explorer
                .sign_up(&credentials.username, &credentials.password)
                .await?;
            Ok(json!({ "signed_up": session.username() }))
        }
        Commands::Login(credentials) => {
            let explorer = open().await?;
            let session = log_in(&explorer, &credentials).await?;
            Ok(json!({ "logged_in": session.username() }))
        }
        Commands::Upload {
            credentials,
            file,
            name,
            description,
        } => {
            let explorer = open().await?;
            let session = log_in(&explorer, &credentials).await?;
            let df = load_df(&file)?;
            let name = match name {
                Some(name) => name,
                None => file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("Cannot derive a dataset name from the file; pass --name")?
                    .to_owned(),
            };
            let id = explorer.upload(&session, &name, &description, &df).await?;
            Ok(json!({ "id": id, "name": name, "rows": df.height(), "columns": df.width() }))
        }
        Commands::List => Ok(serde_json::to_value(open().await?.datasets().await?)?),
        Commands::Config { save } => {
            if save {
                save_app_config(&config)?;
            }
            Ok(json!({ "path": get_config_path(), "saved": save, "config": config }))
        }
        Commands::Explore {
            credentials,
            id,
            view,
            x,
            y,
            kind,
        } => {
            let explorer = open().await?;
            let session = log_in(&explorer, &credentials).await?;
            let view = match view {
                ViewArg::Info => View::Info,
                ViewArg::Visualize => View::Visualize { charts: Vec::new() },
                ViewArg::Quality => View::Quality,
                ViewArg::CustomGraph => {
                    let (Some(x), Some(y)) = (x, y) else {
                        bail!("custom-graph needs both --x and --y");
                    };
                    View::CustomGraph { x, y, kind }
                }
            };
            let exploration = explorer.explore(&session, id, &view).await?;
            Ok(serde_json::to_value(exploration)?)
        }
    }
}

async fn log_in(explorer: &Explorer, credentials: &Credentials) -> Result<Session> {
    match explorer
        .log_in(&credentials.username, &credentials.password)
        .await?
    {
        Some(session) => Ok(session),
        None => bail!("Invalid username or password"),
    }
}
