use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scenemap_config::{Config, ConfigLoad, ConfigLoader};
use scenemap_core::{
    DetachedSeriesCatalog, PostgresRecordStore, SceneNumbering,
    SceneNumberingUpdate,
};
use scenemap_model::{IndexerKind, SeasonEpisode, SeriesId};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "scenemapctl", version)]
#[command(about = "Scene numbering lookups, overrides and XEM refreshes")]
struct Cli {
    /// TOML config file (defaults to SCENEMAP_CONFIG or scenemap.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Env file applied before reading the environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Answer lookups from local data only; never contact XEM
    #[arg(long, global = true)]
    no_xem: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct Target {
    /// Indexer series id
    #[arg(long)]
    series: SeriesId,

    /// Indexer kind (1 = TheTVDB, 2 = TVRage)
    #[arg(long, default_value_t = 1)]
    indexer: u16,
}

impl Target {
    fn indexer(&self) -> IndexerKind {
        IndexerKind(self.indexer)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply database migrations
    Migrate,
    /// Scene season/episode for a native season/episode
    Resolve {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        episode: u32,
    },
    /// Scene absolute number for a native absolute number
    ResolveAbsolute {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        absolute: u32,
    },
    /// Native season/episode for a scene season/episode
    Reverse {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        episode: u32,
    },
    /// Native absolute number for a scene absolute number
    ReverseAbsolute {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        absolute: u32,
        /// Only match episodes in this scene season
        #[arg(long)]
        scene_season: Option<u32>,
    },
    /// Store a local override; a zero scene pair clears it
    Set {
        #[command(flatten)]
        target: Target,
        #[arg(long, default_value_t = 0)]
        season: u32,
        #[arg(long, default_value_t = 0)]
        episode: u32,
        #[arg(long, default_value_t = 0)]
        absolute: u32,
        #[arg(long, default_value_t = 0)]
        scene_season: u32,
        #[arg(long, default_value_t = 0)]
        scene_episode: u32,
        #[arg(long, default_value_t = 0)]
        scene_absolute: u32,
    },
    /// Fetch XEM data for a series when due
    Refresh {
        #[command(flatten)]
        target: Target,
        /// Ignore the refresh TTL
        #[arg(long)]
        force: bool,
    },
    /// Print every mapping of a series
    Dump {
        #[command(flatten)]
        target: Target,
        /// Absolute numbers instead of season/episode pairs
        #[arg(long)]
        absolute: bool,
        /// XEM mappings instead of local overrides
        #[arg(long)]
        xem: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,scenemap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    let ConfigLoad { config } =
        loader.load().context("failed to load configuration")?;
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    Ok(config)
}

async fn connect(config: &Config) -> Result<PostgresRecordStore> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is not set")?;
    PostgresRecordStore::connect(url)
        .await
        .context("failed to connect to database")
}

fn pair(value: SeasonEpisode) -> Value {
    json!({ "season": value.season, "episode": value.episode })
}

async fn run(cli: Cli) -> Result<Value> {
    let config = load_config(&cli)?;
    let store = Arc::new(connect(&config).await?);
    let numbering = SceneNumbering::from_config(
        &config,
        store.clone(),
        Arc::new(DetachedSeriesCatalog),
    )
    .context("failed to build scene numbering service")?;
    let resolver = numbering.resolver();
    let fallback = !cli.no_xem;

    let output = match cli.command {
        Command::Migrate => {
            store.migrate().await.context("migration failed")?;
            json!({ "migrated": true })
        }
        Command::Resolve {
            target,
            season,
            episode,
        } => {
            let native = SeasonEpisode::new(season, episode);
            let scene = resolver
                .scene_numbering(
                    target.series,
                    target.indexer(),
                    native,
                    fallback,
                )
                .await;
            json!({ "native": pair(native), "scene": pair(scene) })
        }
        Command::ResolveAbsolute { target, absolute } => {
            let scene = resolver
                .scene_absolute_numbering(
                    target.series,
                    target.indexer(),
                    absolute,
                    fallback,
                )
                .await;
            json!({ "native": absolute, "scene": scene })
        }
        Command::Reverse {
            target,
            season,
            episode,
        } => {
            let scene = SeasonEpisode::new(season, episode);
            let native = resolver
                .indexer_numbering(
                    target.series,
                    target.indexer(),
                    scene,
                    fallback,
                )
                .await;
            json!({ "scene": pair(scene), "native": pair(native) })
        }
        Command::ReverseAbsolute {
            target,
            absolute,
            scene_season,
        } => {
            let native = resolver
                .indexer_absolute_numbering(
                    target.series,
                    target.indexer(),
                    absolute,
                    scene_season,
                    fallback,
                )
                .await;
            json!({ "scene": absolute, "native": native })
        }
        Command::Set {
            target,
            season,
            episode,
            absolute,
            scene_season,
            scene_episode,
            scene_absolute,
        } => {
            let update = SceneNumberingUpdate {
                season,
                episode,
                absolute_number: absolute,
                scene_season,
                scene_episode,
                scene_absolute_number: scene_absolute,
            };
            let outcome = numbering
                .set_scene_numbering(target.series, target.indexer(), update)
                .await
                .context("failed to store override")?;
            json!({ "outcome": format!("{outcome:?}") })
        }
        Command::Refresh { target, force } => {
            let outcome = numbering
                .refresh(target.series, target.indexer(), force)
                .await;
            json!({ "outcome": format!("{outcome:?}") })
        }
        Command::Dump {
            target,
            absolute: true,
            xem,
        } => {
            let map = if xem {
                resolver
                    .xem_absolute_numbering_for_show(
                        target.series,
                        target.indexer(),
                    )
                    .await
            } else {
                resolver
                    .scene_absolute_numbering_for_show(
                        target.series,
                        target.indexer(),
                    )
                    .await
            };
            json!(map)
        }
        Command::Dump {
            target,
            absolute: false,
            xem,
        } => {
            let map = if xem {
                resolver
                    .xem_numbering_for_show(target.series, target.indexer())
                    .await
            } else {
                resolver
                    .scene_numbering_for_show(target.series, target.indexer())
                    .await
            };
            map.into_iter()
                .map(|(native, scene)| {
                    json!({ "native": pair(native), "scene": pair(scene) })
                })
                .collect()
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let output = run(cli).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
