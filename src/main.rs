use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use gembot::infra::{DefaultObserver, ReplayFile, TurnDecoder};
use gembot::{BotConfig, BotController, BotError, Game, StrategyRegistry};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gembot=debug,info"));

    // stdout carries the protocol, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {}", err);
    }
}

fn load_config() -> Result<BotConfig, BotError> {
    let path = env::args()
        .nth(1)
        .or_else(|| env::var("GEMBOT_CONFIG").ok())
        .map(PathBuf::from);

    let mut config = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            BotConfig::load(&path)?
        }
        None => BotConfig::default(),
    };

    if let Ok(strategy) = env::var("GEMBOT_STRATEGY") {
        config.strategy = strategy;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BotError> {
    dotenv().ok();
    init_logging();

    let config = load_config()?;
    let registry = StrategyRegistry::builtin();
    info!(
        "Strategies: {}",
        registry.identifiers().collect::<Vec<_>>().join(", ")
    );

    let controller = BotController::new(&config, &registry, DefaultObserver)?;
    let replay_file = env::var("GEMBOT_REPLAYS_FOLDER").ok().and_then(|folder| {
        ReplayFile::new(&PathBuf::from(folder), "gembot")
            .inspect_err(|err| warn!("Replay file disabled: {}", err))
            .ok()
    });

    let mut game = Game::new(controller, TurnDecoder::new(config.arena), replay_file);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    game.run(stdin, tokio::io::stdout()).await
}
