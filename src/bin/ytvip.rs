// Native binary for ytvip - talk to the backend from a terminal and dry-run
// row navigation over a saved layout.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ytvip::{
    actions::Backend,
    config::{self, ConnectionArgs},
    input::{handle_directional_input, DirectionalInput, StaticViewport},
    navigator::{Row, RowNavigator},
};

/// ytvip - YouTube channel browser client
#[derive(Parser, Debug)]
#[command(name = "ytvip")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the ytvip video browser backend", long_about = None)]
struct Cli {
    #[command(flatten)]
    conn: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Queue a video download
    Download {
        #[arg(long)]
        ytid: String,
        #[arg(long)]
        channel_id: String,
    },
    /// Open a downloaded file in the backend's local player
    Play { path: String },
    /// Set a video's score
    Score {
        #[arg(long)]
        ytid: String,
        #[arg(long, allow_hyphen_values = true)]
        score: i32,
    },
    /// Run one navigation step over a JSON row layout: [{"top":0,"height":100}, ...]
    Navigate {
        #[arg(long)]
        layout: PathBuf,
        /// Current scroll position in pixels
        #[arg(long, default_value_t = 0.0)]
        scroll: f64,
        /// Key name, e.g. ArrowDown
        #[arg(long, conflicts_with = "wheel")]
        key: Option<String>,
        /// Wheel deltaY
        #[arg(long, allow_hyphen_values = true)]
        wheel: Option<f64>,
        /// Ctrl held during the wheel tick
        #[arg(long, requires = "wheel")]
        ctrl: bool,
    },
}

#[derive(serde::Deserialize)]
struct LayoutRow {
    top: f64,
    height: f64,
}

fn read_layout(path: &PathBuf) -> Result<Vec<Row>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout: {}", path.display()))?;
    let rows: Vec<LayoutRow> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse layout: {}", path.display()))?;
    Ok(rows.into_iter().map(|r| Row::new(r.top, r.height)).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    ytvip::debug::init_from_url_and_storage_once();

    let cli = Cli::parse();
    let cfg = config::load(&cli.conn).context("Failed to load configuration")?;

    match cli.command {
        Command::Download { ytid, channel_id } => {
            Backend::new(cfg).queue_download(&ytid, &channel_id).await?;
            println!("{}", ytvip::actions::QUEUED_LABEL);
        }
        Command::Play { path } => {
            let reply = Backend::new(cfg).play_locally(&path).await?;
            if !reply.trim().is_empty() {
                println!("{}", reply.trim());
            }
        }
        Command::Score { ytid, score } => {
            Backend::new(cfg).change_score(&ytid, score).await?;
        }
        Command::Navigate {
            layout,
            scroll,
            key,
            wheel,
            ctrl,
        } => {
            let input = match (key, wheel) {
                (Some(k), _) => DirectionalInput::from_key(&k)
                    .ok_or_else(|| anyhow!("unsupported key '{k}' (use ArrowUp or ArrowDown)"))?,
                (None, Some(dy)) => DirectionalInput::from_wheel(dy, ctrl),
                (None, None) => return Err(anyhow!("pass --key or --wheel")),
            };
            let mut viewport = StaticViewport::new(read_layout(&layout)?, scroll);
            let navigator = RowNavigator::new(cfg.tolerance);
            let outcome = handle_directional_input(&navigator, &mut viewport, input);
            println!(
                "{}",
                serde_json::json!({
                    "suppress_default": outcome.suppress_default,
                    "stop_propagation": outcome.stop_propagation,
                    "scroll_position": viewport.scroll_position,
                })
            );
        }
    }
    Ok(())
}
