use clap::Parser;
use log::{error, info, warn};
use macroquad::prelude::*;
use whatbeats::api::HttpGameApi;
use whatbeats::config::{self, WINDOW_HEIGHT, WINDOW_WIDTH};
use whatbeats::game::Game;
use whatbeats::logging;
use whatbeats::net::NetWorker;
use whatbeats::render::Renderer;
use whatbeats::session::Persona;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the game server.
    #[arg(long, default_value = config::DEFAULT_SERVER_URL)]
    server_url: String,

    /// Pre-fill the seed word field.
    #[arg(long)]
    seed: Option<String>,

    /// Judging persona sent with each guess.
    #[arg(long, value_enum, default_value_t = Persona::Serious)]
    persona: Persona,

    /// TTF font to use instead of the built-in one.
    #[arg(long)]
    font: Option<String>,

    /// Debug filter to specify log topics (net, session, ui)
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "What Beats What?".to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    let unknown = args
        .debug_filter
        .as_deref()
        .map(logging::unknown_topics)
        .unwrap_or_default();
    if let Err(e) = logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    if !unknown.is_empty() {
        warn!(
            "Unknown debug topics {:?}; known topics are {}",
            unknown,
            logging::TOPICS.join(", ")
        );
    }

    let api = HttpGameApi::new(args.server_url);
    info!("Connecting to game server at {}", api.base_url());
    let worker = match NetWorker::spawn(api) {
        Ok(worker) => worker,
        Err(e) => {
            error!("Failed to start network worker: {}", e);
            return;
        }
    };

    let mut renderer = Renderer::new();
    if let Some(path) = &args.font {
        renderer.load_ui_font(path).await;
    }
    info!("Renderer initialized.");

    let mut game = Game::new(worker, args.seed.as_deref(), args.persona);
    if let Err(e) = game.run(&mut renderer).await {
        error!("Game loop failed: {}", e);
    }
}
