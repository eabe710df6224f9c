//! Skyroad - headless session runner
//!
//! Runs the full experience against recording collaborators: assets resolve
//! one per frame, the menu and enter button are clicked as soon as they show,
//! and the run ends when the game-start screen is reached.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use skyroad::collaborators::{
    Collaborators, RecordingAudio, RecordingPost, RecordingRenderer, ScriptedUi, UiElement,
    UiSignal,
};
use skyroad::core::{logging, time::FrameTimer, Result};
use skyroad::narrative::{NarrativeState, Transition};
use skyroad::world::{layout::demo_assets, Session, WorldConfig};

const FRAME_STEP: f32 = 1.0 / 60.0;
const DEFAULT_MAX_SECS: f64 = 120.0;

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    /// Step a fixed clock as fast as possible instead of pacing at 60 Hz
    fast: bool,
    max_secs: f64,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let mut config = None;
    let mut fast = false;
    let mut max_secs = DEFAULT_MAX_SECS;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                config = Some(PathBuf::from(
                    args.next().ok_or("--config needs a path")?,
                ));
            }
            "--fast" => fast = true,
            "--max-secs" => {
                if let Some(v) = args.next() {
                    max_secs = v.parse().unwrap_or(DEFAULT_MAX_SECS);
                }
            }
            "-h" | "--help" => return Err("show_help".to_string()),
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(Args {
        config,
        fast,
        max_secs,
    })
}

fn print_help() {
    println!("Usage: skyroad [--config <world.json>] [--fast] [--max-secs <n>]");
    println!();
    println!("  -c, --config     JSON world config (defaults are used when omitted)");
    println!("      --fast       run on a fixed 60 Hz clock without waiting");
    println!("      --max-secs   give up after this much simulated time (default 120)");
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) if e == "show_help" => {
            print_help();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args).await {
        log::error!("Session failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };

    let mut assets = demo_assets(&config);
    let mut session = Session::new(config);

    let mut renderer = RecordingRenderer::default();
    let mut audio = RecordingAudio::default();
    let mut ui = ScriptedUi::new();
    let mut post = RecordingPost::default();

    let mut timer = if args.fast {
        FrameTimer::fixed(FRAME_STEP)
    } else {
        FrameTimer::new()
    };
    let mut interval = tokio::time::interval(Duration::from_secs_f32(FRAME_STEP));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut clicked_begin = false;
    let mut clicked_enter = false;

    log::info!("Session started ({})", if args.fast { "fixed clock" } else { "realtime" });

    loop {
        if !args.fast {
            interval.tick().await;
        }
        let dt = timer.tick();
        assets.load_next();

        let transitions = {
            let mut collaborators = Collaborators {
                renderer: &mut renderer,
                audio: &mut audio,
                ui: &mut ui,
                post: &mut post,
            };
            session.tick(&assets, dt, &mut collaborators)?
        };
        for transition in transitions {
            if let Transition::Ignored { state, event } = transition {
                log::debug!("Driver saw {:?} ignored in {}", event, state);
            }
        }

        if !clicked_begin && ui.is_visible(UiElement::Menu) {
            log::info!("Clicking begin");
            ui.click(UiSignal::Begin);
            clicked_begin = true;
        }
        if !clicked_enter && ui.is_visible(UiElement::EnterButton) {
            log::info!("Clicking enter");
            ui.click(UiSignal::Enter);
            clicked_enter = true;
        }

        if session.state() == Some(NarrativeState::GameStarting) {
            break;
        }
        if timer.elapsed_secs() > args.max_secs {
            log::warn!(
                "Gave up after {:.1}s in {:?}",
                timer.elapsed_secs(),
                session.state()
            );
            break;
        }
    }

    let travel = session.world().map(|w| w.camera().travel).unwrap_or(0.0);
    log::info!(
        "Finished after {} frames ({:.1}s, {:.0} fps): travel {:.1}, {} uploads across {} pools, {} audio calls",
        timer.frame_count(),
        timer.elapsed_secs(),
        timer.fps(),
        travel,
        renderer.total_uploads(),
        renderer.pools().count(),
        audio.calls.len()
    );
    if let Some(world) = session.world() {
        for group in world.groups() {
            let stats = group.stats();
            log::info!(
                "  {}: {} instances, {} recycled, {} uploads",
                group.name(),
                group.instance_count(),
                stats.recycled,
                stats.uploads
            );
        }
    }
    Ok(())
}
