mod commands;
mod core;
mod error;
mod input;
mod playback;
mod review;
mod settings;

use anyhow::{Context, Result};
use commands::Command;
use crate::core::Game;
use playback::{AutoplayController, AutoplayDelay, AutoplayState, Scheduler, TokioScheduler};
use review::{GameReview, ReviewSession};
use settings::AppSettings;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: review-autoplay <game.json|game.csv> [--realtime | --delay <ms>]";

/// Parsed command line
#[derive(Debug, PartialEq)]
struct Args {
    path: String,
    delay: Option<AutoplayDelay>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut path = None;
    let mut delay = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--realtime" => delay = Some(AutoplayDelay::VariationRelative),
            "--delay" => {
                let ms = args
                    .next()
                    .context("--delay needs a value in milliseconds")?
                    .parse::<u64>()
                    .context("--delay must be a whole number of milliseconds")?;
                delay = Some(AutoplayDelay::fixed_ms(ms));
            }
            "-h" | "--help" => anyhow::bail!(USAGE),
            _ if path.is_none() => path = Some(arg),
            _ => anyhow::bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }

    Ok(Args {
        path: path.context(USAGE)?,
        delay,
    })
}

/// Human readable label for the position at `ply`, e.g. `3.` or `3...`
fn move_label(ply: usize) -> String {
    let number = ply.div_ceil(2);
    if ply % 2 == 1 {
        format!("{}.", number)
    } else {
        format!("{}...", number)
    }
}

fn describe_delay(delay: Option<AutoplayDelay>) -> String {
    match delay {
        Some(AutoplayDelay::VariationRelative) => "realtime".to_string(),
        Some(AutoplayDelay::Fixed(d)) => format!("{}ms", d.as_millis()),
        None => "immediate".to_string(),
    }
}

fn print_header(game: &Game) {
    let white = game.white.as_deref().unwrap_or("?");
    let black = game.black.as_deref().unwrap_or("?");
    let date = game
        .played_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    println!("{} vs {} ({}), {} plies", white, black, date, game.len());
    println!("{}", Command::help());
}

/// Print the current position if a redraw was requested since the last call
fn render<S: Scheduler>(review: &mut GameReview, autoplay: &AutoplayController<S>) {
    if review.take_redraws() == 0 {
        return;
    }

    let position = match (review.path().last(), review.current_move()) {
        (Some(last), Some(mv)) => format!("{} {}", move_label(last.ply), mv.san),
        _ => "start".to_string(),
    };
    let status = match autoplay.state() {
        AutoplayState::Running => format!("playing, {}", describe_delay(autoplay.delay)),
        AutoplayState::Stopped => "stopped".to_string(),
    };
    println!("[{}] {} ({})", review.path(), position, status);
}

async fn run(game: Game, delay: AutoplayDelay, settings: &AppSettings) -> Result<()> {
    let (scheduler, mut fired) = TokioScheduler::new();
    let mut autoplay = AutoplayController::new(scheduler, settings.autoplay_config());
    let mut review = GameReview::new(game);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    autoplay.toggle(Some(delay), &mut review)?;
    render(&mut review, &autoplay);

    loop {
        tokio::select! {
            Some(handle) = fired.recv() => {
                autoplay.on_timer(handle, &mut review)?;
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) => match Command::parse(&line) {
                        Some(Command::ToggleFixed) => {
                            autoplay.toggle(Some(settings.default_delay()), &mut review)?;
                            review.redraw();
                        }
                        Some(Command::ToggleRealtime) => {
                            autoplay.toggle(Some(AutoplayDelay::VariationRelative), &mut review)?;
                            review.redraw();
                        }
                        Some(Command::Stop) => {
                            autoplay.stop();
                            review.redraw();
                        }
                        Some(Command::Quit) => {
                            autoplay.stop();
                            break;
                        }
                        None => println!("{}", Command::help()),
                    },
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                autoplay.stop();
                break;
            }
        }

        render(&mut review, &autoplay);

        if !stdin_open && !autoplay.active(None) {
            break;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = AppSettings::load();
    settings.save_if_missing();
    let args = parse_args(std::env::args().skip(1))?;

    let game = input::load_file(&args.path)
        .with_context(|| format!("Failed to load game from {}", args.path))?;
    print_header(&game);

    // Single-threaded runtime: timer callbacks and commands never run concurrently
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let delay = args.delay.unwrap_or_else(|| settings.default_delay());
    rt.block_on(run(game, delay, &settings))?;

    Ok(())
}
