use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use marquee::prelude::*;
use marquee::view::{render_countdown, render_grid};
use marquee::{CRATE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    // It assumes `logo.log` is in the root of the `rdx-marqueeshell` crate.
    const LOGO_TEXT: &str = include_str!("../logo.log");
    println!("{}", LOGO_TEXT.cyan());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );

    println!("{}", "-------------------------------------------------------------".dimmed());

    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";

    println!("{}", version_string);
    println!("{}", license_blurb.dimmed());

    println!("{}", "-------------------------------------------------------------".dimmed());
}

/// Spawns listeners for the mounted components' event streams.
fn spawn_event_listeners(saver: &ScreenSaver, countdown: &Countdown, is_watching: Arc<AtomicBool>) {
    // Frame listener (controlled by the shared flag)
    let mut frame_rx = saver.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match frame_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Frame listener fell behind; skipped {} event(s).", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event {
                AnimationEvent::Frame(frame) => {
                    if is_watching.load(Ordering::Relaxed) {
                        println!("<-- [FRAME #{}]\n{}", frame.tick, render_grid(&frame.grid));
                    }
                }
                other => println!("\n<-- [SAVER] {:?}", other),
            }
        }
    });

    // Countdown listener
    let mut countdown_rx = countdown.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match countdown_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            };
            match event {
                CountdownEvent::Completed { at } => println!(
                    "\n<-- [TIMER] Completed at {}\n>> ",
                    at.with_timezone(&Local).format("%H:%M:%S")
                ),
                CountdownEvent::Tick { remaining } if remaining % 5 == 0 => {
                    println!("\n<-- [TIMER] {} left\n>> ", remaining)
                }
                _ => {}
            }
        }
    });
}

/// Runs rustyline on its own thread so the runtime thread keeps ticking while
/// the shell waits for input. A line is read each time `ready_rx` yields.
fn spawn_line_reader(line_tx: mpsc::Sender<String>, ready_rx: std_mpsc::Receiver<()>) {
    thread::spawn(move || {
        let mut rl = match Editor::new() {
            Ok(rl) => rl,
            Err(e) => {
                error!("Failed to open the line editor: {}", e);
                return;
            }
        };
        rl.set_helper(Some(MyHighlighter {}));

        for () in ready_rx {
            let prompt = format!("{}", ">> ".cyan().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str()).ok();
                    if line_tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

fn print_help() {
    println!("Available commands:");
    println!("  saver start [MS]      - Starts the screen saver (default 200ms per step).");
    println!("  saver stop            - Freezes the screen saver.");
    println!("  show                  - Renders the current grids.");
    println!("  watch on|off          - Prints every frame as it happens.");
    println!("  timer start           - Starts the countdown from its initial value.");
    println!("  timer stop            - Pauses the countdown.");
    println!("  timer reset           - Stops and restores the initial value.");
    println!("  timer status          - Shows the countdown.");
    println!("  list                  - Shows mounted components.");
    println!("  exit                  - Quits the shell.");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = MarqueeConfig::load(config_path.as_deref())?;
    let default_speed = config.animation.speed;

    let mut scope = Scope::new(config);
    let saver_id = scope.mount_screen_saver();
    let countdown_id = scope.mount_countdown(Some(Box::new(|| {
        println!("\n<-- [TIMER] Time's up!");
    })));

    // Create the shared flag for the frame listener.
    let is_watching = Arc::new(AtomicBool::new(false));
    if let (Some(saver), Some(countdown)) = (scope.screen_saver(saver_id), scope.countdown(countdown_id)) {
        spawn_event_listeners(saver, countdown, is_watching.clone());
    }
    info!("Mounted screen saver {:?} and countdown {:?}.", saver_id, countdown_id);

    let (line_tx, mut line_rx) = mpsc::channel::<String>(1);
    let (ready_tx, ready_rx) = std_mpsc::channel::<()>();
    spawn_line_reader(line_tx, ready_rx);

    println!("{} shell is ready. Type 'help' for commands or 'exit' to quit.", CRATE_NAME.cyan());

    loop {
        // Ask the reader thread for the next line only once the previous command is done.
        ready_tx.send(()).ok();
        let Some(line) = line_rx.recv().await else {
            println!("Exiting marqueeshell...");
            break;
        };
        let args = line.split_whitespace().collect::<Vec<_>>();

        let Some(command) = args.first() else {
            continue;
        };
        match *command {
            "saver" => {
                let Some(saver) = scope.screen_saver_mut(saver_id) else {
                    println!("Error: the screen saver is no longer mounted.");
                    continue;
                };
                match args.get(1) {
                    Some(&"start") => {
                        let speed = match args.get(2) {
                            Some(ms_str) => match ms_str.parse::<u64>() {
                                Ok(ms) if ms > 0 => AnimationSpeed::from(Duration::from_millis(ms)),
                                _ => {
                                    println!("Error: '{}' is not a valid number of milliseconds.", ms_str);
                                    continue;
                                }
                            },
                            None => default_speed,
                        };
                        saver.start_animation(speed);
                        println!("--> Screen saver moving every {:?}.", speed.interval());
                    }
                    Some(&"stop") => {
                        saver.stop_animation();
                        println!("--> Screen saver stopped.");
                    }
                    _ => println!("Usage: saver start [MS] | saver stop"),
                }
            }
            "show" => {
                if let Some(saver) = scope.screen_saver(saver_id) {
                    println!("{}", render_grid(&saver.grid().await));
                    println!("Frames so far: {}", saver.frames().await);
                }
            }
            "watch" => match args.get(1) {
                Some(&"on") => {
                    is_watching.store(true, Ordering::Relaxed);
                    println!("--> Printing every frame.");
                }
                Some(&"off") => {
                    is_watching.store(false, Ordering::Relaxed);
                    println!("--> Stopped printing frames.");
                }
                _ => println!("Usage: watch on|off"),
            },
            "timer" => {
                let Some(countdown) = scope.countdown_mut(countdown_id) else {
                    println!("Error: the countdown is no longer mounted.");
                    continue;
                };
                match args.get(1) {
                    Some(&"start") => countdown.start().await,
                    Some(&"stop") => countdown.stop().await,
                    Some(&"reset") => countdown.reset().await,
                    Some(&"status") => {}
                    _ => {
                        println!("Usage: timer start|stop|reset|status");
                        continue;
                    }
                }
                println!("--> Timer {}", render_countdown(&countdown.snapshot().await));
            }
            "list" => {
                println!("Mounted components:");
                for (id, kind) in scope.components() {
                    println!("  {:?}: {:?}", id, kind);
                }
            }
            "help" => print_help(),
            "exit" => break,
            _ => println!("Unknown command: '{}'. Type 'help'.", line),
        }
    }

    // The reader thread may still be blocked in `readline`; it ends with the process.
    drop(ready_tx);
    scope.dispose();
    Ok(())
}
