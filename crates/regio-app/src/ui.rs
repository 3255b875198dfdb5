use std::io::BufRead;

use kanal::{AsyncReceiver, AsyncSender};
use regio_types::{AppEvent, PointerEvent, UiEvent};
use tokio_util::sync::CancellationToken;

const HELP: &str = "\
commands:
  once | t              translate the selection once
  auto | a              toggle auto translate
  down X Y / move X Y / up
                        drag the selection (view pixels)
  view W H              overlay view size
  origin X Y            overlay view position on screen
  close | q             quit";

/// One line of console input
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Ui(UiEvent),
    Help,
}

/// Console stand-in for the overlay view: commands in on stdin, results out
/// on stdout. Status and diagnostics go through tracing on stderr.
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    max_lines: usize,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let lines_rx = spawn_stdin_reader();
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => match event {
                Ok(event) => render(event, max_lines),
                Err(_) => break,
            },
            line = lines_rx.recv(), if input_open => match line {
                Ok(line) => match parse_command(&line) {
                    Ok(Some(ConsoleCommand::Ui(event))) => {
                        let _ = ui_to_app_tx.send(AppEvent::UiEvent(event)).await;
                    }
                    Ok(Some(ConsoleCommand::Help)) => println!("{HELP}"),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("{}", e),
                },
                Err(_) => {
                    tracing::info!("Input closed");
                    input_open = false;
                    let _ = ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;
                }
            },
        }
    }

    Ok(())
}

// A plain thread so a pending stdin read never holds up runtime shutdown
fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx.to_async()
}

fn render(event: AppEvent, max_lines: usize) {
    match event {
        AppEvent::ShowResult(text) => println!("{}", clamp_lines(&text, max_lines)),
        AppEvent::StatusUpdate { status, running } => {
            let mode = if running { "auto" } else { "idle" };
            println!("[{mode}] {status}");
        }
        AppEvent::AutoModeChanged(on) => {
            println!("Auto: {}", if on { "ON" } else { "OFF" })
        }
        AppEvent::SelectionChanged(rect) => tracing::info!(
            "Selection ({:.0}, {:.0}) - ({:.0}, {:.0})",
            rect.left,
            rect.top,
            rect.right,
            rect.bottom
        ),
        AppEvent::TickCompleted(outcome) => tracing::debug!("Tick: {:?}", outcome),
        AppEvent::BackendReady => {
            tracing::info!("Backend ready");
            println!("{HELP}");
        }
        AppEvent::UiEvent(_) => {}
    }
}

/// Keeps the first `max_lines` lines; 0 means no limit
pub fn clamp_lines(text: &str, max_lines: usize) -> String {
    if max_lines == 0 || text.lines().count() <= max_lines {
        return text.to_string();
    }
    let kept: Vec<&str> = text.lines().take(max_lines).collect();
    format!("{}…", kept.join("\n"))
}

pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let event = match command.to_ascii_lowercase().as_str() {
        "once" | "t" => UiEvent::TranslateOnce,
        "auto" | "a" => UiEvent::ToggleAuto,
        "close" | "q" | "quit" => UiEvent::Close,
        "up" => UiEvent::Pointer(PointerEvent::Up),
        "down" => {
            let (x, y) = two_numbers(command, &args)?;
            UiEvent::Pointer(PointerEvent::Down { x, y })
        }
        "move" => {
            let (x, y) = two_numbers(command, &args)?;
            UiEvent::Pointer(PointerEvent::Move { x, y })
        }
        "view" => {
            let (width, height) = two_numbers(command, &args)?;
            UiEvent::ViewResized { width, height }
        }
        "origin" => {
            let (x, y) = two_numbers(command, &args)?;
            UiEvent::ViewMoved { x, y }
        }
        "help" | "?" => return Ok(Some(ConsoleCommand::Help)),
        other => return Err(format!("Unknown command '{other}', try 'help'")),
    };
    Ok(Some(ConsoleCommand::Ui(event)))
}

fn two_numbers(command: &str, args: &[&str]) -> Result<(f32, f32), String> {
    match args {
        [a, b] => {
            let a = a.parse().map_err(|_| format!("{command}: '{a}' is not a number"))?;
            let b = b.parse().map_err(|_| format!("{command}: '{b}' is not a number"))?;
            Ok((a, b))
        }
        _ => Err(format!("{command} takes two numbers")),
    }
}
