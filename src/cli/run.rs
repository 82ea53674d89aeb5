//! Run command implementation.

use super::output::{JsonRunResult, format_event, format_text};
use super::{BoardArgs, CliError, OutputFormat, resolve_seed};
use colhex::render::render_board;
use colhex::sim::{SimResult, new_match, step_tick};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
pub(crate) fn execute(
    board_args: &BoardArgs,
    seed: Option<u64>,
    format: OutputFormat,
    board: bool,
    events: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let config = board_args.sim_config();

    if !quiet && format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        let colors: Vec<String> = board_args.colors.iter().map(ToString::to_string).collect();
        println!("Players: {}", colors.join(", "));
        println!();
    }

    let mut game = new_match(seed, &config)?;
    game.on_ready();

    let mut log = Vec::new();
    loop {
        let running = step_tick(&mut game, config.frames_per_tick);
        if events {
            log.extend(game.drain_events());
        }
        if !running {
            break;
        }
    }
    let result = SimResult::from_match(seed, &game);

    match format {
        OutputFormat::Text => {
            if events {
                for event in &log {
                    println!("{}", format_event(event));
                }
                println!();
            }
            print!("{}", format_text(&result));
            if board {
                println!();
                print!("{}", render_board(&game));
            }
        }
        OutputFormat::Json => {
            let json_result = JsonRunResult {
                result: &result,
                board: board.then(|| render_board(&game).lines().map(String::from).collect()),
                events: events.then_some(log.as_slice()),
            };
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
    }

    Ok(())
}
