//! Console – line commands for driving the robot by hand.
//!
//! Supported commands:
//!   exit                    – shut down and leave
//!   /help                   – show this list
//!   /status                 – show the active mode
//!   /follow /avoid /center /drink
//!                           – enter an autonomous mode
//!   /leave                  – leave the active mode
//!   /forward /backward /left /right /around /stop /beep /shutdown
//!                           – manual commands
//!   /observe <x> <z>        – feed a tracked position (metres)
//!   /bearing <deg> [range]  – feed a bearing and optional range
//!
//! Any other bare word is treated as a spoken command (`follow`, `left`, …).

use std::time::Instant;

use asimov_runtime::{Command, DispatcherHandle, Observer};
use asimov_types::{ManualCommand, Mode, Observation};
use colored::Colorize;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Empty,
    Exit,
    Help,
    Status,
    Command(Command),
    Observe(Observation),
    Invalid(String),
}

/// Parse one console line. Timestamps observations with `now`.
pub fn parse(line: &str, now: Instant) -> Input {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Input::Empty;
    };
    let args: Vec<&str> = words.collect();

    if head.eq_ignore_ascii_case("exit") && args.is_empty() {
        return Input::Exit;
    }

    let Some(slash) = head.strip_prefix('/') else {
        return match Command::from_word(line) {
            Some(command) => Input::Command(command),
            None => Input::Invalid(format!("unknown command '{}'", line.trim())),
        };
    };

    let command = match slash.to_ascii_lowercase().as_str() {
        "help" => return Input::Help,
        "status" => return Input::Status,
        "quit" => return Input::Exit,
        "observe" => return observe(&args, now),
        "bearing" => return bearing(&args, now),
        "follow" => Command::Enter(Mode::Follow),
        "avoid" => Command::Enter(Mode::Avoid),
        "center" => Command::Enter(Mode::Center),
        "drink" => Command::Enter(Mode::Drinking),
        "leave" => Command::ExitMode,
        "forward" => Command::Manual(ManualCommand::MoveForward),
        "backward" => Command::Manual(ManualCommand::MoveBackward),
        "left" => Command::Manual(ManualCommand::TurnLeft),
        "right" => Command::Manual(ManualCommand::TurnRight),
        "around" => Command::Manual(ManualCommand::TurnAround),
        "stop" => Command::Manual(ManualCommand::Stop),
        "beep" => Command::Manual(ManualCommand::Beep),
        "shutdown" => Command::Manual(ManualCommand::Shutdown),
        _ => return Input::Invalid(format!("unknown command '{head}'")),
    };
    Input::Command(command)
}

fn number(arg: &str, name: &str) -> Result<f64, String> {
    arg.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{name} must be a number, got '{arg}'"))
}

fn observe(args: &[&str], now: Instant) -> Input {
    let [x, z] = args else {
        return Input::Invalid("usage: /observe <x> <z>".to_string());
    };
    match (number(x, "x"), number(z, "z")) {
        (Ok(x), Ok(z)) => Input::Observe(Observation::from_position(x, z, now)),
        (Err(e), _) | (_, Err(e)) => Input::Invalid(e),
    }
}

fn bearing(args: &[&str], now: Instant) -> Input {
    let (deg, range) = match args {
        [deg] => (number(deg, "bearing"), Ok(None)),
        [deg, range] => (number(deg, "bearing"), number(range, "range").map(Some)),
        _ => return Input::Invalid("usage: /bearing <deg> [range]".to_string()),
    };
    match (deg, range) {
        (Ok(deg), Ok(range)) => Input::Observe(Observation::at(deg, range, now)),
        (Err(e), _) | (_, Err(e)) => Input::Invalid(e),
    }
}

/// Carry out `input`. Returns `false` once the console should stop.
pub async fn execute(input: Input, dispatcher: &DispatcherHandle) -> bool {
    let result = match input {
        Input::Empty => Ok(()),
        Input::Exit => {
            println!("{}", "Goodbye.".green());
            return false;
        }
        Input::Help => {
            print_help();
            Ok(())
        }
        Input::Status => dispatcher.status().await.map(|mode| {
            println!("  Mode: {}", mode.to_string().bold());
        }),
        Input::Command(command) => dispatcher.submit(command).await,
        Input::Observe(observation) => dispatcher.on_observation(observation).await,
        Input::Invalid(message) => {
            println!(
                "{} {}. Type {} for available commands.",
                "Error:".red(),
                message,
                "/help".bold()
            );
            Ok(())
        }
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            println!("{}: {}", "Dispatcher unavailable".red(), e);
            false
        }
    }
}

fn print_help() {
    println!();
    println!("{}", "Asimov Commands".bold().underline());
    println!("  {}                    – shut down and exit", "exit".bold().cyan());
    println!("  {}                 – show the active mode", "/status".bold().cyan());
    println!(
        "  {} – enter a mode",
        "/follow /avoid /center /drink".bold().cyan()
    );
    println!("  {}                  – leave the active mode", "/leave".bold().cyan());
    println!(
        "  {} – manual moves",
        "/forward /backward /left /right /around".bold().cyan()
    );
    println!(
        "  {}     – stop, beep, or beep five times and exit",
        "/stop /beep /shutdown".bold().cyan()
    );
    println!("  {}        – feed a tracked position", "/observe <x> <z>".bold().cyan());
    println!("  {} – feed a bearing", "/bearing <deg> [range]".bold().cyan());
    println!();
}
