//! `asimov-cli` – Asimov robot console
//!
//! This binary is the process entry point for the robot command stack. It:
//!
//! 1. Loads `~/.asimov/config.toml` (writing the defaults on first run) and
//!    applies `ASIMOV_*` environment overrides.
//! 2. Connects to the robot server (or starts the simulator), greets the
//!    robot and spawns the dispatcher.
//! 3. Reads console commands until `exit`, a shutdown command, Ctrl-C, or a
//!    lost link, then sends `END` and closes the connection.

mod config;
mod repl;

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use asimov_hal::RobotController;
use asimov_link::{CommandTransport, SimTransport, TcpCommandLink};
use asimov_runtime::RuntimeContext;
use colored::Colorize;
use tokio::sync::mpsc;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (default "info"); ASIMOV_LOG_FORMAT=json
    // switches to newline-delimited JSON. Console output stays on println!.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("ASIMOV_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let mut cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  {} Default config written to {}",
                    "✓".green().bold(),
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Error saving config".red(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };
    config::apply_env_overrides(&mut cfg);

    // ── Robot link ────────────────────────────────────────────────────────
    let link: Arc<dyn CommandTransport> = if cfg.simulate {
        println!("  {} commands go to the simulator", "Simulation:".yellow());
        Arc::new(SimTransport::new())
    } else {
        print!("  Connecting to {}:{} … ", cfg.host, cfg.port);
        std::io::stdout().flush().ok();
        match TcpCommandLink::connect_with_timeout(&cfg.host, cfg.port, cfg.read_timeout()).await {
            Ok(link) => {
                println!("{}", "connected".green());
                Arc::new(link)
            }
            Err(e) => {
                println!("{}", "failed".red());
                error!(error = %e, "could not reach the robot server");
                return ExitCode::FAILURE;
            }
        }
    };

    let robot = RobotController::new(link.clone()).with_beep_settle(cfg.beep_settle());
    let ctx = match RuntimeContext::start_with(robot, cfg.behavior.clone()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "robot did not accept the startup sequence");
            link.close().await;
            return ExitCode::FAILURE;
        }
    };

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let trigger = ctx.shutdown_trigger();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – shutting down …".yellow().bold());
        trigger.send_replace(true);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    // ── Console loop ──────────────────────────────────────────────────────
    let mut lines = spawn_console_reader();
    let mut signal = ctx.shutdown_signal();
    let dispatcher = ctx.dispatcher();
    loop {
        tokio::select! {
            _ = signal.wait_for(|stop| *stop) => break,
            line = lines.recv() => {
                let Some(line) = line else { break };
                if !repl::execute(repl::parse(&line, Instant::now()), &dispatcher).await {
                    break;
                }
            }
        }
    }

    match ctx.shutdown().await {
        Ok(()) => {
            println!("{}", "  ✓ Connection closed.".green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}: {}", "Robot link lost".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Read stdin on a plain thread; the async side receives whole lines.
/// The channel closes on EOF or a read error.
fn spawn_console_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        loop {
            print!("{} ", "asimov>".bold().cyan());
            std::io::stdout().flush().ok();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    eprintln!("{}: {}", "Read error".red(), e);
                    break;
                }
            }
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_banner() {
    println!();
    println!("{}", r#"    ___        _                   "#.bold().cyan());
    println!("{}", r#"   /   |  ___ (_)___ ___  ____ _   __"#.bold().cyan());
    println!("{}", r#"  / /| | / __/ / __ `__ \/ __ \ | / /"#.bold().cyan());
    println!("{}", r#" / ___ |(__  ) / / / / / / /_/ / |/ / "#.bold().cyan());
    println!("{}", r#"/_/  |_/____/_/_/ /_/ /_/\____/|___/  "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Asimov".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Robot command console");
    println!();
}
