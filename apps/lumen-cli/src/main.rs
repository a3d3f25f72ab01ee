mod hooks;

use std::cell::Cell;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lumen_common::{Clock, Config, MonotonicClock};
use lumen_engine::{Game, resolve_map_path, DEFAULT_MAP};
use lumen_input::HeadlessWindow;
use lumen_tools::{Console, ConsoleOutcome, InspectorOverlay, ScriptError, ScriptHost, Value};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::hooks::SessionHooks;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "Headless runner for the lumen game core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

/// Configuration file plus per-run overrides.
#[derive(Args)]
struct Settings {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Map name, resolved against the data directory
    #[arg(long, global = true)]
    map: Option<String>,
    /// Map file path, used as given
    #[arg(long, global = true)]
    map_path: Option<PathBuf>,
    /// Data directory for maps, screenshots and console history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Time every cycle phase in the log
    #[arg(long, global = true)]
    profile: bool,
    /// Open the developer console before the game starts
    #[arg(long, global = true)]
    console: bool,
    /// Leave the cursor unlocked
    #[arg(long, global = true)]
    show_cursor: bool,
}

impl Settings {
    fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(map) = &self.map {
            config.map = Some(map.clone());
        }
        if let Some(path) = &self.map_path {
            config.map_path = Some(path.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        config.profiler_enabled |= self.profile;
        config.console_enabled |= self.console;
        config.cursor_visible |= self.show_cursor;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the game loop headless for a number of cycles
    Run {
        /// Cycles before the window asks to close
        #[arg(short, long, default_value = "120")]
        cycles: u64,
        /// Simulated milliseconds per cycle
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Use the wall clock instead of fixed steps
        #[arg(long)]
        realtime: bool,
        /// Print the final world summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open the developer console only
    Console,
}

/// Advances by a fixed step on every reading.
struct SteppedClock {
    now: Cell<u64>,
    step: u64,
}

impl Clock for SteppedClock {
    fn now_millis(&self) -> u64 {
        let now = self.now.get() + self.step;
        self.now.set(now);
        now
    }
}

fn script_host(config: &Config) -> ScriptHost {
    let mut host = ScriptHost::new();
    host.register_fn("version", |_| Ok(Value::Str(env!("CARGO_PKG_VERSION").into())));
    let map = resolve_map_path(config, DEFAULT_MAP).display().to_string();
    host.register_fn("map", move |_| Ok(Value::Str(map.clone())));
    host.register_fn("add", |args| {
        let mut sum = 0.0;
        for arg in args {
            match arg {
                Value::Num(n) => sum += n,
                other => {
                    return Err(ScriptError::Host {
                        function: "add".into(),
                        message: format!("expected a number, got {other}"),
                    });
                }
            }
        }
        Ok(Value::Num(sum))
    });
    host
}

fn open_console(config: &Config) -> Result<ConsoleOutcome> {
    let mut console = Console::new()
        .with_history_file(config.data_dir.join("history.txt"))
        .with_script_host(script_host(config));
    let stdin = io::stdin();
    let outcome = console
        .run(stdin.lock(), io::stdout())
        .context("console i/o")?;
    tracing::info!(?outcome, "console closed");
    Ok(outcome)
}

fn run_game(config: Config, cycles: u64, frame_ms: u64, realtime: bool, json: bool) -> Result<()> {
    let window = HeadlessWindow::new(config.window.width, config.window.height).close_after(cycles);
    let builder = Game::builder(config)
        .hooks(SessionHooks::default())
        .window(window)
        .overlay(InspectorOverlay::new(false));
    let builder = if realtime {
        builder.clock(MonotonicClock::new())
    } else {
        builder.clock(SteppedClock {
            now: Cell::new(0),
            step: frame_ms,
        })
    };
    let mut game = builder.build();

    game.setup().context("game setup")?;
    game.run().context("game loop")?;

    let hooks = game.hooks();
    match hooks.last_summary() {
        Some(summary) if json => println!("{}", serde_json::to_string_pretty(summary)?),
        Some(summary) => {
            println!("{summary}");
            println!("{}", summary.player);
        }
        None => println!("no world ran"),
    }
    tracing::info!(worlds = hooks.worlds_started(), fps = game.fps(), "session finished");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.settings.load()?;

    let filter = if cli.verbose { "debug" } else { "info" };
    let spans = if config.profiler_enabled {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_span_events(spans)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", lumen_common::crate_info());
            println!("input: {}", lumen_input::crate_info());
            println!("kernel: {}", lumen_kernel::crate_info());
            println!("render: {}", lumen_render::crate_info());
            println!("tools: {}", lumen_tools::crate_info());
            println!("engine: {}", lumen_engine::crate_info());
            println!("map: {}", resolve_map_path(&config, DEFAULT_MAP).display());
        }
        Commands::Run {
            cycles,
            frame_ms,
            realtime,
            json,
        } => {
            if config.console_enabled && !open_console(&config)?.continue_to_game() {
                return Ok(());
            }
            run_game(config, cycles, frame_ms, realtime, json)?;
        }
        Commands::Console => {
            open_console(&config)?;
        }
    }

    Ok(())
}
