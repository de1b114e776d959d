use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use libhangul::{create_keyboard, HangulConfig, Keyboard, KeyboardLayout};

/// Key typed as backspace in key strings read from the command line or stdin.
const BACKSPACE_KEY: char = '<';

#[derive(Parser)]
#[command(name = "libhangul")]
#[command(about = "Korean Hangul input method: compose syllables from layout keys")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Keyboard layout (overrides the config file)
    #[arg(long, value_enum, global = true)]
    layout: Option<LayoutArg>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Replace-cycle window in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive mode: each line is a key sequence applied to one field
    Repl,
    /// Type a key sequence into an empty field and print the text
    Type {
        /// Keys to press; `<` is backspace
        keys: String,
    },
    /// Print one JSON line per keystroke
    Trace {
        /// Keys to press; `<` is backspace
        keys: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum LayoutArg {
    TwoSet,
    Cheonjiin,
}

impl From<LayoutArg> for KeyboardLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::TwoSet => KeyboardLayout::TwoSet,
            LayoutArg::Cheonjiin => KeyboardLayout::Cheonjiin,
        }
    }
}

#[derive(Serialize)]
struct TraceLine<'a> {
    key: char,
    editing: &'a str,
    output: &'a str,
    text: &'a str,
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let subscriber = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn load_config(cli: &Cli) -> anyhow::Result<HangulConfig> {
    let mut config = match &cli.config_file {
        Some(path) => HangulConfig::load_toml(path)?,
        None => HangulConfig::default(),
    };
    if let Some(layout) = cli.layout {
        config.layout = layout.into();
    }
    if let Some(millis) = cli.timeout_ms {
        config.base_mut().set_replace_input_timeout_ms(millis);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_repl(keyboard: &mut Keyboard) -> anyhow::Result<()> {
    println!(
        "libhangul ({}) - type keys and press Enter; `{}` is backspace",
        keyboard.layout().name(),
        BACKSPACE_KEY
    );
    match keyboard.layout() {
        KeyboardLayout::TwoSet => println!("Example: dkssudgktpdy for 안녕하세요"),
        KeyboardLayout::Cheonjiin => println!("Example: 0125 52210 for 안녕"),
    }
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("error reading stdin")?;
        println!("{}", keyboard.type_keys(&line));
    }
    Ok(())
}

fn run_trace(keyboard: &mut Keyboard, keys: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for key in keys.chars() {
        let composed = keyboard.press(key);
        let line = TraceLine {
            key,
            editing: &composed.editing,
            output: &composed.output,
            text: keyboard.text(),
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let mut keyboard = create_keyboard(&config)?.with_backspace_key(BACKSPACE_KEY);

    match cli.command {
        Some(Commands::Repl) | None => run_repl(&mut keyboard)?,
        Some(Commands::Type { keys }) => println!("{}", keyboard.type_keys(&keys)),
        Some(Commands::Trace { keys }) => run_trace(&mut keyboard, &keys)?,
        Some(Commands::Config) => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
