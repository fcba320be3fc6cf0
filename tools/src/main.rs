//! viet-cli: developer tool for the libviet engine.
//!
//! `type` replays a key string through a fresh engine and prints what the
//! screen would show; `check` runs the phonology validator on a syllable;
//! `config` round-trips a settings file. Handy while tuning tables without
//! wiring up a host shell.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use libviet_core::{keys, Action, Cell, Config, Engine, InputMethod};

#[derive(Parser)]
#[command(name = "viet-cli", about = "Vietnamese IME engine workbench")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a key string and print the resulting text.
    ///
    /// Keys are letters, digits and spaces; `<` is backspace.
    Type {
        /// The keys to replay, e.g. "xin chaof" or "d9u7o7c5".
        input: String,
        /// Input method: telex or vni.
        #[arg(long, default_value = "telex")]
        method: String,
        /// Use traditional tone placement (hòa instead of hoà).
        #[arg(long)]
        traditional: bool,
        /// Load shortcuts and flags from a config file first.
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },
    /// Check a composed syllable against the phonology rules.
    Check {
        /// A syllable, e.g. "nghiêng" or "qả".
        syllable: String,
    },
    /// Validate a config file and echo it normalized.
    Config { path: std::path::PathBuf },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Type {
            input,
            method,
            traditional,
            config,
        } => run_type(&input, &method, traditional, config.as_deref()),
        Command::Check { syllable } => run_check(&syllable),
        Command::Config { path } => run_config(&path),
    }
}

fn run_type(
    input: &str,
    method: &str,
    traditional: bool,
    config: Option<&std::path::Path>,
) -> Result<()> {
    let mut engine = match config {
        Some(path) => {
            let cfg = Config::load_toml(path)
                .map_err(|e| anyhow::anyhow!("load config {}: {}", path.display(), e))?;
            Engine::with_config(&cfg)
        }
        None => Engine::new(),
    };
    engine.set_method(match method {
        "telex" => InputMethod::Telex,
        "vni" => InputMethod::Vni,
        other => bail!("unknown method {:?}; use telex or vni", other),
    });
    engine.set_modern_tone(!traditional);

    let mut screen = String::new();
    for ch in input.chars() {
        if ch == '<' {
            screen.pop();
            engine.on_key(keys::BACKSPACE, false, false, false);
            continue;
        }
        let Some(key) = keys::key_for_char(ch) else {
            continue;
        };
        let caps = ch.is_ascii_uppercase();
        let r = engine.on_key(key, caps, false, false);
        match r.action {
            Action::Send | Action::Restore => {
                for _ in 0..r.backspace {
                    screen.pop();
                }
                screen.extend(r.text());
            }
            Action::None => screen.push(ch),
        }
    }
    println!("{}", screen);
    Ok(())
}

fn run_check(syllable: &str) -> Result<()> {
    let cells: Vec<Cell> = syllable
        .chars()
        .map(|ch| {
            if ch == 'đ' || ch == 'Đ' {
                let mut c = Cell::new(b'd', ch == 'Đ');
                c.stroke = true;
                Ok(c)
            } else if let Some((base, mark, tone, caps)) = libviet_core::chars::decompose(ch) {
                let mut c = Cell::new(base, caps);
                c.mark = mark;
                c.tone = tone;
                Ok(c)
            } else if ch.is_ascii_alphabetic() {
                Ok(Cell::new(
                    ch.to_ascii_lowercase() as u8,
                    ch.is_ascii_uppercase(),
                ))
            } else {
                bail!("not a Vietnamese letter: {:?}", ch)
            }
        })
        .collect::<Result<_>>()?;

    match libviet_core::syllable::split(&cells) {
        Some(parts) => {
            let seg = |r: std::ops::Range<usize>| -> String {
                cells[r].iter().map(|c| c.shape()).collect()
            };
            println!(
                "onset={:?} nucleus={:?} coda={:?}",
                seg(parts.onset),
                seg(parts.nucleus),
                seg(parts.coda)
            );
        }
        None => println!("no syllable structure"),
    }

    if libviet_core::is_valid(&cells) {
        println!("valid Vietnamese syllable");
    } else {
        println!("NOT a valid Vietnamese syllable");
    }
    Ok(())
}

fn run_config(path: &std::path::Path) -> Result<()> {
    let cfg = Config::load_toml(path)
        .map_err(|e| anyhow::anyhow!("load config {}: {}", path.display(), e))?;
    let text = cfg
        .to_toml_string()
        .context("serialize normalized config")?;
    print!("{}", text);
    Ok(())
}
