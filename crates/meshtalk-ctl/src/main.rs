//! meshtalk-ctl — offline tool for node ids and packet records.

use anyhow::{Context, Result};
use meshtalk_core::config::MeshtalkConfig;

mod cmd;

use cmd::node::{cmd_node_id, cmd_node_num};
use cmd::packet::{cmd_decode, cmd_encode_text};

fn print_usage() {
    println!("Usage: meshtalk-ctl <command>");
    println!();
    println!("Commands:");
    println!("  node-id <num>        Canonical id for a node number (decimal or 0x hex)");
    println!("  node-num <id>        Node number for a canonical id");
    println!("  encode-text [--to <id>] [--channel <n>] <text>");
    println!("                       Hex record of a queued text packet");
    println!("  decode <hex>         Show a hex record as JSON");
    println!();
    println!("Config: {}", MeshtalkConfig::file_path().display());
}

/// `encode-text` arguments after the command word.
fn encode_text(args: &[&str]) -> Result<String> {
    let mut to = None;
    let mut channel = None;
    let mut words: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--to" => {
                i += 1;
                to = Some(*args.get(i).context("--to requires a value")?);
            }
            "--channel" => {
                i += 1;
                channel = Some(
                    args.get(i)
                        .context("--channel requires a value")?
                        .parse::<u32>()
                        .context("--channel must be a number")?,
                );
            }
            word => words.push(word),
        }
        i += 1;
    }
    if words.is_empty() {
        anyhow::bail!("encode-text requires text");
    }

    let config = MeshtalkConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        MeshtalkConfig::default()
    });
    cmd_encode_text(&config.packets, to, channel, &words.join(" "))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let output = match args.as_slice() {
        ["node-id", num] => cmd_node_id(num)?,
        ["node-num", id] => cmd_node_num(id)?,
        ["encode-text", rest @ ..] => encode_text(rest)?,
        ["decode", record] => cmd_decode(record)?,
        ["help"] | ["--help"] | ["-h"] | [] => {
            print_usage();
            return Ok(());
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };
    println!("{output}");
    Ok(())
}
