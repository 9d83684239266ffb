mod extract;
mod format;
mod insert;
mod replace;
mod tokens;

use std::io::Read;

use anyhow::{Context, Result};
use confedit_core::{gap, Source};

use crate::args::{Command, ConfeditArgs};
use crate::dry_run::DryRunGuard;

pub fn run(args: ConfeditArgs) -> Result<()> {
    let (name, buffer) = read_input(&args.file)?;
    let mut source = Source::new(name.clone(), buffer.clone());

    let diagnostic_mode = matches!(args.command, Command::Tokens { .. });
    if !diagnostic_mode {
        gap::check_unknown_gaps(&source)?;
    }

    let guard = if args.dry_run {
        Some(DryRunGuard::new(&name, &buffer, !args.no_color)?)
    } else {
        None
    };

    let output = match &args.command {
        Command::Format => format::run(&source)?,
        Command::Tokens { processed } => tokens::run(&source, *processed)?,
        Command::Insert { text, site } => insert::run(&source, text, site)?,
        Command::Replace { from, to, site } => replace::run(&source, from, to, site)?,
        Command::Extract {
            from,
            to,
            strip_whitespace,
            site,
        } => extract::run(&mut source, from, to.as_deref(), *strip_whitespace, site)?,
    };

    match guard {
        Some(guard) => {
            let code = guard.finish(&output)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        None => print!("{output}"),
    }

    Ok(())
}

fn read_input(file: &str) -> Result<(String, String)> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(("<stdin>".to_string(), buf))
    } else {
        let buf = std::fs::read_to_string(file).with_context(|| format!("reading {file}"))?;
        Ok((file.to_string(), buf))
    }
}
