use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of input source file
    file: String,
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let path = Path::new(&cli.file);
    let text = fs::read_to_string(path)?;

    if let Err(err) = minic::analyze(&text) {
        eprintln!("{}", format!("fatal: {err}").red());
        std::process::exit(-1);
    }

    Ok(())
}
