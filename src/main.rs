// Asm6502 - A cross-assembler for the MOS 6502 creating C64 binaries
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Asm6502 Assembler CLI
//!
//! A cross-assembler for the MOS 6502 producing C64 binaries.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

use asm6502::error::{format_error, render_report};
use asm6502::output::{format_from_extension, symbol_dump, write_output};

const EXIT_ASSEMBLY_ERRORS: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_READ_FAILED: u8 = 3;
const EXIT_WRITE_FAILED: u8 = 4;

/// Asm6502 - A cross-assembler for the MOS 6502
#[derive(Parser, Debug)]
#[command(name = "asm6502")]
#[command(author = "Marcel Joachim Kloubert")]
#[command(version)]
#[command(about = "A cross-assembler for the MOS 6502 producing C64 binaries")]
#[command(long_about = r#"
Asm6502 assembles MOS 6502 source files into binaries for the
Commodore 64 home computer.

The output can be either:
  - PRG files (.prg) - Raw C64 program files
  - D64 files (.d64) - Disk images for use with emulators

Besides the binary it can write a machine code listing and a BASIC
program that POKEs the assembled bytes into memory.

Example usage:
  asm6502 border.asm -o border.prg
  asm6502 border.asm -o border.d64 -l -
  asm6502 border.asm -b border.bas
"#)]
struct Cli {
    /// Source file to assemble
    source: PathBuf,

    /// Output file (.prg or .d64)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the machine code listing to a file ("-" for stdout)
    #[arg(short, long)]
    listing: Option<PathBuf>,

    /// Write the BASIC loader listing to a file ("-" for stdout)
    #[arg(short, long)]
    basic: Option<PathBuf>,

    /// Print one line per diagnostic instead of source excerpts
    #[arg(long)]
    plain: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Maximum level of log messages written to stderr
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let format = match &cli.output {
        Some(path) => match format_from_extension(path) {
            Some(format) => Some(format),
            None => {
                eprintln!("Error: Unknown output format. Use .prg or .d64 extension.");
                return ExitCode::from(EXIT_USAGE);
            }
        },
        None => None,
    };

    if cli.output.is_none() && cli.listing.is_none() && cli.basic.is_none() {
        eprintln!("Error: Nothing to write. Use -o <file.prg>, -o <file.d64>, -l <file> or -b <file>.");
        return ExitCode::from(EXIT_USAGE);
    }

    if cli.verbose {
        println!("Asm6502 Assembler v{}", asm6502::VERSION);
        if let (Some(path), Some(format)) = (&cli.output, format) {
            println!("Output: {} ({:?})", path.display(), format);
        }
        println!("Source: {}", cli.source.display());
        println!();
    }

    let source = match std::fs::read_to_string(&cli.source) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", cli.source.display(), e);
            return ExitCode::from(EXIT_READ_FAILED);
        }
    };

    let file_name = cli
        .source
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(asm6502::error::DEFAULT_FILE_NAME);

    if cli.verbose {
        println!("Assembling...");
    }

    let assembly = match asm6502::assemble_named(&source, file_name) {
        Ok(assembly) => assembly,
        Err(errors) => {
            let color = !cli.plain && io::stderr().is_terminal();
            for error in &errors {
                if cli.plain {
                    eprintln!("{}", format_error(error));
                } else {
                    eprint!("{}", render_report(error, &source, color));
                }
            }
            eprintln!(
                "{} error{} found, no output written.",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            );
            return ExitCode::from(EXIT_ASSEMBLY_ERRORS);
        }
    };

    if cli.verbose {
        println!(
            "Assembled {} memory block(s), {} symbol(s)",
            assembly.mem_blocks.len(),
            assembly.symbols.len()
        );
    }

    if let (Some(path), Some(format)) = (&cli.output, format) {
        let program_name = cli
            .source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("PROGRAM");

        if cli.verbose {
            println!("Writing {}...", path.display());
        }
        if let Err(e) = write_output(&assembly.prg_image(), path, format, program_name) {
            eprintln!("Error: Cannot write {}: {}", path.display(), e);
            return ExitCode::from(EXIT_WRITE_FAILED);
        }
    }

    if let Some(path) = &cli.listing {
        let mut listing = assembly.listing(true);
        if !assembly.symbols.is_empty() {
            listing.push('\n');
            listing.push_str(&symbol_dump(&assembly.symbols));
        }
        if let Err(e) = write_text(path, &listing) {
            eprintln!("Error: Cannot write {}: {}", path.display(), e);
            return ExitCode::from(EXIT_WRITE_FAILED);
        }
    }

    if let Some(path) = &cli.basic {
        if let Err(e) = write_text(path, &assembly.basic_loader()) {
            eprintln!("Error: Cannot write {}: {}", path.display(), e);
            return ExitCode::from(EXIT_WRITE_FAILED);
        }
    }

    if cli.verbose {
        println!("Done!");
    } else if let Some(path) = &cli.output {
        println!(
            "Assembled {} -> {}",
            cli.source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy(),
            path.display()
        );
    }

    ExitCode::SUCCESS
}

/// Write text to a file, or to stdout for `-`.
fn write_text(path: &Path, text: &str) -> io::Result<()> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    } else {
        std::fs::write(path, text)
    }
}

