//! Dump the debugging information in an ELF object file, or look up
//! the source location of an address.

use std::io::{self, Write};
use std::num::ParseIntError;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use debugread::display::{self, DefaultFormatter, Formatter};
use debugread::{AnyEndian, Dwarf, File, SectionKind};

#[derive(Debug, Parser)]
#[command(about = "Dump DWARF and STABS debugging information")]
struct Args {
    /// The object file to read.
    file: PathBuf,

    /// Print the source location of this address instead of dumping.
    /// Accepts decimal or a 0x prefixed hexadecimal.
    #[arg(long, value_parser = parse_address)]
    address: Option<u64>,
}

fn parse_address(s: &str) -> Result<u64, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = debugread::elf::load(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    if let Some(address) = args.address {
        return lookup(&file, address);
    }

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut f = DefaultFormatter::new(&mut stdout, 2);

    if file.has_dwarf() {
        dump_dwarf(&mut f, &file)?;
    }
    if file.has_stabs() {
        let units = file.stab_units().context("reading stab sections")?;
        for unit in &units {
            display::dump_stab_unit(&mut f, unit)?;
        }
    }
    if !file.has_dwarf() && !file.has_stabs() {
        writeln!(io::stderr(), "{}: no debugging information", args.file.display())?;
    }
    Ok(())
}

fn lookup(file: &File, address: u64) -> anyhow::Result<()> {
    let mut dwarf = file.dwarf();
    match dwarf.source_for_address(address)? {
        Some(location) => println!(
            "0x{:x}: {}:{}",
            address,
            String::from_utf8_lossy(&location.path),
            location.line
        ),
        None => println!("0x{:x}: no source information", address),
    }
    Ok(())
}

/// Dump every DWARF section, reporting per table errors without
/// giving up on the sections that remain.
fn dump_dwarf(f: &mut DefaultFormatter<'_>, file: &File) -> anyhow::Result<()> {
    let mut dwarf: Dwarf<'_, AnyEndian> = file.dwarf();

    let units = dwarf.compilation_units()?;
    for unit in units.iter() {
        display::dump_unit(f, unit)?;
        if let Some(offset) = unit.stmt_list() {
            match dwarf.line_program(offset) {
                Ok(program) => display::dump_line_program(f, &program)?,
                Err(err) => write!(f, "line number program at 0x{:x}: {}", offset, err)?,
            }
        }
        if let Some((kind, offset)) = unit.macro_offset() {
            match dwarf.macro_table(kind, offset) {
                Ok(table) => display::dump_macro_table(f, &table)?,
                Err(err) => write!(f, "macro table at 0x{:x}: {}", offset, err)?,
            }
        }
    }

    if file.section(SectionKind::DebugAranges).is_some() {
        match dwarf.aranges() {
            Ok(sets) => {
                for set in sets.iter() {
                    display::dump_range_set(f, set)?;
                }
            }
            Err(err) => write!(f, ".debug_aranges: {}", err)?,
        }
    }

    if file.section(SectionKind::DebugPubnames).is_some() {
        match dwarf.pubnames() {
            Ok(sets) => {
                for set in sets.iter() {
                    display::dump_name_set(f, set)?;
                }
            }
            Err(err) => write!(f, ".debug_pubnames: {}", err)?,
        }
    }

    match dwarf.relocations() {
        Ok(Some(table)) => display::dump_relocations(f, &table)?,
        Ok(None) => {}
        Err(err) => write!(f, ".rela.debug_info: {}", err)?,
    }

    Ok(())
}
