//! The legacy STABS path: compilation unit facts recovered from the
//! a.out style symbol records some compilers emit instead of DWARF.

use crate::constant;
use crate::constant::StabType;
use crate::endian::Endian;
use crate::read::{string_at, Cursor, ReadError};

/// A compilation unit recovered from STABS records.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StabUnit {
    /// The compilation directory, normally with a trailing slash.
    pub directory: Vec<u8>,
    /// The source file path, after repair (see [`repair_source_name`]).
    pub source: Vec<u8>,
    /// The raw compiler invocation, if recorded.
    pub command_line: Option<Vec<u8>>,
    /// The object file path, if recorded.
    pub object: Option<Vec<u8>>,
    /// The line of the main program entry point, if this unit has one.
    pub main_line: Option<u16>,
    /// The language tag from the source file record.
    pub language: u16,
}

impl StabUnit {
    pub fn has_main(&self) -> bool {
        self.main_line.is_some()
    }

    /// The source path joined with the compilation directory when it
    /// is relative.
    pub fn source_path(&self) -> Vec<u8> {
        join(&self.directory, &self.source)
    }
}

/// Scan a stab section and its string table into compilation units.
///
/// Records are the 12 byte a.out form. Each module carries its own
/// string sub-table; an undefined record marks the module boundary and
/// its value advances the running string partition base.
pub fn read_units<E: Endian>(
    stab: &[u8],
    stabstr: &[u8],
    endian: E,
) -> Result<Vec<StabUnit>, ReadError> {
    let mut c = Cursor::new(stab, endian);
    let mut units = Vec::new();
    let mut builder = Builder::default();
    let mut str_base = 0;
    let mut next_base = 0;

    while c.remaining().len() >= 12 {
        let strx = u64::from(c.read_u32()?);
        let kind = StabType(c.read_u8()?);
        c.read_u8()?; // other
        let desc = c.read_u16()?;
        let value = c.read_u32()?;

        match kind {
            constant::N_UNDF => {
                str_base = next_base;
                next_base = str_base + u64::from(value);
                if let Some(name) = string_at(stabstr, str_base + strx) {
                    if !name.is_empty() {
                        builder.last_undef = Some(name.to_vec());
                    }
                }
            }
            constant::N_SO => {
                let name = string_at(stabstr, str_base + strx).unwrap_or(b"");
                if name.last() == Some(&b'/') {
                    builder.flush_into(&mut units);
                    builder.directory = name.to_vec();
                } else {
                    if builder.source.is_some() {
                        builder.flush_into(&mut units);
                    }
                    builder.source = Some(name.to_vec());
                    builder.language = desc;
                }
            }
            constant::N_OBJ => {
                if let Some(name) = string_at(stabstr, str_base + strx) {
                    builder.object = Some(name.to_vec());
                }
            }
            constant::N_CMDLINE => {
                if let Some(text) = string_at(stabstr, str_base + strx) {
                    builder.command_line = Some(text.to_vec());
                }
            }
            constant::N_MAIN => {
                builder.main_line = Some(desc);
            }
            _ => {}
        }
    }
    builder.flush_into(&mut units);
    Ok(units)
}

/// Per-module state accumulated while scanning the record stream.
#[derive(Debug, Default)]
struct Builder {
    directory: Vec<u8>,
    source: Option<Vec<u8>>,
    command_line: Option<Vec<u8>>,
    object: Option<Vec<u8>>,
    main_line: Option<u16>,
    language: u16,
    last_undef: Option<Vec<u8>>,
}

impl Builder {
    fn flush_into(&mut self, units: &mut Vec<StabUnit>) {
        let source = match self.source.take() {
            Some(source) => source,
            None => {
                // Nothing accumulated yet; keep the directory and the
                // undef hint for the module that is about to start.
                // The hint record precedes the directory record, so
                // clearing it here would lose it before the source
                // name arrives.
                self.command_line = None;
                self.object = None;
                self.main_line = None;
                return;
            }
        };
        let directory = std::mem::take(&mut self.directory);
        let command_line = self.command_line.take();
        let hint = self.last_undef.take();

        let mut source = source;
        if let (Some(hint), Some(cmd)) = (&hint, &command_line) {
            if !source.ends_with(hint) {
                if let Some(repaired) = repair_source_name(&directory, cmd, hint) {
                    source = repaired;
                }
            }
        }

        units.push(StabUnit {
            directory,
            source,
            command_line,
            object: self.object.take(),
            main_line: self.main_line.take(),
            language: std::mem::take(&mut self.language),
        });
    }
}

/// Recover the real source path from the compiler command line.
///
/// Preprocessor driven builds record an intermediate file (a Fortran
/// `.f` generated from `.y`, say) as the source while the undefined
/// symbol hint names the file the user wrote. This re-splits the
/// command line on whitespace and takes the first argument ending
/// with the hint, joined to the compilation directory when relative.
///
/// Splitting is best effort: quoting and escaping in arguments are
/// not understood, so a hint hidden inside a quoted argument is not
/// recovered.
pub fn repair_source_name(directory: &[u8], command_line: &[u8], hint: &[u8]) -> Option<Vec<u8>> {
    if hint.is_empty() {
        return None;
    }
    command_line
        .split(|&byte| byte == b' ' || byte == b'\t' || byte == b';')
        .find(|arg| !arg.is_empty() && arg.ends_with(hint))
        .map(|arg| join(directory, arg))
}

fn join(directory: &[u8], path: &[u8]) -> Vec<u8> {
    if path.first() == Some(&b'/') || directory.is_empty() {
        return path.to_vec();
    }
    let mut full = Vec::with_capacity(directory.len() + 1 + path.len());
    full.extend_from_slice(directory);
    if directory.last() != Some(&b'/') {
        full.push(b'/');
    }
    full.extend_from_slice(path);
    full
}
