use std::borrow::Cow;

use crate::constant;
use crate::constant::{DwLne, DwLns};
use crate::endian::Endian;
use crate::read::{Cursor, ReadError};

/// A line number program from the `.debug_line` section.
///
/// The header is decoded eagerly; the opcode stream is kept as raw
/// bytes and interpreted on demand by [`LineProgram::lines`] and
/// [`LineProgram::line_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineProgram<'data, E: Endian> {
    pub offset: u64,
    pub version: u16,
    pub offset_size: u8,
    pub min_instruction_length: u8,
    pub max_ops_per_instruction: u8,
    pub default_is_stmt: bool,
    pub line_base: i8,
    pub line_range: u8,
    pub opcode_base: u8,
    pub standard_opcode_lengths: &'data [u8],
    pub include_directories: Vec<&'data [u8]>,
    pub file_entries: Vec<FileEntry<'data>>,
    program: &'data [u8],
    endian: E,
}

impl<'data, E: Endian> LineProgram<'data, E> {
    /// Read a line number program header. `offset` is the program's
    /// position relative to the start of `.debug_line`.
    pub fn read(c: &mut Cursor<'data, E>, offset: u64) -> Result<LineProgram<'data, E>, ReadError> {
        let (offset_size, unit_length) = c.read_initial_length()?;
        let end = c.pos() + unit_length;

        let version = c.read_u16()?;
        if version < 2 || version > 4 {
            return Err(ReadError::Unsupported("line number program version"));
        }

        let header_length = c.read_offset(offset_size)?;
        let header_end = c
            .pos()
            .checked_add(header_length)
            .ok_or(ReadError::Malformed("line program header length"))?;
        if header_end > end {
            return Err(ReadError::Malformed("line program header length"));
        }

        let min_instruction_length = c.read_u8()?;
        if min_instruction_length == 0 {
            return Err(ReadError::Malformed("minimum instruction length"));
        }
        let max_ops_per_instruction = if version >= 4 {
            let val = c.read_u8()?;
            if val == 0 {
                return Err(ReadError::Malformed("maximum operations per instruction"));
            }
            val
        } else {
            1
        };
        let default_is_stmt = c.read_u8()? != 0;
        let line_base = c.read_i8()?;
        let line_range = c.read_u8()?;
        if line_range == 0 {
            return Err(ReadError::Malformed("line range"));
        }
        let opcode_base = c.read_u8()?;
        if opcode_base == 0 {
            return Err(ReadError::Malformed("opcode base"));
        }
        let standard_opcode_lengths = c.read_block(u64::from(opcode_base) - 1)?;

        let mut include_directories = Vec::new();
        loop {
            let dir = c.read_cstring()?;
            if dir.is_empty() {
                break;
            }
            include_directories.push(dir);
        }

        let mut file_entries = Vec::new();
        loop {
            let path = c.read_cstring()?;
            if path.is_empty() {
                break;
            }
            file_entries.push(FileEntry::read_rest(c, path)?);
        }

        // Some producers pad the header; trust the declared length.
        if c.pos() > header_end {
            return Err(ReadError::Malformed("line program header"));
        }
        c.seek(header_end)?;
        let program = c.read_block(end - header_end)?;

        Ok(LineProgram {
            offset,
            version,
            offset_size,
            min_instruction_length,
            max_ops_per_instruction,
            default_is_stmt,
            line_base,
            line_range,
            opcode_base,
            standard_opcode_lengths,
            include_directories,
            file_entries,
            program,
            endian: c.endian(),
        })
    }

    /// All line number facts produced by the program.
    pub fn lines(&self) -> Result<Vec<LineNumber<'data>>, ReadError> {
        self.run(0)
    }

    /// The first fact whose address range contains `target`.
    ///
    /// The target must be non-zero; an address of zero selects the
    /// extract-all semantics of [`LineProgram::lines`] instead, so
    /// here it just returns `None`.
    pub fn line_for(&self, target: u64) -> Result<Option<LineNumber<'data>>, ReadError> {
        if target == 0 {
            return Ok(None);
        }
        Ok(self.run(target)?.into_iter().next())
    }

    /// The file table entry for a (zero based) file index, including
    /// entries defined inline by the program itself.
    pub fn file(&self, index: u64) -> Option<&FileEntry<'data>> {
        self.file_entries.get(index as usize)
    }

    /// The path of a file entry, joined with its include directory
    /// when the path is relative.
    pub fn full_path(&self, entry: &FileEntry<'data>) -> Cow<'data, [u8]> {
        if entry.path.first() == Some(&b'/') || entry.directory == 0 {
            return Cow::Borrowed(entry.path);
        }
        match self.include_directories.get(entry.directory as usize - 1) {
            Some(&dir) => {
                let mut path = Vec::with_capacity(dir.len() + 1 + entry.path.len());
                path.extend_from_slice(dir);
                if dir.last() != Some(&b'/') {
                    path.push(b'/');
                }
                path.extend_from_slice(entry.path);
                Cow::Owned(path)
            }
            None => Cow::Borrowed(entry.path),
        }
    }

    fn run(&self, target: u64) -> Result<Vec<LineNumber<'data>>, ReadError> {
        let mut c = Cursor::new(self.program, self.endian);
        let mut files = self.file_entries.clone();
        let mut defined_inline = false;
        let mut regs = Registers::new();
        let mut lines = Vec::new();

        while !c.is_empty() {
            let opcode = c.read_u8()?;

            if opcode >= self.opcode_base {
                let adjusted = opcode - self.opcode_base;
                let op_advance = u64::from(adjusted / self.line_range);
                let line_delta =
                    i64::from(self.line_base) + i64::from(adjusted % self.line_range);
                let mut next = regs;
                next.advance(
                    op_advance,
                    self.min_instruction_length,
                    self.max_ops_per_instruction,
                );
                next.line = regs.line.wrapping_add(line_delta as u64);
                if let Some(line) = emit(
                    &files,
                    defined_inline,
                    next.file,
                    next.line,
                    regs.base_address,
                    next.address,
                ) {
                    if target == 0 {
                        lines.push(line);
                    } else if line.contains(target) {
                        return Ok(vec![line]);
                    }
                }
                next.base_address = next.address;
                regs = next;
                continue;
            }

            match DwLns(opcode) {
                constant::DW_LNS_extended => {
                    let len = c.read_uleb128()?;
                    if len == 0 {
                        return Err(ReadError::Malformed("extended line opcode"));
                    }
                    let block = c.read_block(len)?;
                    let mut ec = Cursor::new(block, self.endian);
                    match DwLne(ec.read_u8()?) {
                        constant::DW_LNE_end_sequence => {
                            if let Some(line) = emit(
                                &files,
                                defined_inline,
                                regs.file,
                                regs.line,
                                regs.base_address,
                                regs.address,
                            ) {
                                if target == 0 {
                                    lines.push(line);
                                } else if line.contains(target) {
                                    return Ok(vec![line]);
                                }
                            }
                            regs = Registers::new();
                        }
                        constant::DW_LNE_set_address => {
                            // The operand fills the rest of the block.
                            let address_size = (len - 1) as u8;
                            regs.address = ec.read_address(address_size)?;
                            regs.op_index = 0;
                            regs.base_address = regs.address;
                        }
                        constant::DW_LNE_define_file => {
                            files.push(FileEntry::read(&mut ec)?);
                            defined_inline = true;
                        }
                        constant::DW_LNE_set_discriminator => {
                            ec.read_uleb128()?;
                        }
                        // Vendor extensions are skipped; the length
                        // prefix already consumed the operands.
                        _ => {}
                    }
                }
                constant::DW_LNS_copy => {
                    if let Some(line) = emit(
                        &files,
                        defined_inline,
                        regs.file,
                        regs.line,
                        regs.base_address,
                        regs.address,
                    ) {
                        if target == 0 {
                            lines.push(line);
                        } else if line.contains(target) {
                            return Ok(vec![line]);
                        }
                    }
                    regs.base_address = regs.address;
                }
                constant::DW_LNS_advance_pc => {
                    let advance = c.read_uleb128()?;
                    regs.advance(
                        advance,
                        self.min_instruction_length,
                        self.max_ops_per_instruction,
                    );
                }
                constant::DW_LNS_advance_line => {
                    let delta = c.read_sleb128()?;
                    regs.line = regs.line.wrapping_add(delta as u64);
                }
                constant::DW_LNS_set_file => {
                    // The file register is kept zero based; an operand
                    // of zero leaves it invalid.
                    regs.file = c.read_uleb128()? as i64 - 1;
                }
                constant::DW_LNS_set_column => {
                    c.read_uleb128()?;
                }
                constant::DW_LNS_negate_stmt | constant::DW_LNS_set_basic_block => {}
                constant::DW_LNS_const_add_pc => {
                    let adjusted = 255 - self.opcode_base;
                    regs.advance(
                        u64::from(adjusted / self.line_range),
                        self.min_instruction_length,
                        self.max_ops_per_instruction,
                    );
                }
                constant::DW_LNS_fixed_advance_pc => {
                    let advance = c.read_u16()?;
                    regs.address = regs.address.wrapping_add(u64::from(advance));
                    regs.op_index = 0;
                }
                _ => {
                    // An unknown standard opcode; the header tells us
                    // how many LEB128 operands to skip.
                    let operands = self
                        .standard_opcode_lengths
                        .get(opcode as usize - 1)
                        .copied()
                        .unwrap_or(0);
                    for _ in 0..operands {
                        c.read_uleb128()?;
                    }
                }
            }
        }

        Ok(lines)
    }
}

/// An entry in the file table of a line number program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry<'data> {
    pub path: &'data [u8],
    /// Index into the include directories, where zero means the
    /// compilation directory.
    pub directory: u64,
    pub timestamp: u64,
    pub length: u64,
}

impl<'data> FileEntry<'data> {
    pub fn read<E: Endian>(c: &mut Cursor<'data, E>) -> Result<FileEntry<'data>, ReadError> {
        let path = c.read_cstring()?;
        FileEntry::read_rest(c, path)
    }

    fn read_rest<E: Endian>(
        c: &mut Cursor<'data, E>,
        path: &'data [u8],
    ) -> Result<FileEntry<'data>, ReadError> {
        let directory = c.read_uleb128()?;
        let timestamp = c.read_uleb128()?;
        let length = c.read_uleb128()?;
        Ok(FileEntry {
            path,
            directory,
            timestamp,
            length,
        })
    }
}

/// A line number fact: a source position and the half open address
/// range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumber<'data> {
    /// Zero based index into the program's file table.
    pub file: u64,
    pub path: &'data [u8],
    pub line: u64,
    pub start_address: u64,
    pub end_address: u64,
}

impl LineNumber<'_> {
    pub fn contains(&self, address: u64) -> bool {
        address >= self.start_address && address < self.end_address
    }
}

/// The state registers of the line number machine, reduced to what
/// fact emission needs.
#[derive(Debug, Clone, Copy)]
struct Registers {
    address: u64,
    op_index: u64,
    /// Zero based file index; negative when no valid file is set.
    file: i64,
    line: u64,
    /// Where the range of the next emitted fact begins.
    base_address: u64,
}

impl Registers {
    fn new() -> Registers {
        Registers {
            address: 0,
            op_index: 0,
            file: 0,
            line: 1,
            base_address: 0,
        }
    }

    fn advance(&mut self, op_advance: u64, min_instruction_length: u8, max_ops: u8) {
        if max_ops <= 1 {
            self.address = self
                .address
                .wrapping_add(u64::from(min_instruction_length).wrapping_mul(op_advance));
        } else {
            let op = self.op_index + op_advance;
            self.address = self.address.wrapping_add(
                u64::from(min_instruction_length).wrapping_mul(op / u64::from(max_ops)),
            );
            self.op_index = op % u64::from(max_ops);
        }
    }
}

fn emit<'data>(
    files: &[FileEntry<'data>],
    defined_inline: bool,
    file: i64,
    line: u64,
    start_address: u64,
    end_address: u64,
) -> Option<LineNumber<'data>> {
    if start_address == end_address || file < 0 {
        return None;
    }
    let index = file as usize;
    let (index, entry) = match files.get(index) {
        Some(entry) => (index as u64, entry),
        // An out of range index falls back to the last file defined
        // by the program itself, if there was one.
        None if defined_inline => ((files.len() - 1) as u64, files.last()?),
        None => return None,
    };
    Some(LineNumber {
        file: index,
        path: entry.path,
        line,
        start_address,
        end_address,
    })
}
