use crate::constant;
use crate::constant::DwMacinfo;
use crate::endian::Endian;
use crate::read::{string_at, Cursor, ReadError};

/// Which encoding a macro table uses.
///
/// `.debug_macinfo` tables are headerless streams of entries;
/// `.debug_macro` is the GNU extension with a small header, indirect
/// strings and table-to-table includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroFormat {
    Macinfo,
    Macro,
}

/// One entry of a macro table.
///
/// Indirect define and undef entries are normalized to their plain
/// kinds once the string has been looked up, so `kind` is one of
/// define, undef, start_file or end_file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroEntry<'data> {
    pub kind: DwMacinfo,
    pub line: u64,
    /// Zero based file index current when the entry was recorded.
    /// Negative before the first start_file entry, which is where
    /// command line definitions live.
    pub file: i64,
    /// The macro text for define and undef entries. `None` when an
    /// indirect string could not be resolved.
    pub text: Option<&'data [u8]>,
}

/// A decoded macro table from `.debug_macinfo` or `.debug_macro`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroTable<'data> {
    /// Offset of the table relative to the start of its section.
    pub offset: u64,
    pub format: MacroFormat,
    /// Header version; zero for the headerless `.debug_macinfo`.
    pub version: u16,
    pub offset_size: u8,
    /// The `.debug_line` offset carried by the header, if any.
    pub line_offset: Option<u64>,
    entries: Vec<MacroEntry<'data>>,
    base_file: Option<i64>,
    direct_includes: Vec<i64>,
    skipped_includes: Vec<u64>,
}

impl<'data> MacroTable<'data> {
    /// Read a macro table.
    ///
    /// `base` is the file offset of the section start, `offset` the
    /// table's position within the section, and `section_end` the
    /// file offset one past the section, which bounds includes.
    pub fn read<E: Endian>(
        c: &mut Cursor<'data, E>,
        base: u64,
        offset: u64,
        section_end: u64,
        format: MacroFormat,
        debug_str: &'data [u8],
    ) -> Result<MacroTable<'data>, ReadError> {
        c.seek(base + offset)?;
        let header = TableHeader::read(c, base + offset, format)?;
        let mut table = MacroTable {
            offset,
            format,
            version: header.version,
            offset_size: header.offset_size,
            line_offset: header.line_offset,
            entries: Vec::new(),
            base_file: None,
            direct_includes: Vec::new(),
            skipped_includes: Vec::new(),
        };
        walk(c, base, section_end, &header, offset, debug_str, false, &mut table)?;
        Ok(table)
    }

    /// Read only as far as needed to answer which file the table
    /// starts in, without materializing entries.
    pub fn read_base_file<E: Endian>(
        c: &mut Cursor<'data, E>,
        base: u64,
        offset: u64,
        section_end: u64,
        format: MacroFormat,
        debug_str: &'data [u8],
    ) -> Result<Option<i64>, ReadError> {
        c.seek(base + offset)?;
        let header = TableHeader::read(c, base + offset, format)?;
        let mut table = MacroTable {
            offset,
            format,
            version: header.version,
            offset_size: header.offset_size,
            line_offset: header.line_offset,
            entries: Vec::new(),
            base_file: None,
            direct_includes: Vec::new(),
            skipped_includes: Vec::new(),
        };
        walk(c, base, section_end, &header, offset, debug_str, true, &mut table)?;
        Ok(table.base_file)
    }

    pub fn entries(&self) -> &[MacroEntry<'data>] {
        &self.entries
    }

    /// The file the table starts in, from its first start_file entry.
    pub fn base_file(&self) -> Option<i64> {
        self.base_file
    }

    /// Files included directly by the base file.
    pub fn direct_includes(&self) -> &[i64] {
        &self.direct_includes
    }

    /// Section relative offsets of includes that were skipped because
    /// following them would have looped.
    pub fn skipped_includes(&self) -> &[u64] {
        &self.skipped_includes
    }

    /// The define and undef entries recorded in a given file.
    pub fn defines_in(&self, file: i64) -> impl Iterator<Item = &MacroEntry<'data>> {
        self.entries.iter().filter(move |entry| {
            entry.file == file
                && (entry.kind == constant::DW_MACINFO_define
                    || entry.kind == constant::DW_MACINFO_undef)
        })
    }

    /// Definitions made before any file was entered, typically from
    /// the compiler command line.
    pub fn command_line_defines(&self) -> impl Iterator<Item = &MacroEntry<'data>> {
        self.defines_in(-1)
    }
}

struct TableHeader {
    version: u16,
    offset_size: u8,
    line_offset: Option<u64>,
    /// Bytes between the table start and the first entry.
    header_len: u64,
}

impl TableHeader {
    fn read<E: Endian>(
        c: &mut Cursor<'_, E>,
        table_start: u64,
        format: MacroFormat,
    ) -> Result<TableHeader, ReadError> {
        if format == MacroFormat::Macinfo {
            return Ok(TableHeader {
                version: 0,
                offset_size: 4,
                line_offset: None,
                header_len: 0,
            });
        }

        let version = c.read_u16()?;
        let flags = c.read_u8()?;
        let offset_size = if flags & 0x01 != 0 { 8 } else { 4 };
        let line_offset = if flags & 0x02 != 0 {
            Some(c.read_offset(offset_size)?)
        } else {
            None
        };
        if flags & 0x04 != 0 {
            // Vendor opcode operand table; parse past it.
            let count = c.read_u8()?;
            for _ in 0..count {
                c.read_u8()?;
                let operands = c.read_uleb128()?;
                for _ in 0..operands {
                    c.read_u8()?;
                }
            }
        }
        Ok(TableHeader {
            version,
            offset_size,
            line_offset,
            header_len: c.pos() - table_start,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn walk<'data, E: Endian>(
    c: &mut Cursor<'data, E>,
    base: u64,
    section_end: u64,
    header: &TableHeader,
    offset: u64,
    debug_str: &'data [u8],
    base_only: bool,
    out: &mut MacroTable<'data>,
) -> Result<(), ReadError> {
    // Table bodies currently being expanded, to cut include cycles.
    let mut expanding = vec![offset + header.header_len];
    let mut resume: Vec<u64> = Vec::new();
    let mut file_stack: Vec<i64> = Vec::new();
    let mut current_file: i64 = -1;

    loop {
        if c.pos() >= section_end {
            // Ran off the section without a terminator.
            break;
        }
        let kind = DwMacinfo(c.read_u8()?);
        match kind {
            DwMacinfo(0) => match resume.pop() {
                Some(pos) => {
                    expanding.pop();
                    c.seek(pos)?;
                }
                None => break,
            },
            constant::DW_MACINFO_define | constant::DW_MACINFO_undef => {
                let line = c.read_uleb128()?;
                let text = c.read_cstring()?;
                out.entries.push(MacroEntry {
                    kind,
                    line,
                    file: current_file,
                    text: Some(text),
                });
            }
            constant::DW_MACINFO_start_file => {
                let line = c.read_uleb128()?;
                let file = c.read_uleb128()? as i64 - 1;
                file_stack.push(current_file);
                current_file = file;
                if out.base_file.is_none() {
                    out.base_file = Some(file);
                    if base_only {
                        break;
                    }
                }
                if file_stack.len() == 2 {
                    out.direct_includes.push(file);
                }
                out.entries.push(MacroEntry {
                    kind,
                    line,
                    file,
                    text: None,
                });
            }
            constant::DW_MACINFO_end_file => {
                current_file = file_stack.pop().unwrap_or(-1);
                out.entries.push(MacroEntry {
                    kind,
                    line: 0,
                    file: current_file,
                    text: None,
                });
            }
            constant::DW_MACINFO_define_indirect | constant::DW_MACINFO_undef_indirect
                if out.format == MacroFormat::Macro =>
            {
                let line = c.read_uleb128()?;
                let str_offset = c.read_offset(header.offset_size)?;
                let kind = if kind == constant::DW_MACINFO_define_indirect {
                    constant::DW_MACINFO_define
                } else {
                    constant::DW_MACINFO_undef
                };
                out.entries.push(MacroEntry {
                    kind,
                    line,
                    file: current_file,
                    text: string_at(debug_str, str_offset),
                });
            }
            constant::DW_MACINFO_transparent_include if out.format == MacroFormat::Macro => {
                let index = c.read_offset(header.offset_size)?;
                let target = index
                    .checked_add(header.header_len)
                    .ok_or(ReadError::Malformed("transparent include offset"))?;
                if expanding.contains(&target) {
                    log::warn!("skipping: {}", ReadError::CyclicInclude(target));
                    out.skipped_includes.push(target);
                } else {
                    resume.push(c.pos());
                    expanding.push(target);
                    let position = base
                        .checked_add(target)
                        .ok_or(ReadError::Malformed("transparent include offset"))?;
                    c.seek(position)?;
                }
            }
            constant::DW_MACINFO_vendor_ext => {
                c.read_uleb128()?;
                c.read_cstring()?;
            }
            _ => return Err(ReadError::Unsupported("macro entry type")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::endian::LittleEndian;

    fn read_table<'a>(
        buf: &'a [u8],
        offset: u64,
        format: MacroFormat,
        debug_str: &'a [u8],
    ) -> Result<MacroTable<'a>, ReadError> {
        let mut c = Cursor::new(buf, LittleEndian);
        MacroTable::read(&mut c, 0, offset, buf.len() as u64, format, debug_str)
    }

    #[test]
    fn macinfo() {
        let buf = [
            0x01, 0x00, b'O', b'N', b'E', b' ', b'1', 0x00, // define "ONE 1"
            0x03, 0x00, 0x01, // start_file, file 1
            0x01, 0x02, b'T', b'W', b'O', b' ', b'2', 0x00, // define "TWO 2"
            0x03, 0x04, 0x02, // start_file, file 2
            0x02, 0x05, b'T', b'W', b'O', 0x00, // undef "TWO"
            0x04, // end_file
            0x04, // end_file
            0x00, // terminator
        ];
        let table = read_table(&buf, 0, MacroFormat::Macinfo, &[]).unwrap();
        assert_eq!(table.version, 0);
        assert_eq!(table.base_file(), Some(0));
        assert_eq!(table.direct_includes(), [1]);
        assert!(table.skipped_includes().is_empty());

        let defines: Vec<_> = table.command_line_defines().collect();
        assert_eq!(defines.len(), 1);
        assert_eq!(defines[0].text, Some(&b"ONE 1"[..]));
        assert_eq!(defines[0].line, 0);

        let in_base: Vec<_> = table.defines_in(0).collect();
        assert_eq!(in_base.len(), 1);
        assert_eq!(in_base[0].text, Some(&b"TWO 2"[..]));

        let in_include: Vec<_> = table.defines_in(1).collect();
        assert_eq!(in_include.len(), 1);
        assert_eq!(in_include[0].kind, constant::DW_MACINFO_undef);
        assert_eq!(in_include[0].text, Some(&b"TWO"[..]));
    }

    #[test]
    fn macro_header_and_indirect() {
        let debug_str = b"unused\0NAME 1\0";
        let buf = [
            0x04, 0x00, // version
            0x02, // flags: line offset present
            0x40, 0x00, 0x00, 0x00, // line offset
            0x05, 0x03, 0x07, 0x00, 0x00, 0x00, // define_indirect, line 3, str at 7
            0x00, // terminator
        ];
        let table = read_table(&buf, 0, MacroFormat::Macro, debug_str).unwrap();
        assert_eq!(table.version, 4);
        assert_eq!(table.offset_size, 4);
        assert_eq!(table.line_offset, Some(0x40));
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.entries()[0].kind, constant::DW_MACINFO_define);
        assert_eq!(table.entries()[0].line, 3);
        assert_eq!(table.entries()[0].text, Some(&b"NAME 1"[..]));

        // An unresolvable string offset keeps the entry, minus text.
        let buf = [
            0x04, 0x00, 0x00, // version, no flags
            0x06, 0x03, 0x40, 0x00, 0x00, 0x00, // undef_indirect, str out of range
            0x00,
        ];
        let table = read_table(&buf, 0, MacroFormat::Macro, debug_str).unwrap();
        assert_eq!(table.entries()[0].kind, constant::DW_MACINFO_undef);
        assert_eq!(table.entries()[0].text, None);
    }

    #[test]
    fn self_include_skipped() {
        // The include points back at this table's own body.
        let buf = [
            0x04, 0x00, 0x00, // version, no flags
            0x07, 0x00, 0x00, 0x00, 0x00, // transparent_include of offset 0
            0x01, 0x01, b'A', b' ', b'1', 0x00, // define "A 1"
            0x00,
        ];
        let table = read_table(&buf, 0, MacroFormat::Macro, &[]).unwrap();
        assert_eq!(table.skipped_includes(), [3]);
        let defines: Vec<_> = table.command_line_defines().collect();
        assert_eq!(defines.len(), 1);
        assert_eq!(defines[0].text, Some(&b"A 1"[..]));
    }

    #[test]
    fn mutual_include_skipped() {
        let mut buf = Vec::new();
        // Table A at offset 0.
        buf.extend_from_slice(&[0x04, 0x00, 0x00]); // header
        buf.extend_from_slice(&[0x07, 0x0f, 0x00, 0x00, 0x00]); // include B
        buf.extend_from_slice(&[0x01, 0x01, b'A', b' ', b'1', 0x00]); // define "A 1"
        buf.push(0x00);
        assert_eq!(buf.len(), 15);
        // Table B at offset 15.
        buf.extend_from_slice(&[0x04, 0x00, 0x00]); // header
        buf.extend_from_slice(&[0x07, 0x00, 0x00, 0x00, 0x00]); // include A
        buf.extend_from_slice(&[0x01, 0x02, b'B', b' ', b'2', 0x00]); // define "B 2"
        buf.push(0x00);

        let table = read_table(&buf, 0, MacroFormat::Macro, &[]).unwrap();
        // A's own body is the skipped target.
        assert_eq!(table.skipped_includes(), [3]);
        let texts: Vec<_> = table
            .command_line_defines()
            .map(|entry| entry.text.unwrap())
            .collect();
        assert_eq!(texts, [&b"B 2"[..], &b"A 1"[..]]);
    }

    #[test]
    fn include_offset_overflow() {
        // 64 bit offsets (flags bit 0) so the operand can hold
        // u64::MAX.
        let mut buf = vec![0x04, 0x00, 0x01]; // version, flags
        buf.push(0x07); // transparent_include
        buf.extend_from_slice(&u64::MAX.to_le_bytes());
        buf.push(0x00);
        assert_eq!(
            read_table(&buf, 0, MacroFormat::Macro, &[]),
            Err(ReadError::Malformed("transparent include offset"))
        );
    }

    #[test]
    fn base_file_stops_early() {
        let buf = [
            0x01, 0x00, b'X', 0x00, // define "X"
            0x03, 0x00, 0x03, // start_file, file 3
            0x09, // invalid entry type, never reached in base mode
        ];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        let base = MacroTable::read_base_file(
            &mut c,
            0,
            0,
            buf.len() as u64,
            MacroFormat::Macinfo,
            &[],
        );
        assert_eq!(base, Ok(Some(2)));

        assert_eq!(
            read_table(&buf, 0, MacroFormat::Macinfo, &[]),
            Err(ReadError::Unsupported("macro entry type"))
        );
    }

    #[test]
    fn end_file_underflow_tolerated() {
        let buf = [0x04, 0x00];
        let table = read_table(&buf, 0, MacroFormat::Macinfo, &[]).unwrap();
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.entries()[0].file, -1);
    }

    #[test]
    fn include_in_macinfo_rejected() {
        let buf = [0x07, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            read_table(&buf, 0, MacroFormat::Macinfo, &[]),
            Err(ReadError::Unsupported("macro entry type"))
        );
    }
}
