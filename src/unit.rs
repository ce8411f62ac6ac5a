use crate::abbrev::AbbrevTable;
use crate::constant;
use crate::die::Die;
use crate::endian::Endian;
use crate::read::{Cursor, ReadError};
use crate::sections::SectionKind;

/// The encoding parameters of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub version: u16,
    pub address_size: u8,
    pub offset_size: u8,
}

/// The header of a compilation unit in `.debug_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitHeader {
    /// Offset of the unit relative to the start of `.debug_info`.
    pub offset: u64,
    /// The value of the length field; it does not count the length
    /// field itself.
    pub total_length: u64,
    pub version: u16,
    pub address_size: u8,
    pub offset_size: u8,
    /// Offset of the unit's abbreviation table in `.debug_abbrev`.
    ///
    /// In an unlinked object file this is the raw field value and may
    /// still need a relocation applied; see
    /// [`RelocationTable`](crate::RelocationTable).
    pub abbrev_offset: u64,
}

impl UnitHeader {
    /// Read a unit header. `offset` is the unit's position relative
    /// to the start of `.debug_info`.
    pub fn read<E: Endian>(c: &mut Cursor<'_, E>, offset: u64) -> Result<UnitHeader, ReadError> {
        let (offset_size, total_length) = c.read_initial_length()?;
        let version = c.read_u16()?;
        if version < 2 || version > 4 {
            return Err(ReadError::Unsupported("DWARF version"));
        }
        let abbrev_offset = c.read_offset(offset_size)?;
        let address_size = c.read_u8()?;
        Ok(UnitHeader {
            offset,
            total_length,
            version,
            address_size,
            offset_size,
            abbrev_offset,
        })
    }

    /// The size of an initial length field for an offset size.
    pub fn initial_length_width(offset_size: u8) -> u64 {
        if offset_size == 8 {
            12
        } else {
            4
        }
    }

    fn length_field_width(&self) -> u64 {
        UnitHeader::initial_length_width(self.offset_size)
    }

    /// The section relative offset one past the end of this unit.
    pub fn next_offset(&self) -> u64 {
        self.offset + self.length_field_width() + self.total_length
    }

    /// The section relative offset of the first entry in this unit.
    pub fn first_die_offset(&self) -> u64 {
        self.offset + self.length_field_width() + 2 + u64::from(self.offset_size) + 1
    }

    /// The section relative offset of the abbreviation offset field,
    /// which is where a relocation against it is keyed.
    pub fn abbrev_offset_position(&self) -> u64 {
        self.offset + self.length_field_width() + 2
    }

    pub fn encoding(&self) -> Encoding {
        Encoding {
            version: self.version,
            address_size: self.address_size,
            offset_size: self.offset_size,
        }
    }
}

/// A compilation unit with its tree of debugging information entries.
///
/// Entries are stored in a flat arena in the order they appear in the
/// file; tree edges are arena indices. The first root is the
/// `DW_TAG_compile_unit` entry for well formed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit<'data> {
    header: UnitHeader,
    entries: Vec<Die<'data>>,
    roots: Vec<usize>,
}

impl<'data> CompilationUnit<'data> {
    /// Read the entries of a unit whose header has already been read.
    ///
    /// `c` must be positioned at the first entry and `base` is the
    /// file offset of the start of `.debug_info`, so that recorded
    /// entry offsets are section relative. The `abbrev_offset` in
    /// `header` is taken as already relocated.
    pub fn read<E: Endian>(
        c: &mut Cursor<'data, E>,
        base: u64,
        header: UnitHeader,
        abbrev: &AbbrevTable,
        debug_str: &'data [u8],
    ) -> Result<CompilationUnit<'data>, ReadError> {
        let encoding = header.encoding();
        let end = base + header.next_offset();
        let mut entries: Vec<Die<'data>> = Vec::new();
        let mut roots = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        while c.pos() < end {
            match Die::read(c, base, abbrev, encoding, debug_str)? {
                Some((mut die, has_children)) => {
                    let index = entries.len();
                    die.parent = stack.last().copied();
                    match die.parent {
                        Some(parent) => entries[parent].children.push(index),
                        None => roots.push(index),
                    }
                    entries.push(die);
                    if has_children {
                        stack.push(index);
                    }
                }
                None => {
                    // A null entry ends the current sibling chain.
                    // At the top level it is padding.
                    stack.pop();
                }
            }
        }

        Ok(CompilationUnit {
            header,
            entries,
            roots,
        })
    }

    pub fn header(&self) -> &UnitHeader {
        &self.header
    }

    pub fn offset(&self) -> u64 {
        self.header.offset
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn address_size(&self) -> u8 {
        self.header.address_size
    }

    pub fn offset_size(&self) -> u8 {
        self.header.offset_size
    }

    pub fn abbrev_offset(&self) -> u64 {
        self.header.abbrev_offset
    }

    pub fn next_offset(&self) -> u64 {
        self.header.next_offset()
    }

    pub fn encoding(&self) -> Encoding {
        self.header.encoding()
    }

    pub fn entries(&self) -> &[Die<'data>] {
        &self.entries
    }

    /// The root entry, normally `DW_TAG_compile_unit`.
    pub fn root(&self) -> Option<&Die<'data>> {
        self.roots.first().map(|&i| &self.entries[i])
    }

    /// Arena indices of the top level entries.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn die(&self, index: usize) -> Option<&Die<'data>> {
        self.entries.get(index)
    }

    /// Look up an entry by its `.debug_info` relative offset.
    pub fn entry_at(&self, offset: u64) -> Option<&Die<'data>> {
        self.entries.iter().find(|die| die.offset == offset)
    }

    /// Resolve a reference value to a `.debug_info` relative offset.
    pub fn resolve_ref(&self, value: &crate::die::AttributeValue<'data>) -> Option<u64> {
        match *value {
            crate::die::AttributeValue::Ref(val) => Some(self.header.offset + val),
            crate::die::AttributeValue::RefAddress(val) => Some(val),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&'data [u8]> {
        self.root()?.attr_string(constant::DW_AT_name)
    }

    pub fn comp_dir(&self) -> Option<&'data [u8]> {
        self.root()?.attr_string(constant::DW_AT_comp_dir)
    }

    pub fn producer(&self) -> Option<&'data [u8]> {
        self.root()?.attr_string(constant::DW_AT_producer)
    }

    pub fn language(&self) -> Option<u64> {
        self.root()?.attr_uint(constant::DW_AT_language)
    }

    pub fn low_pc(&self) -> Option<u64> {
        self.root()?.attr_address(constant::DW_AT_low_pc)
    }

    /// The `.debug_line` offset of this unit's line number program.
    pub fn stmt_list(&self) -> Option<u64> {
        self.root()?.attr_offset(constant::DW_AT_stmt_list)
    }

    /// The macro table reference of this unit, as a section and an
    /// offset into it. `DW_AT_macro_info` points into
    /// `.debug_macinfo`; the GNU extension points into `.debug_macro`.
    pub fn macro_offset(&self) -> Option<(SectionKind, u64)> {
        let root = self.root()?;
        if let Some(offset) = root.attr_offset(constant::DW_AT_macro_info) {
            return Some((SectionKind::DebugMacinfo, offset));
        }
        if let Some(offset) = root.attr_offset(constant::DW_AT_GNU_macros) {
            return Some((SectionKind::DebugMacro, offset));
        }
        None
    }
}
