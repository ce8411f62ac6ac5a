use std::collections::BTreeMap;

use crate::endian::Endian;
use crate::read::{Cursor, ReadError};
use crate::symtab::SymbolTable;

/// The relocations applied to `.debug_info`, from `.rela.debug_info`.
///
/// Entries are partitioned by the section their symbol refers to:
/// relocations against `.debug_abbrev` carry the real abbreviation
/// table offset of a unit whose header stores a zero placeholder, and
/// are the ones the unit reader needs. Everything else lands in the
/// general partition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelocationTable {
    abbrev: BTreeMap<u64, i64>,
    other: BTreeMap<u64, i64>,
}

impl RelocationTable {
    /// Scan a `.rela` section. The entry size distinguishes the
    /// 12 byte ELF32 layout from the 24 byte ELF64 one;
    /// `abbrev_section` is the header index of `.debug_abbrev`.
    pub fn read<E: Endian>(
        data: &[u8],
        entsize: u64,
        endian: E,
        symtab: &SymbolTable,
        abbrev_section: Option<usize>,
    ) -> Result<RelocationTable, ReadError> {
        let elf64 = match entsize {
            12 => false,
            24 => true,
            _ => return Err(ReadError::Unsupported("relocation entry size")),
        };

        let mut c = Cursor::new(data, endian);
        let mut table = RelocationTable::default();
        while c.remaining().len() as u64 >= entsize {
            let (offset, symbol, addend) = if elf64 {
                let offset = c.read_u64()?;
                let info = c.read_u64()?;
                let addend = c.read_u64()? as i64;
                (offset, info >> 32, addend)
            } else {
                let offset = u64::from(c.read_u32()?);
                let info = c.read_u32()?;
                let addend = i64::from(c.read_u32()? as i32);
                (offset, u64::from(info >> 8), addend)
            };
            let target = symtab.section_index(symbol).map(usize::from);
            if target.is_some() && target == abbrev_section {
                table.abbrev.insert(offset, addend);
            } else {
                table.other.insert(offset, addend);
            }
        }
        Ok(table)
    }

    /// The addend of a relocation against `.debug_abbrev`, keyed by
    /// the relocated offset within `.debug_info`.
    pub fn abbrev_addend(&self, offset: u64) -> Option<i64> {
        self.abbrev.get(&offset).copied()
    }

    /// The addend of a relocation against any other section.
    pub fn addend(&self, offset: u64) -> Option<i64> {
        self.other.get(&offset).copied()
    }

    /// The abbreviation partition, in offset order.
    pub fn abbrev_entries(&self) -> impl Iterator<Item = (u64, i64)> + '_ {
        self.abbrev.iter().map(|(&offset, &addend)| (offset, addend))
    }

    /// The general partition, in offset order.
    pub fn other_entries(&self) -> impl Iterator<Item = (u64, i64)> + '_ {
        self.other.iter().map(|(&offset, &addend)| (offset, addend))
    }

    pub fn is_empty(&self) -> bool {
        self.abbrev.is_empty() && self.other.is_empty()
    }
}
