use std::collections::HashMap;

use crate::endian::Endian;
use crate::read::{Cursor, ReadError};

const STT_SECTION: u8 = 3;

/// The section symbols of an ELF symbol table.
///
/// Relocations in an unlinked object refer to sections through
/// symbols of type `STT_SECTION`; this keeps just the symbol index to
/// section header index mapping needed to classify them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    sections: HashMap<u64, u16>,
}

impl SymbolTable {
    /// Scan a `.symtab` section. The entry size distinguishes the
    /// 16 byte ELF32 layout from the 24 byte ELF64 one.
    pub fn read<E: Endian>(
        data: &[u8],
        entsize: u64,
        endian: E,
    ) -> Result<SymbolTable, ReadError> {
        let elf64 = match entsize {
            16 => false,
            24 => true,
            _ => return Err(ReadError::Unsupported("symbol table entry size")),
        };

        let mut c = Cursor::new(data, endian);
        let mut sections = HashMap::new();
        let mut index = 0;
        while c.remaining().len() as u64 >= entsize {
            let (info, shndx) = if elf64 {
                c.read_u32()?; // st_name
                let info = c.read_u8()?;
                c.read_u8()?; // st_other
                let shndx = c.read_u16()?;
                c.read_u64()?; // st_value
                c.read_u64()?; // st_size
                (info, shndx)
            } else {
                c.read_u32()?; // st_name
                c.read_u32()?; // st_value
                c.read_u32()?; // st_size
                let info = c.read_u8()?;
                c.read_u8()?; // st_other
                (info, c.read_u16()?)
            };
            if info & 0x0f == STT_SECTION {
                sections.insert(index, shndx);
            }
            index += 1;
        }
        Ok(SymbolTable { sections })
    }

    /// The section header index a section symbol refers to.
    pub fn section_index(&self, symbol: u64) -> Option<u16> {
        self.sections.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
