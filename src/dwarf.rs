use std::collections::HashMap;
use std::rc::Rc;

use fallible_iterator::FallibleIterator;

use crate::abbrev::AbbrevTable;
use crate::aranges::RangeSet;
use crate::endian::Endian;
use crate::line::LineProgram;
use crate::macinfo::{MacroFormat, MacroTable};
use crate::pubnames::NameSet;
use crate::read::{Cursor, ReadError};
use crate::reloc::RelocationTable;
use crate::sections::{Section, SectionKind, SectionTable};
use crate::symtab::SymbolTable;
use crate::unit::{CompilationUnit, UnitHeader};

/// A source position found for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: Vec<u8>,
    pub line: u64,
}

/// A reader over the DWARF sections of one object file.
///
/// Tables are referenced by offset from many places: every
/// compilation unit names an abbreviation table, several units may
/// share a line number program, and macro tables include each other.
/// The reader owns a write-once cache per table kind, so each offset
/// is decoded at most once and handed out as a shared [`Rc`].
#[derive(Debug)]
pub struct Dwarf<'data, E: Endian> {
    data: &'data [u8],
    sections: &'data SectionTable,
    endian: E,
    abbrev_cache: HashMap<u64, Rc<AbbrevTable>>,
    unit_cache: Option<Rc<Vec<Rc<CompilationUnit<'data>>>>>,
    line_cache: HashMap<u64, Rc<LineProgram<'data, E>>>,
    macro_cache: HashMap<(MacroFormat, u64), Rc<MacroTable<'data>>>,
    arange_cache: Option<Rc<Vec<RangeSet>>>,
    name_cache: Option<Rc<Vec<NameSet<'data>>>>,
    reloc_cache: Option<Option<Rc<RelocationTable>>>,
}

impl<'data, E: Endian> Dwarf<'data, E> {
    pub fn new(data: &'data [u8], sections: &'data SectionTable, endian: E) -> Dwarf<'data, E> {
        Dwarf {
            data,
            sections,
            endian,
            abbrev_cache: HashMap::new(),
            unit_cache: None,
            line_cache: HashMap::new(),
            macro_cache: HashMap::new(),
            arange_cache: None,
            name_cache: None,
            reloc_cache: None,
        }
    }

    pub fn endian(&self) -> E {
        self.endian
    }

    fn section(&self, kind: SectionKind) -> Option<&'data Section> {
        self.sections.get(kind)
    }

    fn section_data(&self, kind: SectionKind) -> Option<&'data [u8]> {
        let section = self.section(kind)?;
        self.data
            .get(section.offset as usize..section.end() as usize)
    }

    fn debug_str(&self) -> &'data [u8] {
        self.section_data(SectionKind::DebugStr).unwrap_or(&[])
    }

    /// The abbreviation table at an offset in `.debug_abbrev`.
    ///
    /// Decoding the same offset twice returns the same table.
    pub fn abbrev(&mut self, offset: u64) -> Result<Rc<AbbrevTable>, ReadError> {
        if let Some(table) = self.abbrev_cache.get(&offset) {
            return Ok(table.clone());
        }
        let section = self
            .section(SectionKind::DebugAbbrev)
            .ok_or(ReadError::UnresolvedReference("abbreviation section"))?;
        if offset >= section.size {
            return Err(ReadError::UnresolvedReference("abbreviation table offset"));
        }
        let mut c = Cursor::at(self.data, section.offset + offset, self.endian)?;
        let table = Rc::new(AbbrevTable::read(&mut c)?);
        self.abbrev_cache.insert(offset, table.clone());
        Ok(table)
    }

    /// A restartable iterator over the compilation units in
    /// `.debug_info`, decoded one at a time.
    pub fn units(&mut self) -> UnitIter<'_, 'data, E> {
        UnitIter {
            dwarf: self,
            offset: 0,
        }
    }

    /// All compilation units, decoded once and memoized.
    ///
    /// Units that fail to decode are logged and skipped, so one
    /// malformed unit does not hide its siblings.
    pub fn compilation_units(
        &mut self,
    ) -> Result<Rc<Vec<Rc<CompilationUnit<'data>>>>, ReadError> {
        if let Some(units) = &self.unit_cache {
            return Ok(units.clone());
        }
        let mut list = Vec::new();
        {
            let mut iter = self.units();
            loop {
                let before = iter.offset;
                match iter.next() {
                    Ok(Some(unit)) => list.push(unit),
                    Ok(None) => break,
                    Err(err) => {
                        log::warn!(
                            "skipping compilation unit at offset 0x{:x}: {}",
                            before,
                            err
                        );
                        if iter.offset == before {
                            // The unit boundary is unknown; give up on
                            // the rest of the section.
                            break;
                        }
                    }
                }
            }
        }
        let units = Rc::new(list);
        self.unit_cache = Some(units.clone());
        Ok(units)
    }

    /// The compilation unit at a `.debug_info` offset.
    pub fn compilation_unit(
        &mut self,
        offset: u64,
    ) -> Result<Option<Rc<CompilationUnit<'data>>>, ReadError> {
        let units = self.compilation_units()?;
        Ok(units.iter().find(|unit| unit.offset() == offset).cloned())
    }

    /// The line number program at an offset in `.debug_line`.
    pub fn line_program(&mut self, offset: u64) -> Result<Rc<LineProgram<'data, E>>, ReadError> {
        if let Some(program) = self.line_cache.get(&offset) {
            return Ok(program.clone());
        }
        let section = self
            .section(SectionKind::DebugLine)
            .ok_or(ReadError::UnresolvedReference("line number section"))?;
        if offset >= section.size {
            return Err(ReadError::UnresolvedReference("line number program offset"));
        }
        let mut c = Cursor::at(self.data, section.offset + offset, self.endian)?;
        let program = Rc::new(LineProgram::read(&mut c, offset)?);
        self.line_cache.insert(offset, program.clone());
        Ok(program)
    }

    /// The fully expanded macro table at an offset in the named macro
    /// section, as referenced by a unit's
    /// [`macro_offset`](CompilationUnit::macro_offset).
    pub fn macro_table(
        &mut self,
        kind: SectionKind,
        offset: u64,
    ) -> Result<Rc<MacroTable<'data>>, ReadError> {
        let format = macro_format(kind)?;
        if let Some(table) = self.macro_cache.get(&(format, offset)) {
            return Ok(table.clone());
        }
        let section = self
            .section(kind)
            .ok_or(ReadError::UnresolvedReference("macro section"))?;
        if offset >= section.size {
            return Err(ReadError::UnresolvedReference("macro table offset"));
        }
        let mut c = Cursor::new(self.data, self.endian);
        let table = Rc::new(MacroTable::read(
            &mut c,
            section.offset,
            offset,
            section.end(),
            format,
            self.debug_str(),
        )?);
        self.macro_cache.insert((format, offset), table.clone());
        Ok(table)
    }

    /// The file a macro table starts in, without expanding the table
    /// or touching the cache.
    pub fn macro_base_file(
        &self,
        kind: SectionKind,
        offset: u64,
    ) -> Result<Option<i64>, ReadError> {
        let format = macro_format(kind)?;
        let section = self
            .section(kind)
            .ok_or(ReadError::UnresolvedReference("macro section"))?;
        if offset >= section.size {
            return Err(ReadError::UnresolvedReference("macro table offset"));
        }
        let mut c = Cursor::new(self.data, self.endian);
        MacroTable::read_base_file(
            &mut c,
            section.offset,
            offset,
            section.end(),
            format,
            self.debug_str(),
        )
    }

    /// All range sets in `.debug_aranges`, decoded once.
    pub fn aranges(&mut self) -> Result<Rc<Vec<RangeSet>>, ReadError> {
        if let Some(sets) = &self.arange_cache {
            return Ok(sets.clone());
        }
        let mut list = Vec::new();
        if let Some(section) = self.section(SectionKind::DebugAranges) {
            let mut c = Cursor::new(self.data, self.endian);
            let mut offset = 0;
            while offset < section.size {
                let set = RangeSet::read(&mut c, section.offset, offset)?;
                offset = c.pos() - section.offset;
                list.push(set);
            }
        }
        let sets = Rc::new(list);
        self.arange_cache = Some(sets.clone());
        Ok(sets)
    }

    /// All name sets in `.debug_pubnames`, decoded once.
    pub fn pubnames(&mut self) -> Result<Rc<Vec<NameSet<'data>>>, ReadError> {
        if let Some(sets) = &self.name_cache {
            return Ok(sets.clone());
        }
        let mut list = Vec::new();
        if let Some(section) = self.section(SectionKind::DebugPubnames) {
            let mut c = Cursor::new(self.data, self.endian);
            let mut offset = 0;
            while offset < section.size {
                let set = NameSet::read(&mut c, section.offset, offset)?;
                offset = c.pos() - section.offset;
                list.push(set);
            }
        }
        let sets = Rc::new(list);
        self.name_cache = Some(sets.clone());
        Ok(sets)
    }

    /// The public name of the entry at a `.debug_info` offset, from
    /// any name set.
    pub fn public_name(&mut self, die_offset: u64) -> Result<Option<&'data [u8]>, ReadError> {
        let sets = self.pubnames()?;
        Ok(sets.iter().find_map(|set| set.name(die_offset)))
    }

    /// The relocations applied to `.debug_info`, or `None` when the
    /// file carries no relocation or symbol table.
    pub fn relocations(&mut self) -> Result<Option<Rc<RelocationTable>>, ReadError> {
        if let Some(cached) = &self.reloc_cache {
            return Ok(cached.clone());
        }
        let table = self.read_relocations()?;
        self.reloc_cache = Some(table.clone());
        Ok(table)
    }

    fn read_relocations(&self) -> Result<Option<Rc<RelocationTable>>, ReadError> {
        let rela = match self.section(SectionKind::RelaDebugInfo) {
            Some(section) => section,
            None => return Ok(None),
        };
        let symtab_section = match self.section(SectionKind::Symtab) {
            Some(section) => section,
            None => return Ok(None),
        };
        let rela_data = self
            .section_data(SectionKind::RelaDebugInfo)
            .ok_or(ReadError::Malformed("relocation section bounds"))?;
        let symtab_data = self
            .section_data(SectionKind::Symtab)
            .ok_or(ReadError::Malformed("symbol table section bounds"))?;
        let symtab = SymbolTable::read(symtab_data, symtab_section.entsize, self.endian)?;
        let table = RelocationTable::read(
            rela_data,
            rela.entsize,
            self.endian,
            &symtab,
            self.sections.elf_index(SectionKind::DebugAbbrev),
        )?;
        Ok(Some(Rc::new(table)))
    }

    /// Apply any abbreviation relocation to a unit's stored
    /// abbreviation offset. In a relocatable object the header field
    /// is a placeholder and the relocation carries the real offset.
    fn resolve_abbrev_offset(&mut self, header: &UnitHeader) -> Result<u64, ReadError> {
        if let Some(reloc) = self.relocations()? {
            if let Some(addend) = reloc.abbrev_addend(header.abbrev_offset_position()) {
                return Ok(header.abbrev_offset.wrapping_add(addend as u64));
            }
        }
        Ok(header.abbrev_offset)
    }

    /// The compilation unit covering an address, through
    /// `.debug_aranges`.
    pub fn unit_for_address(
        &mut self,
        address: u64,
    ) -> Result<Option<Rc<CompilationUnit<'data>>>, ReadError> {
        let info_offset = {
            let sets = self.aranges()?;
            sets.iter()
                .find(|set| set.contains(address))
                .map(|set| set.info_offset)
        };
        match info_offset {
            Some(offset) => self.compilation_unit(offset),
            None => Ok(None),
        }
    }

    /// The source file and line for an address, chaining the address
    /// range table, the owning unit and its line number program.
    pub fn source_for_address(
        &mut self,
        address: u64,
    ) -> Result<Option<SourceLocation>, ReadError> {
        if address == 0 {
            return Ok(None);
        }
        let unit = match self.unit_for_address(address)? {
            Some(unit) => unit,
            None => return Ok(None),
        };
        let stmt_list = match unit.stmt_list() {
            Some(offset) => offset,
            None => return Ok(None),
        };
        let program = self.line_program(stmt_list)?;
        let line = match program.line_for(address)? {
            Some(line) => line,
            None => return Ok(None),
        };
        let path = match program.file(line.file) {
            Some(entry) => program.full_path(entry).into_owned(),
            None => line.path.to_vec(),
        };
        Ok(Some(SourceLocation {
            path,
            line: line.line,
        }))
    }
}

fn macro_format(kind: SectionKind) -> Result<MacroFormat, ReadError> {
    match kind {
        SectionKind::DebugMacinfo => Ok(MacroFormat::Macinfo),
        SectionKind::DebugMacro => Ok(MacroFormat::Macro),
        _ => Err(ReadError::UnresolvedReference("macro section")),
    }
}

/// A lazy iterator over the compilation units of `.debug_info`.
///
/// The next unit boundary is taken from the length field before the
/// unit body is decoded, so iteration continues past a unit whose
/// body is malformed.
#[derive(Debug)]
pub struct UnitIter<'a, 'data, E: Endian> {
    dwarf: &'a mut Dwarf<'data, E>,
    offset: u64,
}

impl<'a, 'data, E: Endian> UnitIter<'a, 'data, E> {
    /// The section relative offset the next unit will be read from.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl<'a, 'data, E: Endian> FallibleIterator for UnitIter<'a, 'data, E> {
    type Item = Rc<CompilationUnit<'data>>;
    type Error = ReadError;

    fn next(&mut self) -> Result<Option<Self::Item>, ReadError> {
        let section = match self.dwarf.section(SectionKind::DebugInfo) {
            Some(section) => section,
            None => return Ok(None),
        };
        if self.offset >= section.size {
            return Ok(None);
        }
        let offset = self.offset;
        let mut c = Cursor::at(self.dwarf.data, section.offset + offset, self.dwarf.endian)?;

        // Commit to the next boundary before decoding the body. A
        // zero length is trailing padding and ends the section.
        let mut peek = c;
        let (offset_size, total_length) = peek.read_initial_length()?;
        if total_length == 0 {
            self.offset = section.size;
            return Ok(None);
        }
        self.offset = offset + UnitHeader::initial_length_width(offset_size) + total_length;

        let mut header = UnitHeader::read(&mut c, offset)?;
        header.abbrev_offset = self.dwarf.resolve_abbrev_offset(&header)?;
        let abbrev = self.dwarf.abbrev(header.abbrev_offset)?;
        let debug_str = self.dwarf.debug_str();
        let unit = CompilationUnit::read(&mut c, section.offset, header, &abbrev, debug_str)?;
        Ok(Some(Rc::new(unit)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::endian::LittleEndian;
    use crate::sections::{Section, SectionKind, SectionTable};

    /// Lay out named sections in one buffer and build the matching
    /// section table. Header indices count from one, like a real
    /// file's null section entry.
    fn layout(parts: &[(SectionKind, &[u8], u64)]) -> (Vec<u8>, SectionTable) {
        let mut data = Vec::new();
        let mut table = SectionTable::new();
        for (index, &(kind, body, entsize)) in parts.iter().enumerate() {
            table.push(Section {
                kind,
                index: index + 1,
                offset: data.len() as u64,
                size: body.len() as u64,
                entsize,
                link: 0,
            });
            data.extend_from_slice(body);
        }
        (data, table)
    }

    // One abbreviation: compile_unit, no children, name as an inline
    // string.
    const ABBREV: [u8; 9] = [0x01, 0x11, 0x00, 0x03, 0x08, 0x00, 0x00, 0x00, 0x00];

    fn unit(name: &[u8]) -> Vec<u8> {
        let mut body = vec![0x04, 0x00]; // version
        body.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // abbrev offset
        body.push(0x04); // address size
        body.push(0x01); // abbreviation code
        body.extend_from_slice(name);
        body.push(0x00);

        let mut buf = (body.len() as u32).to_le_bytes().to_vec();
        buf.append(&mut body);
        buf
    }

    #[test]
    fn unit_iteration_and_boundaries() {
        let mut info = unit(b"a.c");
        info.extend_from_slice(&unit(b"b.c"));
        let (data, sections) = layout(&[
            (SectionKind::DebugAbbrev, &ABBREV, 0),
            (SectionKind::DebugInfo, &info, 0),
        ]);
        let mut dwarf = Dwarf::new(&data, &sections, LittleEndian);

        let units = dwarf.compilation_units().unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name(), Some(&b"a.c"[..]));
        assert_eq!(units[1].name(), Some(&b"b.c"[..]));

        // Adjacent units leave no gap: the second starts where the
        // first's length field said it would.
        assert_eq!(units[0].offset(), 0);
        assert_eq!(units[1].offset(), units[0].next_offset());
        assert_eq!(
            units[1].offset(),
            units[0].offset() + units[0].header().total_length + 4
        );

        // The materialized list is memoized.
        let again = dwarf.compilation_units().unwrap();
        assert!(Rc::ptr_eq(&units, &again));

        assert!(dwarf.compilation_unit(units[1].offset()).unwrap().is_some());
        assert!(dwarf.compilation_unit(1).unwrap().is_none());
    }

    #[test]
    fn zero_length_padding_stops() {
        let mut info = unit(b"a.c");
        info.extend_from_slice(&[0x00; 8]);
        let (data, sections) = layout(&[
            (SectionKind::DebugAbbrev, &ABBREV, 0),
            (SectionKind::DebugInfo, &info, 0),
        ]);
        let mut dwarf = Dwarf::new(&data, &sections, LittleEndian);
        assert_eq!(dwarf.compilation_units().unwrap().len(), 1);
    }

    #[test]
    fn bad_unit_skipped() {
        let mut info = unit(b"a.c");
        let mut bad = unit(b"x.c");
        bad[4] = 0x09; // unsupported version
        info.extend_from_slice(&bad);
        info.extend_from_slice(&unit(b"c.c"));
        let (data, sections) = layout(&[
            (SectionKind::DebugAbbrev, &ABBREV, 0),
            (SectionKind::DebugInfo, &info, 0),
        ]);
        let mut dwarf = Dwarf::new(&data, &sections, LittleEndian);

        let units = dwarf.compilation_units().unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name(), Some(&b"a.c"[..]));
        assert_eq!(units[1].name(), Some(&b"c.c"[..]));
    }

    #[test]
    fn abbrev_cached() {
        let (data, sections) = layout(&[(SectionKind::DebugAbbrev, &ABBREV, 0)]);
        let mut dwarf = Dwarf::new(&data, &sections, LittleEndian);
        let first = dwarf.abbrev(0).unwrap();
        let second = dwarf.abbrev(0).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first, second);

        assert_eq!(
            dwarf.abbrev(100),
            Err(ReadError::UnresolvedReference("abbreviation table offset"))
        );
    }

    #[test]
    fn relocated_abbrev_offset() {
        // The unit's stored abbreviation offset is zero; the real
        // table is at offset 9, carried by a relocation whose symbol
        // refers to the abbreviation section.
        let mut abbrev = vec![0x00; 9]; // an empty table occupies offset 0
        abbrev.extend_from_slice(&ABBREV);
        // The table at offset 0 terminates immediately, so decoding
        // against it would fail on code 1.
        abbrev[0] = 0x00;

        let mut symtab = vec![0u8; 24]; // null symbol
        let mut section_sym = [0u8; 24];
        section_sym[4] = 3; // STT_SECTION
        section_sym[6..8].copy_from_slice(&1u16.to_le_bytes()); // .debug_abbrev
        symtab.extend_from_slice(&section_sym);

        let mut rela = [0u8; 24];
        rela[..8].copy_from_slice(&6u64.to_le_bytes()); // abbrev offset field
        rela[8..16].copy_from_slice(&((1u64 << 32) | 0x0a).to_le_bytes());
        rela[16..].copy_from_slice(&9i64.to_le_bytes());

        let info = unit(b"a.c");
        let (data, sections) = layout(&[
            (SectionKind::DebugAbbrev, &abbrev, 0),
            (SectionKind::DebugInfo, &info, 0),
            (SectionKind::Symtab, &symtab, 24),
            (SectionKind::RelaDebugInfo, &rela, 24),
        ]);
        let mut dwarf = Dwarf::new(&data, &sections, LittleEndian);

        let units = dwarf.compilation_units().unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].abbrev_offset(), 9);
        assert_eq!(units[0].name(), Some(&b"a.c"[..]));
    }

    #[test]
    fn address_queries() {
        let aranges = [
            0x1c, 0x00, 0x00, 0x00, // length
            0x02, 0x00, // version
            0x00, 0x00, 0x00, 0x00, // info offset
            0x04, 0x00, // address size, segment size
            0x00, 0x00, 0x00, 0x00, // padding
            0x00, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, // 0x1000 + 0x100
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
        ];
        let info = unit(b"a.c");
        let (data, sections) = layout(&[
            (SectionKind::DebugAbbrev, &ABBREV, 0),
            (SectionKind::DebugInfo, &info, 0),
            (SectionKind::DebugAranges, &aranges, 0),
        ]);
        let mut dwarf = Dwarf::new(&data, &sections, LittleEndian);

        let unit = dwarf.unit_for_address(0x1040).unwrap().unwrap();
        assert_eq!(unit.name(), Some(&b"a.c"[..]));
        assert!(dwarf.unit_for_address(0x2000).unwrap().is_none());

        // The unit carries no statement list, so there is no source.
        assert_eq!(dwarf.source_for_address(0x1040), Ok(None));
        assert_eq!(dwarf.source_for_address(0), Ok(None));
    }
}
