use crate::dwarf::Dwarf;
use crate::endian::AnyEndian;
use crate::read::ReadError;
use crate::stabs::{self, StabUnit};

/// A debugging related section role recognized by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    DebugAbbrev,
    DebugInfo,
    DebugLine,
    DebugMacinfo,
    DebugMacro,
    DebugAranges,
    DebugPubnames,
    DebugStr,
    RelaDebugInfo,
    Symtab,
    Stab,
    StabStr,
    StabIndex,
    StabIndexStr,
}

impl SectionKind {
    pub fn from_name(name: &str) -> Option<SectionKind> {
        let kind = match name {
            ".debug_abbrev" => SectionKind::DebugAbbrev,
            ".debug_info" => SectionKind::DebugInfo,
            ".debug_line" => SectionKind::DebugLine,
            ".debug_macinfo" => SectionKind::DebugMacinfo,
            ".debug_macro" => SectionKind::DebugMacro,
            ".debug_aranges" => SectionKind::DebugAranges,
            ".debug_pubnames" => SectionKind::DebugPubnames,
            ".debug_str" => SectionKind::DebugStr,
            ".rela.debug_info" => SectionKind::RelaDebugInfo,
            ".symtab" => SectionKind::Symtab,
            ".stab" => SectionKind::Stab,
            ".stabstr" => SectionKind::StabStr,
            ".stab.index" => SectionKind::StabIndex,
            ".stab.indexstr" => SectionKind::StabIndexStr,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::DebugAbbrev => ".debug_abbrev",
            SectionKind::DebugInfo => ".debug_info",
            SectionKind::DebugLine => ".debug_line",
            SectionKind::DebugMacinfo => ".debug_macinfo",
            SectionKind::DebugMacro => ".debug_macro",
            SectionKind::DebugAranges => ".debug_aranges",
            SectionKind::DebugPubnames => ".debug_pubnames",
            SectionKind::DebugStr => ".debug_str",
            SectionKind::RelaDebugInfo => ".rela.debug_info",
            SectionKind::Symtab => ".symtab",
            SectionKind::Stab => ".stab",
            SectionKind::StabStr => ".stabstr",
            SectionKind::StabIndex => ".stab.index",
            SectionKind::StabIndexStr => ".stab.indexstr",
        }
    }
}

/// The location of a recognized section within the file image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// Index of the section header in the ELF section header table.
    pub index: usize,
    pub offset: u64,
    pub size: u64,
    pub entsize: u64,
    pub link: u32,
}

impl Section {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// The recognized sections of an object file.
#[derive(Debug, Default, Clone)]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    pub fn new() -> SectionTable {
        SectionTable::default()
    }

    /// Record a section. The first section seen for a given kind wins.
    pub fn push(&mut self, section: Section) {
        if self.get(section.kind).is_none() {
            self.sections.push(section);
        }
    }

    pub fn get(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// The ELF section header index for a section kind.
    pub fn elf_index(&self, kind: SectionKind) -> Option<usize> {
        self.get(kind).map(|section| section.index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// An object file image and the debugging sections found in it.
///
/// This owns the raw bytes. [`File::dwarf`] borrows them out as a
/// [`Dwarf`] reader; the reader carries the decode caches, so a long
/// lived `File` costs no more than its buffer.
#[derive(Debug)]
pub struct File {
    data: Vec<u8>,
    sections: SectionTable,
    endian: AnyEndian,
}

impl File {
    pub fn new(data: Vec<u8>, sections: SectionTable, endian: AnyEndian) -> File {
        File {
            data,
            sections,
            endian,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn endian(&self) -> AnyEndian {
        self.endian
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.get(kind)
    }

    pub fn section_data(&self, kind: SectionKind) -> Option<&[u8]> {
        let section = self.sections.get(kind)?;
        self.data
            .get(section.offset as usize..section.end() as usize)
    }

    pub fn has_dwarf(&self) -> bool {
        self.section(SectionKind::DebugInfo).is_some()
    }

    pub fn has_stabs(&self) -> bool {
        self.stab_section_kinds().is_some()
    }

    /// A DWARF reader over this file's sections.
    pub fn dwarf(&self) -> Dwarf<'_, AnyEndian> {
        Dwarf::new(&self.data, &self.sections, self.endian)
    }

    fn stab_section_kinds(&self) -> Option<(SectionKind, SectionKind)> {
        if self.section(SectionKind::StabIndex).is_some()
            && self.section(SectionKind::StabIndexStr).is_some()
        {
            return Some((SectionKind::StabIndex, SectionKind::StabIndexStr));
        }
        if self.section(SectionKind::Stab).is_some() && self.section(SectionKind::StabStr).is_some()
        {
            return Some((SectionKind::Stab, SectionKind::StabStr));
        }
        None
    }

    /// The STABS compilation units in this file, if any.
    ///
    /// Prefers the Sun `.stab.index` pair over plain `.stab`, since
    /// the index carries one entry per module rather than the full
    /// symbol stream.
    pub fn stab_units(&self) -> Result<Vec<StabUnit>, ReadError> {
        let (stab_kind, str_kind) = match self.stab_section_kinds() {
            Some(kinds) => kinds,
            None => return Ok(Vec::new()),
        };
        let stab = self
            .section_data(stab_kind)
            .ok_or(ReadError::Malformed("stab section bounds"))?;
        let stabstr = self
            .section_data(str_kind)
            .ok_or(ReadError::Malformed("stab string section bounds"))?;
        stabs::read_units(stab, stabstr, self.endian)
    }
}
