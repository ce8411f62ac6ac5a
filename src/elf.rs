//! Loading of debugging sections from ELF object files.

use std::path::Path;

use ::elf::abi::SHT_NOBITS;
use ::elf::endian::AnyEndian as ElfEndian;
use ::elf::ElfBytes;

use crate::endian::AnyEndian;
use crate::read::ReadError;
use crate::sections::{File, Section, SectionKind, SectionTable};

impl From<::elf::ParseError> for ReadError {
    fn from(_: ::elf::ParseError) -> Self {
        ReadError::Elf
    }
}

/// Load the debugging sections of an ELF file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> Result<File, ReadError> {
    let data = std::fs::read(path.as_ref())?;
    load_bytes(data)
}

/// Load the debugging sections of an ELF image already in memory.
pub fn load_bytes(data: Vec<u8>) -> Result<File, ReadError> {
    let (sections, endian) = parse_sections(&data)?;
    Ok(File::new(data, sections, endian))
}

fn parse_sections(data: &[u8]) -> Result<(SectionTable, AnyEndian), ReadError> {
    let elf = ElfBytes::<ElfEndian>::minimal_parse(data)?;
    let endian = match elf.ehdr.endianness {
        ElfEndian::Little => AnyEndian::Little,
        ElfEndian::Big => AnyEndian::Big,
    };

    let mut sections = SectionTable::new();
    let (headers, strtab) = match elf.section_headers_with_strtab()? {
        (Some(headers), Some(strtab)) => (headers, strtab),
        _ => return Ok((sections, endian)),
    };

    for (index, header) in headers.iter().enumerate() {
        let name = match strtab.get(header.sh_name as usize) {
            Ok(name) => name,
            Err(_) => continue,
        };
        let kind = match SectionKind::from_name(name) {
            Some(kind) => kind,
            None => continue,
        };
        if header.sh_type == SHT_NOBITS {
            continue;
        }
        let end = header
            .sh_offset
            .checked_add(header.sh_size)
            .ok_or(ReadError::Malformed("section bounds"))?;
        if end > data.len() as u64 {
            return Err(ReadError::Malformed("section bounds"));
        }
        sections.push(Section {
            kind,
            index,
            offset: header.sh_offset,
            size: header.sh_size,
            entsize: header.sh_entsize,
            link: header.sh_link,
        });
    }

    Ok((sections, endian))
}
