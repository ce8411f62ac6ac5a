use std::collections::HashMap;

use crate::constant;
use crate::constant::{DwAt, DwChildren, DwForm, DwTag};
use crate::endian::Endian;
use crate::read::{Cursor, ReadError};

/// An abbreviation table from the `.debug_abbrev` section.
///
/// Declarations are kept in the order they appear so that a dump of
/// the table matches the file, with a code index on the side for the
/// lookups done while reading debugging information entries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AbbrevTable {
    entries: Vec<Abbrev>,
    index: HashMap<u64, usize>,
}

impl AbbrevTable {
    pub fn new() -> AbbrevTable {
        AbbrevTable::default()
    }

    /// Read an abbreviation table, up to its terminating zero code.
    pub fn read<E: Endian>(c: &mut Cursor<'_, E>) -> Result<AbbrevTable, ReadError> {
        let mut table = AbbrevTable::new();
        while let Some(abbrev) = Abbrev::read(c)? {
            if !table.insert(abbrev) {
                return Err(ReadError::Malformed("duplicate abbreviation code"));
            }
        }
        Ok(table)
    }

    /// Add a declaration. Returns false if its code is already taken.
    pub fn insert(&mut self, abbrev: Abbrev) -> bool {
        if self.index.contains_key(&abbrev.code) {
            return false;
        }
        self.index.insert(abbrev.code, self.entries.len());
        self.entries.push(abbrev);
        true
    }

    pub fn get(&self, code: u64) -> Option<&Abbrev> {
        self.index.get(&code).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Abbrev> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single abbreviation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbrev {
    pub code: u64,
    pub tag: DwTag,
    pub children: bool,
    pub attributes: Vec<AbbrevAttribute>,
}

impl Abbrev {
    /// Read a declaration, returning `None` at the table terminator.
    pub fn read<E: Endian>(c: &mut Cursor<'_, E>) -> Result<Option<Abbrev>, ReadError> {
        let code = c.read_uleb128()?;
        if code == 0 {
            return Ok(None);
        }

        let tag = c.read_uleb128_u16()?;

        let children = match DwChildren(c.read_u8()?) {
            constant::DW_CHILDREN_no => false,
            constant::DW_CHILDREN_yes => true,
            _ => return Err(ReadError::Malformed("children flag")),
        };

        let mut attributes = Vec::new();
        while let Some(attribute) = AbbrevAttribute::read(c)? {
            attributes.push(attribute);
        }

        Ok(Some(Abbrev {
            code,
            tag: DwTag(tag),
            children,
            attributes,
        }))
    }
}

/// An attribute specification within an abbreviation declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbbrevAttribute {
    pub at: DwAt,
    pub form: DwForm,
}

impl AbbrevAttribute {
    /// Read a specification, returning `None` at the (0, 0) terminator.
    pub fn read<E: Endian>(c: &mut Cursor<'_, E>) -> Result<Option<AbbrevAttribute>, ReadError> {
        let at = DwAt(c.read_uleb128_u16()?);
        let form = DwForm(c.read_uleb128_u16()?);
        if at == DwAt(0) && form == DwForm(0) {
            Ok(None)
        } else {
            Ok(Some(AbbrevAttribute { at, form }))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::endian::LittleEndian;

    #[test]
    fn abbrev_table() {
        let buf = [
            0x01, 0x39, 0x01, 0x03, 0x0e, 0x00, 0x00, // namespace, name: strp
            0x02, 0x2e, 0x00, 0x03, 0x08, 0x3f, 0x0c, 0x00, 0x00, // subprogram
            0x00, // terminator
        ];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        let table = AbbrevTable::read(&mut c).unwrap();
        assert!(c.is_empty());
        assert_eq!(table.len(), 2);

        let abbrev = table.get(1).unwrap();
        assert_eq!(abbrev.tag, constant::DW_TAG_namespace);
        assert!(abbrev.children);
        assert_eq!(
            abbrev.attributes,
            [AbbrevAttribute {
                at: constant::DW_AT_name,
                form: constant::DW_FORM_strp,
            }]
        );

        let abbrev = table.get(2).unwrap();
        assert_eq!(abbrev.tag, constant::DW_TAG_subprogram);
        assert!(!abbrev.children);
        assert_eq!(abbrev.attributes.len(), 2);

        assert!(table.get(3).is_none());

        // Order of declaration is preserved.
        let codes: Vec<u64> = table.iter().map(|abbrev| abbrev.code).collect();
        assert_eq!(codes, [1, 2]);
    }

    #[test]
    fn abbrev_empty() {
        let buf = [0x00];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        let table = AbbrevTable::read(&mut c).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn abbrev_duplicate_code() {
        let buf = [
            0x01, 0x39, 0x01, 0x00, 0x00, //
            0x01, 0x2e, 0x00, 0x00, 0x00, //
            0x00,
        ];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        assert_eq!(
            AbbrevTable::read(&mut c),
            Err(ReadError::Malformed("duplicate abbreviation code"))
        );
    }

    #[test]
    fn abbrev_truncated() {
        let buf = [0x01, 0x39];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        assert_eq!(AbbrevTable::read(&mut c), Err(ReadError::UnexpectedEnd));
    }

    #[test]
    fn abbrev_attribute() {
        let buf = [0x03, 0x0e];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        assert_eq!(
            AbbrevAttribute::read(&mut c),
            Ok(Some(AbbrevAttribute {
                at: constant::DW_AT_name,
                form: constant::DW_FORM_strp,
            }))
        );

        let buf = [0x00, 0x00];
        let mut c = Cursor::new(&buf[..], LittleEndian);
        assert_eq!(AbbrevAttribute::read(&mut c), Ok(None));
    }
}
