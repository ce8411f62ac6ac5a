use crate::endian::Endian;
use crate::read::{Cursor, ReadError};

/// The public names of one compilation unit, from `.debug_pubnames`.
///
/// Each entry maps the `.debug_info` relative offset of a defining
/// entry to its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSet<'data> {
    /// Offset of the set relative to the start of `.debug_pubnames`.
    pub offset: u64,
    pub version: u16,
    pub offset_size: u8,
    /// The `.debug_info` offset of the unit the names belong to.
    pub info_offset: u64,
    /// The length of that unit, including its header.
    pub info_length: u64,
    names: Vec<(u64, &'data [u8])>,
}

impl<'data> NameSet<'data> {
    /// Read one name set. `base` is the file offset of the start of
    /// `.debug_pubnames` and `offset` the set's position within it.
    ///
    /// The cursor is left at the start of the next set.
    pub fn read<E: Endian>(
        c: &mut Cursor<'data, E>,
        base: u64,
        offset: u64,
    ) -> Result<NameSet<'data>, ReadError> {
        c.seek(base + offset)?;
        let (offset_size, length) = c.read_initial_length()?;
        let end = c.pos() + length;

        let version = c.read_u16()?;
        if version != 2 {
            return Err(ReadError::Unsupported("public names table version"));
        }
        let info_offset = c.read_offset(offset_size)?;
        let info_length = c.read_offset(offset_size)?;

        let mut names = Vec::new();
        while c.pos() < end {
            let die_offset = c.read_offset(offset_size)?;
            if die_offset == 0 {
                break;
            }
            names.push((die_offset, c.read_cstring()?));
        }
        c.seek(end)?;

        Ok(NameSet {
            offset,
            version,
            offset_size,
            info_offset,
            info_length,
            names,
        })
    }

    /// The name recorded for a unit relative entry offset.
    pub fn name(&self, die_offset: u64) -> Option<&'data [u8]> {
        self.names
            .iter()
            .find(|&&(offset, _)| offset == die_offset)
            .map(|&(_, name)| name)
    }

    /// The (entry offset, name) pairs in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, (u64, &'data [u8])> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::endian::LittleEndian;

    const SET: [u8; 33] = [
        0x1d, 0x00, 0x00, 0x00, // length
        0x02, 0x00, // version
        0x00, 0x00, 0x00, 0x00, // info offset
        0x30, 0x00, 0x00, 0x00, // info length
        0x0b, 0x00, 0x00, 0x00, b'm', b'a', b'i', b'n', 0x00, // offset 0xb: "main"
        0x18, 0x00, 0x00, 0x00, b'f', 0x00, // offset 0x18: "f"
        0x00, 0x00, 0x00, 0x00, // terminator
    ];

    #[test]
    fn name_set() {
        let mut c = Cursor::new(&SET[..], LittleEndian);
        let set = NameSet::read(&mut c, 0, 0).unwrap();
        assert_eq!(c.pos(), SET.len() as u64);
        assert_eq!(set.version, 2);
        assert_eq!(set.info_offset, 0);
        assert_eq!(set.info_length, 0x30);
        assert_eq!(set.len(), 2);
        assert_eq!(set.name(0x0b), Some(&b"main"[..]));
        assert_eq!(set.name(0x18), Some(&b"f"[..]));
        assert_eq!(set.name(0x19), None);

        let names: Vec<_> = set.iter().map(|&(_, name)| name).collect();
        assert_eq!(names, [&b"main"[..], b"f"]);
    }

    #[test]
    fn bad_version() {
        let mut buf = SET;
        buf[4] = 0x04;
        let mut c = Cursor::new(&buf[..], LittleEndian);
        assert_eq!(
            NameSet::read(&mut c, 0, 0),
            Err(ReadError::Unsupported("public names table version"))
        );
    }
}
