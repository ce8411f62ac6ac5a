use crate::endian::Endian;
use crate::read::{Cursor, ReadError};

/// One (address, length) tuple from an address range table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub address: u64,
    pub length: u64,
}

impl AddressRange {
    pub fn contains(&self, address: u64) -> bool {
        address >= self.address && address - self.address < self.length
    }
}

/// The address ranges of one compilation unit, from `.debug_aranges`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    /// Offset of the set relative to the start of `.debug_aranges`.
    pub offset: u64,
    pub version: u16,
    pub offset_size: u8,
    /// The `.debug_info` offset of the unit the ranges belong to.
    pub info_offset: u64,
    pub address_size: u8,
    pub segment_size: u8,
    pub ranges: Vec<AddressRange>,
}

impl RangeSet {
    /// Read one range set. `base` is the file offset of the start of
    /// `.debug_aranges` and `offset` the set's position within it.
    ///
    /// The cursor is left at the start of the next set.
    pub fn read<E: Endian>(
        c: &mut Cursor<'_, E>,
        base: u64,
        offset: u64,
    ) -> Result<RangeSet, ReadError> {
        c.seek(base + offset)?;
        let (offset_size, length) = c.read_initial_length()?;
        let end = c.pos() + length;

        let version = c.read_u16()?;
        if version != 2 {
            return Err(ReadError::Unsupported("address range table version"));
        }
        let info_offset = c.read_offset(offset_size)?;
        let address_size = c.read_u8()?;
        let segment_size = c.read_u8()?;
        if segment_size != 0 {
            return Err(ReadError::Unsupported("segmented address ranges"));
        }

        // The first tuple is aligned to the tuple size, measured from
        // the start of the section.
        let tuple = 2 * u64::from(address_size);
        if tuple == 0 {
            return Err(ReadError::Malformed("address size"));
        }
        let misalign = (c.pos() - base) % tuple;
        if misalign != 0 {
            c.skip(tuple - misalign)?;
        }

        let mut ranges = Vec::new();
        while c.pos() < end {
            let address = c.read_address(address_size)?;
            let length = c.read_address(address_size)?;
            if address == 0 && length == 0 {
                break;
            }
            ranges.push(AddressRange { address, length });
        }
        c.seek(end)?;

        Ok(RangeSet {
            offset,
            version,
            offset_size,
            info_offset,
            address_size,
            segment_size,
            ranges,
        })
    }

    pub fn contains(&self, address: u64) -> bool {
        self.ranges.iter().any(|range| range.contains(address))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::endian::LittleEndian;

    // A set with 4-byte addresses: a 12 byte header, 4 bytes of
    // padding to the 8 byte tuple alignment, two tuples and the
    // terminator.
    const SET: [u8; 32] = [
        0x1c, 0x00, 0x00, 0x00, // length
        0x02, 0x00, // version
        0x40, 0x00, 0x00, 0x00, // info offset
        0x04, // address size
        0x00, // segment size
        0x00, 0x00, 0x00, 0x00, // padding
        0x00, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, // 0x1000 + 0x100
        0x00, 0x30, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, // 0x3000 + 0x10
        // no explicit terminator; the length ends the set
    ];

    #[test]
    fn range_set() {
        let mut c = Cursor::new(&SET[..], LittleEndian);
        let set = RangeSet::read(&mut c, 0, 0).unwrap();
        assert_eq!(c.pos(), SET.len() as u64);
        assert_eq!(set.version, 2);
        assert_eq!(set.info_offset, 0x40);
        assert_eq!(set.address_size, 4);
        assert_eq!(
            set.ranges,
            [
                AddressRange {
                    address: 0x1000,
                    length: 0x100,
                },
                AddressRange {
                    address: 0x3000,
                    length: 0x10,
                },
            ]
        );

        assert!(set.contains(0x1000));
        assert!(set.contains(0x10ff));
        assert!(!set.contains(0x1100));
        assert!(set.contains(0x300f));
        assert!(!set.contains(0));
    }

    #[test]
    fn sentinel_terminated() {
        let mut buf = SET.to_vec();
        buf[0] = 0x34; // length now covers a trailing sentinel and junk
        buf.extend_from_slice(&[0; 8]); // sentinel
        buf.extend_from_slice(&[0xaa; 16]); // junk within the length
        let mut c = Cursor::new(&buf[..], LittleEndian);
        let set = RangeSet::read(&mut c, 0, 0).unwrap();
        assert_eq!(set.ranges.len(), 2);
        // The cursor still lands one past the declared length.
        assert_eq!(c.pos(), buf.len() as u64);
    }

    #[test]
    fn bad_version() {
        let mut buf = SET;
        buf[4] = 0x03;
        let mut c = Cursor::new(&buf[..], LittleEndian);
        assert_eq!(
            RangeSet::read(&mut c, 0, 0),
            Err(ReadError::Unsupported("address range table version"))
        );
    }

    #[test]
    fn truncated() {
        let mut c = Cursor::new(&SET[..8], LittleEndian);
        assert!(RangeSet::read(&mut c, 0, 0).is_err());
    }
}
