use std::fmt::Debug;

use byteorder::ByteOrder;

use crate::read::ReadError;

/// A byte order for reading multi-byte values out of a buffer.
///
/// The fixed [`LittleEndian`] and [`BigEndian`] types compile down to
/// direct loads; [`AnyEndian`] dispatches at runtime and is what the
/// ELF loader hands out, since the byte order is only known once the
/// file header has been seen.
pub trait Endian: Debug + Clone + Copy + PartialEq + Eq {
    fn read_u16(self, r: &mut &[u8]) -> Result<u16, ReadError>;
    fn read_u32(self, r: &mut &[u8]) -> Result<u32, ReadError>;
    fn read_u64(self, r: &mut &[u8]) -> Result<u64, ReadError>;
}

fn take<'a>(r: &mut &'a [u8], len: usize) -> Result<&'a [u8], ReadError> {
    if r.len() < len {
        return Err(ReadError::UnexpectedEnd);
    }
    let (val, rest) = r.split_at(len);
    *r = rest;
    Ok(val)
}

/// Little-endian byte order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LittleEndian;

impl Endian for LittleEndian {
    #[inline]
    fn read_u16(self, r: &mut &[u8]) -> Result<u16, ReadError> {
        take(r, 2).map(byteorder::LittleEndian::read_u16)
    }

    #[inline]
    fn read_u32(self, r: &mut &[u8]) -> Result<u32, ReadError> {
        take(r, 4).map(byteorder::LittleEndian::read_u32)
    }

    #[inline]
    fn read_u64(self, r: &mut &[u8]) -> Result<u64, ReadError> {
        take(r, 8).map(byteorder::LittleEndian::read_u64)
    }
}

/// Big-endian byte order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BigEndian;

impl Endian for BigEndian {
    #[inline]
    fn read_u16(self, r: &mut &[u8]) -> Result<u16, ReadError> {
        take(r, 2).map(byteorder::BigEndian::read_u16)
    }

    #[inline]
    fn read_u32(self, r: &mut &[u8]) -> Result<u32, ReadError> {
        take(r, 4).map(byteorder::BigEndian::read_u32)
    }

    #[inline]
    fn read_u64(self, r: &mut &[u8]) -> Result<u64, ReadError> {
        take(r, 8).map(byteorder::BigEndian::read_u64)
    }
}

/// A byte order determined at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyEndian {
    Little,
    Big,
}

impl Default for AnyEndian {
    fn default() -> Self {
        AnyEndian::Little
    }
}

impl Endian for AnyEndian {
    #[inline]
    fn read_u16(self, r: &mut &[u8]) -> Result<u16, ReadError> {
        match self {
            AnyEndian::Little => LittleEndian.read_u16(r),
            AnyEndian::Big => BigEndian.read_u16(r),
        }
    }

    #[inline]
    fn read_u32(self, r: &mut &[u8]) -> Result<u32, ReadError> {
        match self {
            AnyEndian::Little => LittleEndian.read_u32(r),
            AnyEndian::Big => BigEndian.read_u32(r),
        }
    }

    #[inline]
    fn read_u64(self, r: &mut &[u8]) -> Result<u64, ReadError> {
        match self {
            AnyEndian::Little => LittleEndian.read_u64(r),
            AnyEndian::Big => BigEndian.read_u64(r),
        }
    }
}
