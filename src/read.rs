use std::io;

use thiserror::Error;

use crate::endian::Endian;
use crate::leb128;

/// An error encountered while decoding debugging information.
///
/// Decoding is tolerant where the data allows it: a bad compilation
/// unit does not prevent reading its siblings, and a cyclic macro
/// include is skipped rather than looped over. Errors of this type
/// are returned where a table cannot be decoded at all.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error("error reading object file")]
    Io,
    #[error("malformed ELF container")]
    Elf,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("malformed {0}")]
    Malformed(&'static str),
    #[error("unsupported {0}")]
    Unsupported(&'static str),
    #[error("integer overflow in LEB128 value")]
    Overflow,
    #[error("unresolved reference to {0}")]
    UnresolvedReference(&'static str),
    #[error("cyclic include of macro table at offset 0x{0:x}")]
    CyclicInclude(u64),
}

impl From<io::Error> for ReadError {
    fn from(_: io::Error) -> Self {
        ReadError::Io
    }
}

/// A position within a buffer of debugging information.
///
/// The cursor covers the whole object file image, so a reader may
/// follow an offset into another section without re-slicing. Bounds
/// are only enforced against the underlying buffer; section limits
/// are the caller's concern.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'data, E: Endian> {
    data: &'data [u8],
    pos: usize,
    endian: E,
}

impl<'data, E: Endian> Cursor<'data, E> {
    pub fn new(data: &'data [u8], endian: E) -> Cursor<'data, E> {
        Cursor {
            data,
            pos: 0,
            endian,
        }
    }

    /// Create a cursor positioned at `pos`.
    pub fn at(data: &'data [u8], pos: u64, endian: E) -> Result<Cursor<'data, E>, ReadError> {
        let mut cursor = Cursor::new(data, endian);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    pub fn endian(&self) -> E {
        self.endian
    }

    pub fn pos(&self) -> u64 {
        self.pos as u64
    }

    pub fn seek(&mut self, pos: u64) -> Result<(), ReadError> {
        if pos > self.data.len() as u64 {
            return Err(ReadError::UnexpectedEnd);
        }
        self.pos = pos as usize;
        Ok(())
    }

    pub fn skip(&mut self, len: u64) -> Result<(), ReadError> {
        self.seek(self.pos as u64 + len)
    }

    /// The unread remainder of the buffer.
    pub fn remaining(&self) -> &'data [u8] {
        &self.data[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn advance_to(&mut self, rest: &[u8]) {
        self.pos = self.data.len() - rest.len();
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(ReadError::UnexpectedEnd),
        }
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        self.read_u8().map(|val| val as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let mut r = self.remaining();
        let val = self.endian.read_u16(&mut r)?;
        self.advance_to(r);
        Ok(val)
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let mut r = self.remaining();
        let val = self.endian.read_u32(&mut r)?;
        self.advance_to(r);
        Ok(val)
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        let mut r = self.remaining();
        let val = self.endian.read_u64(&mut r)?;
        self.advance_to(r);
        Ok(val)
    }

    pub fn read_uleb128(&mut self) -> Result<u64, ReadError> {
        let mut r = self.remaining();
        let val = leb128::read_u64(&mut r)?;
        self.advance_to(r);
        Ok(val)
    }

    pub fn read_uleb128_u16(&mut self) -> Result<u16, ReadError> {
        let mut r = self.remaining();
        let val = leb128::read_u16(&mut r)?;
        self.advance_to(r);
        Ok(val)
    }

    pub fn read_sleb128(&mut self) -> Result<i64, ReadError> {
        let mut r = self.remaining();
        let val = leb128::read_i64(&mut r)?;
        self.advance_to(r);
        Ok(val)
    }

    pub fn read_block(&mut self, len: u64) -> Result<&'data [u8], ReadError> {
        let rest = self.remaining();
        if len > rest.len() as u64 {
            return Err(ReadError::UnexpectedEnd);
        }
        let val = &rest[..len as usize];
        self.pos += len as usize;
        Ok(val)
    }

    /// Read a NUL terminated string, not including the terminator.
    pub fn read_cstring(&mut self) -> Result<&'data [u8], ReadError> {
        let rest = self.remaining();
        let len = match rest.iter().position(|&byte| byte == 0) {
            Some(len) => len,
            None => return Err(ReadError::Malformed("string")),
        };
        self.pos += len + 1;
        Ok(&rest[..len])
    }

    pub fn read_offset(&mut self, offset_size: u8) -> Result<u64, ReadError> {
        match offset_size {
            4 => self.read_u32().map(u64::from),
            8 => self.read_u64(),
            _ => Err(ReadError::Unsupported("offset size")),
        }
    }

    pub fn read_address(&mut self, address_size: u8) -> Result<u64, ReadError> {
        match address_size {
            4 => self.read_u32().map(u64::from),
            8 => self.read_u64(),
            _ => Err(ReadError::Unsupported("address size")),
        }
    }

    /// Read an initial length field, returning the offset size it
    /// selects and the length itself.
    ///
    /// A 32-bit value of `0xffff_ffff` escapes to the 64-bit format;
    /// the remaining values above `0xffff_fff0` are reserved.
    pub fn read_initial_length(&mut self) -> Result<(u8, u64), ReadError> {
        let mut offset_size = 4;
        let mut len = u64::from(self.read_u32()?);
        if len == 0xffff_ffff {
            offset_size = 8;
            len = self.read_u64()?;
        } else if len >= 0xffff_fff0 {
            return Err(ReadError::Unsupported("reserved initial length"));
        }
        if len > self.remaining().len() as u64 {
            return Err(ReadError::Malformed("initial length"));
        }
        Ok((offset_size, len))
    }
}

/// Look up a NUL terminated string at an offset in a string section.
pub(crate) fn string_at(data: &[u8], offset: u64) -> Option<&[u8]> {
    if offset > data.len() as u64 {
        return None;
    }
    let rest = &data[offset as usize..];
    rest.iter().position(|&byte| byte == 0).map(|len| &rest[..len])
}
