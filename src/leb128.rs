use std::ops::{BitOrAssign, Not, Shl};

use crate::read::ReadError;

fn read_byte(r: &mut &[u8]) -> Result<u8, ReadError> {
    match r.split_first() {
        Some((&byte, rest)) => {
            *r = rest;
            Ok(byte)
        }
        None => Err(ReadError::UnexpectedEnd),
    }
}

fn read_unsigned<T>(r: &mut &[u8], size: usize) -> Result<T, ReadError>
where
    T: Default + BitOrAssign + Shl<usize, Output = T> + From<u8>,
{
    let mut result = T::default();
    let mut shift = 0;
    loop {
        let byte = read_byte(r)?;
        result |= T::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= size {
            return Err(ReadError::Overflow);
        }
    }
}

fn read_signed<T>(r: &mut &[u8], size: usize) -> Result<T, ReadError>
where
    T: Default + Copy + BitOrAssign + Not<Output = T> + Shl<usize, Output = T> + From<u8>,
{
    let zero = T::default();
    let mut result = zero;
    let mut shift = 0;
    loop {
        let byte = read_byte(r)?;
        result |= T::from(byte & 0x7f) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            if shift < size && (byte & 0x40) != 0 {
                // Sign extend
                result |= !zero << shift;
            }
            return Ok(result);
        }
        if shift >= size {
            return Err(ReadError::Overflow);
        }
    }
}

pub fn read_u16(r: &mut &[u8]) -> Result<u16, ReadError> {
    read_unsigned::<u16>(r, 16)
}

pub fn read_u64(r: &mut &[u8]) -> Result<u64, ReadError> {
    read_unsigned::<u64>(r, 64)
}

pub fn read_i64(r: &mut &[u8]) -> Result<i64, ReadError> {
    read_signed::<i64>(r, 64)
}
