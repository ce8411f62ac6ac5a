use crate::abbrev::AbbrevTable;
use crate::constant;
use crate::constant::{DwAt, DwForm, DwTag};
use crate::endian::Endian;
use crate::read::{string_at, Cursor, ReadError};
use crate::unit::Encoding;

/// A debugging information entry.
///
/// Entries live in an arena owned by their compilation unit; the
/// `parent` and `children` fields are indices into that arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Die<'data> {
    /// Offset of the entry relative to the start of `.debug_info`.
    pub offset: u64,
    /// The abbreviation code the entry was read with.
    pub code: u64,
    pub tag: DwTag,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub attributes: Vec<Attribute<'data>>,
}

impl<'data> Die<'data> {
    /// Read one entry and its has-children flag.
    ///
    /// Returns `None` for a null entry, which terminates a sibling
    /// chain. The caller maintains the tree structure.
    pub fn read<E: Endian>(
        c: &mut Cursor<'data, E>,
        base: u64,
        abbrev: &AbbrevTable,
        encoding: Encoding,
        debug_str: &'data [u8],
    ) -> Result<Option<(Die<'data>, bool)>, ReadError> {
        let offset = c.pos() - base;
        let code = c.read_uleb128()?;
        if code == 0 {
            return Ok(None);
        }

        let decl = match abbrev.get(code) {
            Some(decl) => decl,
            None => return Err(ReadError::Malformed("abbreviation code")),
        };

        let mut attributes = Vec::with_capacity(decl.attributes.len());
        for spec in &decl.attributes {
            let value = AttributeValue::read(c, spec.form, encoding, debug_str)?;
            attributes.push(Attribute { at: spec.at, value });
        }

        let die = Die {
            offset,
            code,
            tag: decl.tag,
            parent: None,
            children: Vec::new(),
            attributes,
        };
        Ok(Some((die, decl.children)))
    }

    pub fn attr(&self, at: DwAt) -> Option<&AttributeValue<'data>> {
        self.attributes
            .iter()
            .find(|attr| attr.at == at)
            .map(|attr| &attr.value)
    }

    pub fn attr_string(&self, at: DwAt) -> Option<&'data [u8]> {
        self.attr(at).and_then(AttributeValue::as_string)
    }

    pub fn attr_uint(&self, at: DwAt) -> Option<u64> {
        self.attr(at).and_then(AttributeValue::as_uint)
    }

    pub fn attr_offset(&self, at: DwAt) -> Option<u64> {
        self.attr(at).and_then(AttributeValue::as_offset)
    }

    pub fn attr_address(&self, at: DwAt) -> Option<u64> {
        self.attr(at).and_then(AttributeValue::as_address)
    }
}

/// An attribute of a debugging information entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'data> {
    pub at: DwAt,
    pub value: AttributeValue<'data>,
}

/// The decoded value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue<'data> {
    Address(u64),
    Block(&'data [u8]),
    Data1(u8),
    Data2(u16),
    Data4(u32),
    Data8(u64),
    UData(u64),
    SData(i64),
    Flag(bool),
    String(&'data [u8]),
    /// A `DW_FORM_strp` offset that could not be resolved against
    /// `.debug_str`. Queries treat the value as absent.
    StringOffset(u64),
    /// A reference relative to the start of the compilation unit.
    Ref(u64),
    /// A reference relative to the start of `.debug_info`.
    RefAddress(u64),
    /// A type signature reference.
    RefSig(u64),
    SecOffset(u64),
    ExprLoc(&'data [u8]),
}

impl<'data> AttributeValue<'data> {
    pub fn read<E: Endian>(
        c: &mut Cursor<'data, E>,
        form: DwForm,
        encoding: Encoding,
        debug_str: &'data [u8],
    ) -> Result<AttributeValue<'data>, ReadError> {
        let value = match form {
            constant::DW_FORM_addr => {
                AttributeValue::Address(c.read_address(encoding.address_size)?)
            }
            constant::DW_FORM_block2 => {
                let len = c.read_u16()?;
                AttributeValue::Block(c.read_block(u64::from(len))?)
            }
            constant::DW_FORM_block4 => {
                let len = c.read_u32()?;
                AttributeValue::Block(c.read_block(u64::from(len))?)
            }
            constant::DW_FORM_data2 => AttributeValue::Data2(c.read_u16()?),
            constant::DW_FORM_data4 => AttributeValue::Data4(c.read_u32()?),
            constant::DW_FORM_data8 => AttributeValue::Data8(c.read_u64()?),
            constant::DW_FORM_string => AttributeValue::String(c.read_cstring()?),
            constant::DW_FORM_block => {
                let len = c.read_uleb128()?;
                AttributeValue::Block(c.read_block(len)?)
            }
            constant::DW_FORM_block1 => {
                let len = c.read_u8()?;
                AttributeValue::Block(c.read_block(u64::from(len))?)
            }
            constant::DW_FORM_data1 => AttributeValue::Data1(c.read_u8()?),
            constant::DW_FORM_flag => AttributeValue::Flag(c.read_u8()? != 0),
            constant::DW_FORM_sdata => AttributeValue::SData(c.read_sleb128()?),
            constant::DW_FORM_strp => {
                let offset = c.read_offset(encoding.offset_size)?;
                match string_at(debug_str, offset) {
                    Some(val) => AttributeValue::String(val),
                    None => AttributeValue::StringOffset(offset),
                }
            }
            constant::DW_FORM_udata => AttributeValue::UData(c.read_uleb128()?),
            constant::DW_FORM_ref_addr => {
                // DWARF 2 encoded this with the address size.
                let size = if encoding.version == 2 {
                    encoding.address_size
                } else {
                    encoding.offset_size
                };
                AttributeValue::RefAddress(c.read_offset(size)?)
            }
            constant::DW_FORM_ref1 => AttributeValue::Ref(u64::from(c.read_u8()?)),
            constant::DW_FORM_ref2 => AttributeValue::Ref(u64::from(c.read_u16()?)),
            constant::DW_FORM_ref4 => AttributeValue::Ref(u64::from(c.read_u32()?)),
            constant::DW_FORM_ref8 => AttributeValue::Ref(c.read_u64()?),
            constant::DW_FORM_ref_udata => AttributeValue::Ref(c.read_uleb128()?),
            constant::DW_FORM_indirect => {
                let form = DwForm(c.read_uleb128_u16()?);
                if form == constant::DW_FORM_indirect {
                    return Err(ReadError::Malformed("indirect attribute form"));
                }
                return AttributeValue::read(c, form, encoding, debug_str);
            }
            constant::DW_FORM_sec_offset => {
                AttributeValue::SecOffset(c.read_offset(encoding.offset_size)?)
            }
            constant::DW_FORM_exprloc => {
                let len = c.read_uleb128()?;
                AttributeValue::ExprLoc(c.read_block(len)?)
            }
            constant::DW_FORM_flag_present => AttributeValue::Flag(true),
            constant::DW_FORM_ref_sig8 => AttributeValue::RefSig(c.read_u64()?),
            _ => return Err(ReadError::Unsupported("attribute form")),
        };
        Ok(value)
    }

    pub fn as_string(&self) -> Option<&'data [u8]> {
        match *self {
            AttributeValue::String(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match *self {
            AttributeValue::Data1(val) => Some(u64::from(val)),
            AttributeValue::Data2(val) => Some(u64::from(val)),
            AttributeValue::Data4(val) => Some(u64::from(val)),
            AttributeValue::Data8(val) => Some(val),
            AttributeValue::UData(val) => Some(val),
            AttributeValue::SData(val) if val >= 0 => Some(val as u64),
            _ => None,
        }
    }

    pub fn as_sint(&self) -> Option<i64> {
        match *self {
            AttributeValue::Data1(val) => Some(i64::from(val)),
            AttributeValue::Data2(val) => Some(i64::from(val)),
            AttributeValue::Data4(val) => Some(i64::from(val)),
            AttributeValue::Data8(val) => Some(val as i64),
            AttributeValue::UData(val) => Some(val as i64),
            AttributeValue::SData(val) => Some(val),
            _ => None,
        }
    }

    /// The value as an offset into another section.
    ///
    /// DWARF 2 and 3 producers commonly used plain data forms for
    /// section offsets; DWARF 4 introduced `DW_FORM_sec_offset`.
    pub fn as_offset(&self) -> Option<u64> {
        match *self {
            AttributeValue::SecOffset(val) => Some(val),
            AttributeValue::Data4(val) => Some(u64::from(val)),
            AttributeValue::Data8(val) => Some(val),
            AttributeValue::UData(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<u64> {
        match *self {
            AttributeValue::Address(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            AttributeValue::Flag(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&'data [u8]> {
        match *self {
            AttributeValue::Block(val) | AttributeValue::ExprLoc(val) => Some(val),
            _ => None,
        }
    }
}
