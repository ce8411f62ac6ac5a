//! A reader for the debugging information in ELF object files.
//!
//! The DWARF sections are decoded into compilation units of
//! debugging information entries, line number programs, macro
//! tables, address range and public name indexes; files built
//! without DWARF fall back to the legacy STABS records. Decoding is
//! lazy and memoized per table offset, so repeated queries against
//! the same file stay cheap.
//!
//! ```no_run
//! use debugread::FallibleIterator;
//!
//! # fn main() -> Result<(), debugread::ReadError> {
//! let file = debugread::elf::load("fixture.o")?;
//! let mut dwarf = file.dwarf();
//! let mut units = dwarf.units();
//! while let Some(unit) = units.next()? {
//!     println!("{:?}", unit.name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod constant;
pub mod display;
pub mod elf;

mod abbrev;
mod aranges;
mod die;
mod dwarf;
mod endian;
mod leb128;
mod line;
mod macinfo;
mod pubnames;
mod read;
mod reloc;
mod sections;
mod stabs;
mod symtab;
mod unit;

pub use fallible_iterator::FallibleIterator;

pub use crate::abbrev::{Abbrev, AbbrevAttribute, AbbrevTable};
pub use crate::aranges::{AddressRange, RangeSet};
pub use crate::die::{Attribute, AttributeValue, Die};
pub use crate::dwarf::{Dwarf, SourceLocation, UnitIter};
pub use crate::endian::{AnyEndian, BigEndian, Endian, LittleEndian};
pub use crate::line::{FileEntry, LineNumber, LineProgram};
pub use crate::macinfo::{MacroEntry, MacroFormat, MacroTable};
pub use crate::pubnames::NameSet;
pub use crate::read::{Cursor, ReadError};
pub use crate::reloc::RelocationTable;
pub use crate::sections::{File, Section, SectionKind, SectionTable};
pub use crate::stabs::{repair_source_name, StabUnit};
pub use crate::symtab::SymbolTable;
pub use crate::unit::{CompilationUnit, Encoding, UnitHeader};
