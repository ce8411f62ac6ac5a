//! Human readable dumps of the decoded structures.
//!
//! The output is a diagnostic convenience: deterministic for a given
//! input, but not a stable format.

use std::fmt;
use std::io;

use crate::abbrev::AbbrevTable;
use crate::aranges::RangeSet;
use crate::constant;
use crate::constant::{DwAt, DwMacinfo, DwTag};
use crate::die::{AttributeValue, Die};
use crate::endian::Endian;
use crate::line::LineProgram;
use crate::macinfo::MacroTable;
use crate::pubnames::NameSet;
use crate::reloc::RelocationTable;
use crate::stabs::StabUnit;
use crate::unit::CompilationUnit;

/// An indenting sink for dump output.
pub trait Formatter {
    fn indent(&mut self);
    fn unindent(&mut self);
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()>;
}

/// A [`Formatter`] writing lines to any [`io::Write`] sink.
pub struct DefaultFormatter<'w> {
    w: &'w mut dyn io::Write,
    indent: usize,
    current_indent: usize,
}

impl<'w> DefaultFormatter<'w> {
    pub fn new(w: &'w mut dyn io::Write, indent: usize) -> DefaultFormatter<'w> {
        DefaultFormatter {
            w,
            indent,
            current_indent: 0,
        }
    }
}

impl Formatter for DefaultFormatter<'_> {
    fn indent(&mut self) {
        self.current_indent += self.indent;
    }

    fn unindent(&mut self) {
        self.current_indent = self.current_indent.saturating_sub(self.indent);
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        for _ in 0..self.current_indent {
            write!(self.w, " ")?;
        }
        self.w.write_fmt(args)?;
        writeln!(self.w)
    }
}

pub fn dump_abbrev_table<F: Formatter>(
    f: &mut F,
    offset: u64,
    table: &AbbrevTable,
) -> io::Result<()> {
    write!(f, "abbreviations at 0x{:x}", offset)?;
    f.indent();
    for abbrev in table.iter() {
        write!(
            f,
            "{} {}{}",
            abbrev.code,
            abbrev.tag,
            if abbrev.children { " children" } else { "" }
        )?;
        f.indent();
        for spec in &abbrev.attributes {
            write!(f, "{} form 0x{:x}", spec.at, spec.form.0)?;
        }
        f.unindent();
    }
    f.unindent();
    Ok(())
}

pub fn dump_unit<F: Formatter>(f: &mut F, unit: &CompilationUnit<'_>) -> io::Result<()> {
    let header = unit.header();
    write!(
        f,
        "compilation unit at 0x{:x}, version {}, address size {}, abbreviations at 0x{:x}",
        header.offset, header.version, header.address_size, header.abbrev_offset
    )?;
    f.indent();
    for &root in unit.roots() {
        dump_die(f, unit, root)?;
    }
    f.unindent();
    Ok(())
}

fn dump_die<F: Formatter>(f: &mut F, unit: &CompilationUnit<'_>, index: usize) -> io::Result<()> {
    let die = match unit.die(index) {
        Some(die) => die,
        None => return Ok(()),
    };
    die.display(f)?;
    f.indent();
    for &child in &die.children {
        dump_die(f, unit, child)?;
    }
    f.unindent();
    Ok(())
}

pub fn dump_line_program<E: Endian, F: Formatter>(
    f: &mut F,
    program: &LineProgram<'_, E>,
) -> io::Result<()> {
    write!(
        f,
        "line number program at 0x{:x}, version {}, line base {}, line range {}, opcode base {}",
        program.offset, program.version, program.line_base, program.line_range, program.opcode_base
    )?;
    f.indent();
    for (index, entry) in program.file_entries.iter().enumerate() {
        write!(
            f,
            "file {}: {}",
            index,
            String::from_utf8_lossy(&program.full_path(entry))
        )?;
    }
    match program.lines() {
        Ok(lines) => {
            for line in lines {
                write!(
                    f,
                    "[0x{:x}, 0x{:x}) {}:{}",
                    line.start_address,
                    line.end_address,
                    String::from_utf8_lossy(line.path),
                    line.line
                )?;
            }
        }
        Err(err) => write!(f, "error: {}", err)?,
    }
    f.unindent();
    Ok(())
}

pub fn dump_macro_table<F: Formatter>(f: &mut F, table: &MacroTable<'_>) -> io::Result<()> {
    write!(
        f,
        "macro table at 0x{:x}, version {}",
        table.offset, table.version
    )?;
    f.indent();
    for entry in table.entries() {
        match entry.text {
            Some(text) => write!(
                f,
                "{} file {} line {}: {}",
                entry.kind,
                entry.file,
                entry.line,
                String::from_utf8_lossy(text)
            )?,
            None => write!(f, "{} file {} line {}", entry.kind, entry.file, entry.line)?,
        }
    }
    for &offset in table.skipped_includes() {
        write!(f, "skipped cyclic include of 0x{:x}", offset)?;
    }
    f.unindent();
    Ok(())
}

pub fn dump_range_set<F: Formatter>(f: &mut F, set: &RangeSet) -> io::Result<()> {
    write!(
        f,
        "address ranges at 0x{:x} for unit at 0x{:x}",
        set.offset, set.info_offset
    )?;
    f.indent();
    for range in &set.ranges {
        write!(
            f,
            "[0x{:x}, 0x{:x})",
            range.address,
            range.address + range.length
        )?;
    }
    f.unindent();
    Ok(())
}

pub fn dump_name_set<F: Formatter>(f: &mut F, set: &NameSet<'_>) -> io::Result<()> {
    write!(
        f,
        "public names at 0x{:x} for unit at 0x{:x}",
        set.offset, set.info_offset
    )?;
    f.indent();
    for &(offset, name) in set.iter() {
        write!(f, "<0x{:x}> {}", offset, String::from_utf8_lossy(name))?;
    }
    f.unindent();
    Ok(())
}

pub fn dump_relocations<F: Formatter>(f: &mut F, table: &RelocationTable) -> io::Result<()> {
    write!(f, "relocations")?;
    f.indent();
    for (offset, addend) in table.abbrev_entries() {
        write!(f, "0x{:x} abbrev {:+}", offset, addend)?;
    }
    for (offset, addend) in table.other_entries() {
        write!(f, "0x{:x} other {:+}", offset, addend)?;
    }
    f.unindent();
    Ok(())
}

pub fn dump_stab_unit<F: Formatter>(f: &mut F, unit: &StabUnit) -> io::Result<()> {
    write!(
        f,
        "stab unit {}",
        String::from_utf8_lossy(&unit.source_path())
    )?;
    f.indent();
    if let Some(object) = &unit.object {
        write!(f, "object {}", String::from_utf8_lossy(object))?;
    }
    if let Some(command_line) = &unit.command_line {
        write!(f, "command line {}", String::from_utf8_lossy(command_line))?;
    }
    if let Some(line) = unit.main_line {
        write!(f, "main at line {}", line)?;
    }
    write!(f, "language {}", unit.language)?;
    f.unindent();
    Ok(())
}

impl<'data> Die<'data> {
    /// Write the entry and its attributes, without children.
    pub fn display<F: Formatter>(&self, f: &mut F) -> io::Result<()> {
        write!(f, "<0x{:x}> {}", self.offset, self.tag)?;
        f.indent();
        for attribute in &self.attributes {
            write!(f, "{}: {}", attribute.at, attribute.value)?;
        }
        f.unindent();
        Ok(())
    }
}

impl fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AttributeValue::Address(val) => write!(f, "(address) 0x{:x}", val),
            AttributeValue::Block(val) => write!(f, "(block) len {}", val.len()),
            AttributeValue::Data1(val) => write!(f, "(data1) 0x{:x}", val),
            AttributeValue::Data2(val) => write!(f, "(data2) 0x{:x}", val),
            AttributeValue::Data4(val) => write!(f, "(data4) 0x{:x}", val),
            AttributeValue::Data8(val) => write!(f, "(data8) 0x{:x}", val),
            AttributeValue::UData(val) => write!(f, "(udata) 0x{:x}", val),
            AttributeValue::SData(val) => write!(f, "(sdata) {}", val),
            AttributeValue::Flag(val) => write!(f, "(flag) {}", val),
            AttributeValue::String(val) => {
                write!(f, "(string) {}", String::from_utf8_lossy(val))
            }
            AttributeValue::StringOffset(val) => write!(f, "(strp) unresolved 0x{:x}", val),
            AttributeValue::Ref(val) => write!(f, "(ref) 0x{:x}", val),
            AttributeValue::RefAddress(val) => write!(f, "(ref_address) 0x{:x}", val),
            AttributeValue::RefSig(val) => write!(f, "(ref_sig) 0x{:x}", val),
            AttributeValue::SecOffset(val) => write!(f, "(sec_offset) 0x{:x}", val),
            AttributeValue::ExprLoc(val) => write!(f, "(expr_loc) len {}", val.len()),
        }
    }
}

impl fmt::Display for DwTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            constant::DW_TAG_array_type => write!(f, "array_type"),
            constant::DW_TAG_class_type => write!(f, "class_type"),
            constant::DW_TAG_entry_point => write!(f, "entry_point"),
            constant::DW_TAG_enumeration_type => write!(f, "enumeration_type"),
            constant::DW_TAG_formal_parameter => write!(f, "formal_parameter"),
            constant::DW_TAG_imported_declaration => write!(f, "imported_declaration"),
            constant::DW_TAG_label => write!(f, "label"),
            constant::DW_TAG_lexical_block => write!(f, "lexical_block"),
            constant::DW_TAG_member => write!(f, "member"),
            constant::DW_TAG_pointer_type => write!(f, "pointer_type"),
            constant::DW_TAG_reference_type => write!(f, "reference_type"),
            constant::DW_TAG_compile_unit => write!(f, "compile_unit"),
            constant::DW_TAG_string_type => write!(f, "string_type"),
            constant::DW_TAG_structure_type => write!(f, "structure_type"),
            constant::DW_TAG_subroutine_type => write!(f, "subroutine_type"),
            constant::DW_TAG_typedef => write!(f, "typedef"),
            constant::DW_TAG_union_type => write!(f, "union_type"),
            constant::DW_TAG_unspecified_parameters => write!(f, "unspecified_parameters"),
            constant::DW_TAG_variant => write!(f, "variant"),
            constant::DW_TAG_common_block => write!(f, "common_block"),
            constant::DW_TAG_common_inclusion => write!(f, "common_inclusion"),
            constant::DW_TAG_inheritance => write!(f, "inheritance"),
            constant::DW_TAG_inlined_subroutine => write!(f, "inlined_subroutine"),
            constant::DW_TAG_module => write!(f, "module"),
            constant::DW_TAG_ptr_to_member_type => write!(f, "ptr_to_member_type"),
            constant::DW_TAG_set_type => write!(f, "set_type"),
            constant::DW_TAG_subrange_type => write!(f, "subrange_type"),
            constant::DW_TAG_with_stmt => write!(f, "with_stmt"),
            constant::DW_TAG_access_declaration => write!(f, "access_declaration"),
            constant::DW_TAG_base_type => write!(f, "base_type"),
            constant::DW_TAG_catch_block => write!(f, "catch_block"),
            constant::DW_TAG_const_type => write!(f, "const_type"),
            constant::DW_TAG_constant => write!(f, "constant"),
            constant::DW_TAG_enumerator => write!(f, "enumerator"),
            constant::DW_TAG_file_type => write!(f, "file_type"),
            constant::DW_TAG_friend => write!(f, "friend"),
            constant::DW_TAG_namelist => write!(f, "namelist"),
            constant::DW_TAG_namelist_item => write!(f, "namelist_item"),
            constant::DW_TAG_packed_type => write!(f, "packed_type"),
            constant::DW_TAG_subprogram => write!(f, "subprogram"),
            constant::DW_TAG_template_type_parameter => write!(f, "template_type_parameter"),
            constant::DW_TAG_template_value_parameter => write!(f, "template_value_parameter"),
            constant::DW_TAG_thrown_type => write!(f, "thrown_type"),
            constant::DW_TAG_try_block => write!(f, "try_block"),
            constant::DW_TAG_variant_part => write!(f, "variant_part"),
            constant::DW_TAG_variable => write!(f, "variable"),
            constant::DW_TAG_volatile_type => write!(f, "volatile_type"),
            constant::DW_TAG_dwarf_procedure => write!(f, "dwarf_procedure"),
            constant::DW_TAG_restrict_type => write!(f, "restrict_type"),
            constant::DW_TAG_interface_type => write!(f, "interface_type"),
            constant::DW_TAG_namespace => write!(f, "namespace"),
            constant::DW_TAG_imported_module => write!(f, "imported_module"),
            constant::DW_TAG_unspecified_type => write!(f, "unspecified_type"),
            constant::DW_TAG_partial_unit => write!(f, "partial_unit"),
            constant::DW_TAG_imported_unit => write!(f, "imported_unit"),
            constant::DW_TAG_condition => write!(f, "condition"),
            constant::DW_TAG_shared_type => write!(f, "shared_type"),
            constant::DW_TAG_type_unit => write!(f, "type_unit"),
            constant::DW_TAG_rvalue_reference_type => write!(f, "rvalue_reference_type"),
            constant::DW_TAG_template_alias => write!(f, "template_alias"),
            _ => write!(f, "tag 0x{:x}", self.0),
        }
    }
}

impl fmt::Display for DwAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            constant::DW_AT_sibling => write!(f, "sibling"),
            constant::DW_AT_location => write!(f, "location"),
            constant::DW_AT_name => write!(f, "name"),
            constant::DW_AT_ordering => write!(f, "ordering"),
            constant::DW_AT_byte_size => write!(f, "byte_size"),
            constant::DW_AT_bit_offset => write!(f, "bit_offset"),
            constant::DW_AT_bit_size => write!(f, "bit_size"),
            constant::DW_AT_stmt_list => write!(f, "stmt_list"),
            constant::DW_AT_low_pc => write!(f, "low_pc"),
            constant::DW_AT_high_pc => write!(f, "high_pc"),
            constant::DW_AT_language => write!(f, "language"),
            constant::DW_AT_visibility => write!(f, "visibility"),
            constant::DW_AT_import => write!(f, "import"),
            constant::DW_AT_string_length => write!(f, "string_length"),
            constant::DW_AT_common_reference => write!(f, "common_reference"),
            constant::DW_AT_comp_dir => write!(f, "comp_dir"),
            constant::DW_AT_const_value => write!(f, "const_value"),
            constant::DW_AT_containing_type => write!(f, "containing_type"),
            constant::DW_AT_default_value => write!(f, "default_value"),
            constant::DW_AT_inline => write!(f, "inline"),
            constant::DW_AT_lower_bound => write!(f, "lower_bound"),
            constant::DW_AT_producer => write!(f, "producer"),
            constant::DW_AT_prototyped => write!(f, "prototyped"),
            constant::DW_AT_return_addr => write!(f, "return_addr"),
            constant::DW_AT_start_scope => write!(f, "start_scope"),
            constant::DW_AT_upper_bound => write!(f, "upper_bound"),
            constant::DW_AT_abstract_origin => write!(f, "abstract_origin"),
            constant::DW_AT_accessibility => write!(f, "accessibility"),
            constant::DW_AT_artificial => write!(f, "artificial"),
            constant::DW_AT_calling_convention => write!(f, "calling_convention"),
            constant::DW_AT_count => write!(f, "count"),
            constant::DW_AT_data_member_location => write!(f, "data_member_location"),
            constant::DW_AT_decl_column => write!(f, "decl_column"),
            constant::DW_AT_decl_file => write!(f, "decl_file"),
            constant::DW_AT_decl_line => write!(f, "decl_line"),
            constant::DW_AT_declaration => write!(f, "declaration"),
            constant::DW_AT_encoding => write!(f, "encoding"),
            constant::DW_AT_external => write!(f, "external"),
            constant::DW_AT_frame_base => write!(f, "frame_base"),
            constant::DW_AT_macro_info => write!(f, "macro_info"),
            constant::DW_AT_specification => write!(f, "specification"),
            constant::DW_AT_static_link => write!(f, "static_link"),
            constant::DW_AT_type => write!(f, "type"),
            constant::DW_AT_virtuality => write!(f, "virtuality"),
            constant::DW_AT_vtable_elem_location => write!(f, "vtable_elem_location"),
            constant::DW_AT_entry_pc => write!(f, "entry_pc"),
            constant::DW_AT_use_UTF8 => write!(f, "use_UTF8"),
            constant::DW_AT_ranges => write!(f, "ranges"),
            constant::DW_AT_call_column => write!(f, "call_column"),
            constant::DW_AT_call_file => write!(f, "call_file"),
            constant::DW_AT_call_line => write!(f, "call_line"),
            constant::DW_AT_object_pointer => write!(f, "object_pointer"),
            constant::DW_AT_signature => write!(f, "signature"),
            constant::DW_AT_main_subprogram => write!(f, "main_subprogram"),
            constant::DW_AT_const_expr => write!(f, "const_expr"),
            constant::DW_AT_enum_class => write!(f, "enum_class"),
            constant::DW_AT_linkage_name => write!(f, "linkage_name"),
            constant::DW_AT_GNU_macros => write!(f, "GNU_macros"),
            _ => write!(f, "at 0x{:x}", self.0),
        }
    }
}

impl fmt::Display for DwMacinfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            constant::DW_MACINFO_define => write!(f, "define"),
            constant::DW_MACINFO_undef => write!(f, "undef"),
            constant::DW_MACINFO_start_file => write!(f, "start_file"),
            constant::DW_MACINFO_end_file => write!(f, "end_file"),
            constant::DW_MACINFO_vendor_ext => write!(f, "vendor_ext"),
            _ => write!(f, "macinfo 0x{:x}", self.0),
        }
    }
}
