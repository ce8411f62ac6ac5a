//! Constants from the DWARF specifications and the STABS a.out format.

#![allow(non_upper_case_globals)]
#![allow(missing_docs)]

/// The tag encoding for a debugging information entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwTag(pub u16);

pub const DW_TAG_null: DwTag = DwTag(0x00);
pub const DW_TAG_array_type: DwTag = DwTag(0x01);
pub const DW_TAG_class_type: DwTag = DwTag(0x02);
pub const DW_TAG_entry_point: DwTag = DwTag(0x03);
pub const DW_TAG_enumeration_type: DwTag = DwTag(0x04);
pub const DW_TAG_formal_parameter: DwTag = DwTag(0x05);
pub const DW_TAG_imported_declaration: DwTag = DwTag(0x08);
pub const DW_TAG_label: DwTag = DwTag(0x0a);
pub const DW_TAG_lexical_block: DwTag = DwTag(0x0b);
pub const DW_TAG_member: DwTag = DwTag(0x0d);
pub const DW_TAG_pointer_type: DwTag = DwTag(0x0f);
pub const DW_TAG_reference_type: DwTag = DwTag(0x10);
pub const DW_TAG_compile_unit: DwTag = DwTag(0x11);
pub const DW_TAG_string_type: DwTag = DwTag(0x12);
pub const DW_TAG_structure_type: DwTag = DwTag(0x13);
pub const DW_TAG_subroutine_type: DwTag = DwTag(0x15);
pub const DW_TAG_typedef: DwTag = DwTag(0x16);
pub const DW_TAG_union_type: DwTag = DwTag(0x17);
pub const DW_TAG_unspecified_parameters: DwTag = DwTag(0x18);
pub const DW_TAG_variant: DwTag = DwTag(0x19);
pub const DW_TAG_common_block: DwTag = DwTag(0x1a);
pub const DW_TAG_common_inclusion: DwTag = DwTag(0x1b);
pub const DW_TAG_inheritance: DwTag = DwTag(0x1c);
pub const DW_TAG_inlined_subroutine: DwTag = DwTag(0x1d);
pub const DW_TAG_module: DwTag = DwTag(0x1e);
pub const DW_TAG_ptr_to_member_type: DwTag = DwTag(0x1f);
pub const DW_TAG_set_type: DwTag = DwTag(0x20);
pub const DW_TAG_subrange_type: DwTag = DwTag(0x21);
pub const DW_TAG_with_stmt: DwTag = DwTag(0x22);
pub const DW_TAG_access_declaration: DwTag = DwTag(0x23);
pub const DW_TAG_base_type: DwTag = DwTag(0x24);
pub const DW_TAG_catch_block: DwTag = DwTag(0x25);
pub const DW_TAG_const_type: DwTag = DwTag(0x26);
pub const DW_TAG_constant: DwTag = DwTag(0x27);
pub const DW_TAG_enumerator: DwTag = DwTag(0x28);
pub const DW_TAG_file_type: DwTag = DwTag(0x29);
pub const DW_TAG_friend: DwTag = DwTag(0x2a);
pub const DW_TAG_namelist: DwTag = DwTag(0x2b);
pub const DW_TAG_namelist_item: DwTag = DwTag(0x2c);
pub const DW_TAG_packed_type: DwTag = DwTag(0x2d);
pub const DW_TAG_subprogram: DwTag = DwTag(0x2e);
pub const DW_TAG_template_type_parameter: DwTag = DwTag(0x2f);
pub const DW_TAG_template_value_parameter: DwTag = DwTag(0x30);
pub const DW_TAG_thrown_type: DwTag = DwTag(0x31);
pub const DW_TAG_try_block: DwTag = DwTag(0x32);
pub const DW_TAG_variant_part: DwTag = DwTag(0x33);
pub const DW_TAG_variable: DwTag = DwTag(0x34);
pub const DW_TAG_volatile_type: DwTag = DwTag(0x35);
pub const DW_TAG_dwarf_procedure: DwTag = DwTag(0x36);
pub const DW_TAG_restrict_type: DwTag = DwTag(0x37);
pub const DW_TAG_interface_type: DwTag = DwTag(0x38);
pub const DW_TAG_namespace: DwTag = DwTag(0x39);
pub const DW_TAG_imported_module: DwTag = DwTag(0x3a);
pub const DW_TAG_unspecified_type: DwTag = DwTag(0x3b);
pub const DW_TAG_partial_unit: DwTag = DwTag(0x3c);
pub const DW_TAG_imported_unit: DwTag = DwTag(0x3d);
pub const DW_TAG_condition: DwTag = DwTag(0x3f);
pub const DW_TAG_shared_type: DwTag = DwTag(0x40);
pub const DW_TAG_type_unit: DwTag = DwTag(0x41);
pub const DW_TAG_rvalue_reference_type: DwTag = DwTag(0x42);
pub const DW_TAG_template_alias: DwTag = DwTag(0x43);
pub const DW_TAG_lo_user: DwTag = DwTag(0x4080);
pub const DW_TAG_hi_user: DwTag = DwTag(0xffff);

/// The child determination byte in an abbreviation declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwChildren(pub u8);

pub const DW_CHILDREN_no: DwChildren = DwChildren(0x00);
pub const DW_CHILDREN_yes: DwChildren = DwChildren(0x01);

/// The attribute name encoding for a debugging information entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwAt(pub u16);

pub const DW_AT_sibling: DwAt = DwAt(0x01);
pub const DW_AT_location: DwAt = DwAt(0x02);
pub const DW_AT_name: DwAt = DwAt(0x03);
pub const DW_AT_ordering: DwAt = DwAt(0x09);
pub const DW_AT_byte_size: DwAt = DwAt(0x0b);
pub const DW_AT_bit_offset: DwAt = DwAt(0x0c);
pub const DW_AT_bit_size: DwAt = DwAt(0x0d);
pub const DW_AT_stmt_list: DwAt = DwAt(0x10);
pub const DW_AT_low_pc: DwAt = DwAt(0x11);
pub const DW_AT_high_pc: DwAt = DwAt(0x12);
pub const DW_AT_language: DwAt = DwAt(0x13);
pub const DW_AT_discr: DwAt = DwAt(0x15);
pub const DW_AT_discr_value: DwAt = DwAt(0x16);
pub const DW_AT_visibility: DwAt = DwAt(0x17);
pub const DW_AT_import: DwAt = DwAt(0x18);
pub const DW_AT_string_length: DwAt = DwAt(0x19);
pub const DW_AT_common_reference: DwAt = DwAt(0x1a);
pub const DW_AT_comp_dir: DwAt = DwAt(0x1b);
pub const DW_AT_const_value: DwAt = DwAt(0x1c);
pub const DW_AT_containing_type: DwAt = DwAt(0x1d);
pub const DW_AT_default_value: DwAt = DwAt(0x1e);
pub const DW_AT_inline: DwAt = DwAt(0x20);
pub const DW_AT_is_optional: DwAt = DwAt(0x21);
pub const DW_AT_lower_bound: DwAt = DwAt(0x22);
pub const DW_AT_producer: DwAt = DwAt(0x25);
pub const DW_AT_prototyped: DwAt = DwAt(0x27);
pub const DW_AT_return_addr: DwAt = DwAt(0x2a);
pub const DW_AT_start_scope: DwAt = DwAt(0x2c);
pub const DW_AT_bit_stride: DwAt = DwAt(0x2e);
pub const DW_AT_upper_bound: DwAt = DwAt(0x2f);
pub const DW_AT_abstract_origin: DwAt = DwAt(0x31);
pub const DW_AT_accessibility: DwAt = DwAt(0x32);
pub const DW_AT_address_class: DwAt = DwAt(0x33);
pub const DW_AT_artificial: DwAt = DwAt(0x34);
pub const DW_AT_base_types: DwAt = DwAt(0x35);
pub const DW_AT_calling_convention: DwAt = DwAt(0x36);
pub const DW_AT_count: DwAt = DwAt(0x37);
pub const DW_AT_data_member_location: DwAt = DwAt(0x38);
pub const DW_AT_decl_column: DwAt = DwAt(0x39);
pub const DW_AT_decl_file: DwAt = DwAt(0x3a);
pub const DW_AT_decl_line: DwAt = DwAt(0x3b);
pub const DW_AT_declaration: DwAt = DwAt(0x3c);
pub const DW_AT_discr_list: DwAt = DwAt(0x3d);
pub const DW_AT_encoding: DwAt = DwAt(0x3e);
pub const DW_AT_external: DwAt = DwAt(0x3f);
pub const DW_AT_frame_base: DwAt = DwAt(0x40);
pub const DW_AT_friend: DwAt = DwAt(0x41);
pub const DW_AT_identifier_case: DwAt = DwAt(0x42);
pub const DW_AT_macro_info: DwAt = DwAt(0x43);
pub const DW_AT_namelist_item: DwAt = DwAt(0x44);
pub const DW_AT_priority: DwAt = DwAt(0x45);
pub const DW_AT_segment: DwAt = DwAt(0x46);
pub const DW_AT_specification: DwAt = DwAt(0x47);
pub const DW_AT_static_link: DwAt = DwAt(0x48);
pub const DW_AT_type: DwAt = DwAt(0x49);
pub const DW_AT_use_location: DwAt = DwAt(0x4a);
pub const DW_AT_variable_parameter: DwAt = DwAt(0x4b);
pub const DW_AT_virtuality: DwAt = DwAt(0x4c);
pub const DW_AT_vtable_elem_location: DwAt = DwAt(0x4d);
pub const DW_AT_allocated: DwAt = DwAt(0x4e);
pub const DW_AT_associated: DwAt = DwAt(0x4f);
pub const DW_AT_data_location: DwAt = DwAt(0x50);
pub const DW_AT_byte_stride: DwAt = DwAt(0x51);
pub const DW_AT_entry_pc: DwAt = DwAt(0x52);
pub const DW_AT_use_UTF8: DwAt = DwAt(0x53);
pub const DW_AT_extension: DwAt = DwAt(0x54);
pub const DW_AT_ranges: DwAt = DwAt(0x55);
pub const DW_AT_trampoline: DwAt = DwAt(0x56);
pub const DW_AT_call_column: DwAt = DwAt(0x57);
pub const DW_AT_call_file: DwAt = DwAt(0x58);
pub const DW_AT_call_line: DwAt = DwAt(0x59);
pub const DW_AT_description: DwAt = DwAt(0x5a);
pub const DW_AT_binary_scale: DwAt = DwAt(0x5b);
pub const DW_AT_decimal_scale: DwAt = DwAt(0x5c);
pub const DW_AT_small: DwAt = DwAt(0x5d);
pub const DW_AT_decimal_sign: DwAt = DwAt(0x5e);
pub const DW_AT_digit_count: DwAt = DwAt(0x5f);
pub const DW_AT_picture_string: DwAt = DwAt(0x60);
pub const DW_AT_mutable: DwAt = DwAt(0x61);
pub const DW_AT_threads_scaled: DwAt = DwAt(0x62);
pub const DW_AT_explicit: DwAt = DwAt(0x63);
pub const DW_AT_object_pointer: DwAt = DwAt(0x64);
pub const DW_AT_endianity: DwAt = DwAt(0x65);
pub const DW_AT_elemental: DwAt = DwAt(0x66);
pub const DW_AT_pure: DwAt = DwAt(0x67);
pub const DW_AT_recursive: DwAt = DwAt(0x68);
pub const DW_AT_signature: DwAt = DwAt(0x69);
pub const DW_AT_main_subprogram: DwAt = DwAt(0x6a);
pub const DW_AT_data_bit_offset: DwAt = DwAt(0x6b);
pub const DW_AT_const_expr: DwAt = DwAt(0x6c);
pub const DW_AT_enum_class: DwAt = DwAt(0x6d);
pub const DW_AT_linkage_name: DwAt = DwAt(0x6e);
pub const DW_AT_lo_user: DwAt = DwAt(0x2000);
pub const DW_AT_GNU_macros: DwAt = DwAt(0x2119);
pub const DW_AT_hi_user: DwAt = DwAt(0x3fff);

/// The form encoding for an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwForm(pub u16);

pub const DW_FORM_addr: DwForm = DwForm(0x01);
pub const DW_FORM_block2: DwForm = DwForm(0x03);
pub const DW_FORM_block4: DwForm = DwForm(0x04);
pub const DW_FORM_data2: DwForm = DwForm(0x05);
pub const DW_FORM_data4: DwForm = DwForm(0x06);
pub const DW_FORM_data8: DwForm = DwForm(0x07);
pub const DW_FORM_string: DwForm = DwForm(0x08);
pub const DW_FORM_block1: DwForm = DwForm(0x0a);
pub const DW_FORM_block: DwForm = DwForm(0x09);
pub const DW_FORM_data1: DwForm = DwForm(0x0b);
pub const DW_FORM_flag: DwForm = DwForm(0x0c);
pub const DW_FORM_sdata: DwForm = DwForm(0x0d);
pub const DW_FORM_strp: DwForm = DwForm(0x0e);
pub const DW_FORM_udata: DwForm = DwForm(0x0f);
pub const DW_FORM_ref_addr: DwForm = DwForm(0x10);
pub const DW_FORM_ref1: DwForm = DwForm(0x11);
pub const DW_FORM_ref2: DwForm = DwForm(0x12);
pub const DW_FORM_ref4: DwForm = DwForm(0x13);
pub const DW_FORM_ref8: DwForm = DwForm(0x14);
pub const DW_FORM_ref_udata: DwForm = DwForm(0x15);
pub const DW_FORM_indirect: DwForm = DwForm(0x16);
pub const DW_FORM_sec_offset: DwForm = DwForm(0x17);
pub const DW_FORM_exprloc: DwForm = DwForm(0x18);
pub const DW_FORM_flag_present: DwForm = DwForm(0x19);
pub const DW_FORM_ref_sig8: DwForm = DwForm(0x20);

/// A standard opcode in a line number program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwLns(pub u8);

pub const DW_LNS_extended: DwLns = DwLns(0x00);
pub const DW_LNS_copy: DwLns = DwLns(0x01);
pub const DW_LNS_advance_pc: DwLns = DwLns(0x02);
pub const DW_LNS_advance_line: DwLns = DwLns(0x03);
pub const DW_LNS_set_file: DwLns = DwLns(0x04);
pub const DW_LNS_set_column: DwLns = DwLns(0x05);
pub const DW_LNS_negate_stmt: DwLns = DwLns(0x06);
pub const DW_LNS_set_basic_block: DwLns = DwLns(0x07);
pub const DW_LNS_const_add_pc: DwLns = DwLns(0x08);
pub const DW_LNS_fixed_advance_pc: DwLns = DwLns(0x09);
pub const DW_LNS_set_prologue_end: DwLns = DwLns(0x0a);
pub const DW_LNS_set_epilogue_begin: DwLns = DwLns(0x0b);
pub const DW_LNS_set_isa: DwLns = DwLns(0x0c);

/// An extended opcode in a line number program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwLne(pub u8);

pub const DW_LNE_end_sequence: DwLne = DwLne(0x01);
pub const DW_LNE_set_address: DwLne = DwLne(0x02);
pub const DW_LNE_define_file: DwLne = DwLne(0x03);
pub const DW_LNE_set_discriminator: DwLne = DwLne(0x04);
pub const DW_LNE_lo_user: DwLne = DwLne(0x80);
pub const DW_LNE_hi_user: DwLne = DwLne(0xff);

/// An entry type in a macro information table.
///
/// The values cover both the `.debug_macinfo` encoding and the
/// GNU `.debug_macro` extension, which reuses the low type values
/// and adds indirect and include entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwMacinfo(pub u8);

pub const DW_MACINFO_define: DwMacinfo = DwMacinfo(0x01);
pub const DW_MACINFO_undef: DwMacinfo = DwMacinfo(0x02);
pub const DW_MACINFO_start_file: DwMacinfo = DwMacinfo(0x03);
pub const DW_MACINFO_end_file: DwMacinfo = DwMacinfo(0x04);
pub const DW_MACINFO_define_indirect: DwMacinfo = DwMacinfo(0x05);
pub const DW_MACINFO_undef_indirect: DwMacinfo = DwMacinfo(0x06);
pub const DW_MACINFO_transparent_include: DwMacinfo = DwMacinfo(0x07);
pub const DW_MACINFO_vendor_ext: DwMacinfo = DwMacinfo(0xff);

/// A stab type from the a.out symbol table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StabType(pub u8);

pub const N_UNDF: StabType = StabType(0x00);
pub const N_MAIN: StabType = StabType(0x2a);
pub const N_CMDLINE: StabType = StabType(0x34);
pub const N_OBJ: StabType = StabType(0x38);
pub const N_SO: StabType = StabType(0x64);
pub const N_SOL: StabType = StabType(0x84);
