//! End to end tests over hand assembled ELF object images.

use debugread::display::{self, DefaultFormatter};
use debugread::{constant, FallibleIterator, SectionKind, SourceLocation};

fn push_u16(buf: &mut Vec<u8>, val: u16) {
    buf.extend_from_slice(&val.to_le_bytes());
}

fn push_u32(buf: &mut Vec<u8>, val: u32) {
    buf.extend_from_slice(&val.to_le_bytes());
}

fn push_u64(buf: &mut Vec<u8>, val: u64) {
    buf.extend_from_slice(&val.to_le_bytes());
}

fn push_shdr(buf: &mut Vec<u8>, name: u32, sh_type: u32, offset: u64, size: u64, entsize: u64) {
    push_u32(buf, name);
    push_u32(buf, sh_type);
    push_u64(buf, 0); // flags
    push_u64(buf, 0); // addr
    push_u64(buf, offset);
    push_u64(buf, size);
    push_u32(buf, 0); // link
    push_u32(buf, 0); // info
    push_u64(buf, 1); // addralign
    push_u64(buf, entsize);
}

/// Assemble a little endian ELF64 relocatable image from section
/// bodies. Section header indices start at 1, in argument order, with
/// `.shstrtab` last.
fn build_elf(sections: &[(&str, Vec<u8>, u64)]) -> Vec<u8> {
    let mut data = vec![0u8; 64];

    let mut locations = Vec::new();
    for (_, body, _) in sections {
        locations.push((data.len() as u64, body.len() as u64));
        data.extend_from_slice(body);
    }

    let mut shstrtab = vec![0u8];
    let mut name_offsets = Vec::new();
    for (name, _, _) in sections {
        name_offsets.push(shstrtab.len() as u32);
        shstrtab.extend_from_slice(name.as_bytes());
        shstrtab.push(0);
    }
    let shstrtab_name = shstrtab.len() as u32;
    shstrtab.extend_from_slice(b".shstrtab\0");
    let shstrtab_offset = data.len() as u64;
    let shstrtab_size = shstrtab.len() as u64;
    data.extend_from_slice(&shstrtab);

    while data.len() % 8 != 0 {
        data.push(0);
    }
    let shoff = data.len() as u64;

    data.extend_from_slice(&[0u8; 64]); // null section header
    for (i, (_, _, entsize)) in sections.iter().enumerate() {
        let (offset, size) = locations[i];
        push_shdr(&mut data, name_offsets[i], 1, offset, size, *entsize);
    }
    push_shdr(&mut data, shstrtab_name, 3, shstrtab_offset, shstrtab_size, 0);

    let shnum = sections.len() as u16 + 2;
    let shstrndx = shnum - 1;

    data[0..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
    data[4] = 2; // ELFCLASS64
    data[5] = 1; // little endian
    data[6] = 1; // EV_CURRENT
    data[16..18].copy_from_slice(&1u16.to_le_bytes()); // ET_REL
    data[18..20].copy_from_slice(&62u16.to_le_bytes()); // EM_X86_64
    data[20..24].copy_from_slice(&1u32.to_le_bytes());
    data[40..48].copy_from_slice(&shoff.to_le_bytes());
    data[52..54].copy_from_slice(&64u16.to_le_bytes()); // ehsize
    data[58..60].copy_from_slice(&64u16.to_le_bytes()); // shentsize
    data[60..62].copy_from_slice(&shnum.to_le_bytes());
    data[62..64].copy_from_slice(&shstrndx.to_le_bytes());
    data
}

fn push_sym64(buf: &mut Vec<u8>, info: u8, shndx: u16) {
    push_u32(buf, 0);
    buf.push(info);
    buf.push(0);
    push_u16(buf, shndx);
    push_u64(buf, 0);
    push_u64(buf, 0);
}

fn push_rela64(buf: &mut Vec<u8>, offset: u64, symbol: u64, addend: u64) {
    push_u64(buf, offset);
    push_u64(buf, (symbol << 32) | 1);
    push_u64(buf, addend);
}

/// An object with two compilation units. The first unit's
/// abbreviation offset field holds zero and a relocation against
/// `.debug_abbrev` supplies the real offset of 8; the second unit
/// uses the table at zero directly.
fn dwarf_object() -> Vec<u8> {
    let debug_abbrev = vec![
        // table at 0
        1, 0x11, 0, // compile_unit, no children
        0x03, 0x08, // name, string
        0, 0, //
        0, //
        // table at 8
        1, 0x11, 1, // compile_unit, children
        0x03, 0x0e, // name, strp
        0x10, 0x06, // stmt_list, data4
        0x43, 0x06, // macro_info, data4
        0, 0, //
        2, 0x2e, 0, // subprogram, no children
        0x03, 0x08, // name, string
        0, 0, //
        0,
    ];

    let debug_info = vec![
        // unit at 0
        27, 0, 0, 0, // unit length
        4, 0, // version
        0, 0, 0, 0, // abbrev offset, relocated to 8
        8, // address size
        1, // compile unit, at offset 11
        0, 0, 0, 0, // name strp -> "main.c"
        0, 0, 0, 0, // stmt_list
        0, 0, 0, 0, // macro_info
        2, // subprogram, at offset 24
        b'm', b'a', b'i', b'n', 0, //
        0, // end of children
        // unit at 31
        16, 0, 0, 0, // unit length
        4, 0, // version
        0, 0, 0, 0, // abbrev offset
        8, // address size
        1, // compile unit
        b'o', b't', b'h', b'e', b'r', b'.', b'c', 0,
    ];

    let debug_str = b"main.c\0other.c\0".to_vec();

    let mut debug_line = vec![
        54, 0, 0, 0, // unit length
        2, 0, // version
        29, 0, 0, 0, // header length
        1, // minimum instruction length
        1, // default is_stmt
        0xfb, // line base -5
        14, // line range
        13, // opcode base
        0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1, // standard opcode lengths
        0, // end of include directories
        b'm', b'a', b'i', b'n', b'.', b'c', 0, 0, 0, 0, // file 0
        0, // end of file entries
        // program
        0, 9, 2, // set_address
    ];
    push_u64(&mut debug_line, 0x1000);
    debug_line.extend_from_slice(&[
        3, 4, // advance_line +4
        1, // copy
        2, 2, // advance_pc 2
        0, 1, 1, // end_sequence
    ]);

    let debug_macinfo = vec![
        3, 0, 1, // start_file, line 0, file 1
        1, 1, b'V', b'E', b'R', b'S', b'I', b'O', b'N', b' ', b'1', 0, // define
        4, // end_file
        0,
    ];

    let mut debug_aranges = vec![
        44, 0, 0, 0, // length
        2, 0, // version
        0, 0, 0, 0, // info offset
        8, // address size
        0, // segment size
        0, 0, 0, 0, // padding to the 16 byte tuple boundary
    ];
    push_u64(&mut debug_aranges, 0x1000);
    push_u64(&mut debug_aranges, 0x100);
    push_u64(&mut debug_aranges, 0);
    push_u64(&mut debug_aranges, 0);

    let debug_pubnames = vec![
        23, 0, 0, 0, // length
        2, 0, // version
        0, 0, 0, 0, // info offset
        31, 0, 0, 0, // info length
        24, 0, 0, 0, b'm', b'a', b'i', b'n', 0, // the subprogram entry
        0, 0, 0, 0, // terminator
    ];

    let mut symtab = Vec::new();
    push_sym64(&mut symtab, 0, 0); // null symbol
    push_sym64(&mut symtab, 3, 1); // section symbol for .debug_abbrev
    push_sym64(&mut symtab, 3, 4); // section symbol for .debug_str

    let mut rela = Vec::new();
    push_rela64(&mut rela, 6, 1, 8); // unit 0 abbrev offset
    push_rela64(&mut rela, 12, 2, 0); // unit 0 name strp

    build_elf(&[
        (".debug_abbrev", debug_abbrev, 0),
        (".debug_info", debug_info, 0),
        (".debug_line", debug_line, 0),
        (".debug_str", debug_str, 0),
        (".debug_macinfo", debug_macinfo, 0),
        (".debug_aranges", debug_aranges, 0),
        (".debug_pubnames", debug_pubnames, 0),
        (".symtab", symtab, 24),
        (".rela.debug_info", rela, 24),
    ])
}

#[test]
fn dwarf_units() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    assert!(file.has_dwarf());
    assert!(!file.has_stabs());

    let mut dwarf = file.dwarf();
    let units = dwarf.compilation_units().unwrap();
    assert_eq!(units.len(), 2);

    assert_eq!(units[0].offset(), 0);
    assert_eq!(units[0].name(), Some(&b"main.c"[..]));
    assert_eq!(units[0].stmt_list(), Some(0));
    assert_eq!(units[1].offset(), units[0].next_offset());
    assert_eq!(units[1].name(), Some(&b"other.c"[..]));

    let root = units[0].root().unwrap();
    assert_eq!(root.tag, constant::DW_TAG_compile_unit);
    assert_eq!(root.children.len(), 1);
    let sub = units[0].die(root.children[0]).unwrap();
    assert_eq!(sub.tag, constant::DW_TAG_subprogram);
    assert_eq!(sub.offset, 24);
    assert_eq!(sub.attr_string(constant::DW_AT_name), Some(&b"main"[..]));

    // Both headers store a zero abbreviation offset; the relocation
    // resolves the first unit's table to 8.
    assert_eq!(units[0].abbrev_offset(), 8);
    assert_eq!(units[1].abbrev_offset(), 0);
}

#[test]
fn dwarf_unit_iterator() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();
    let mut iter = dwarf.units();
    let first = iter.next().unwrap().unwrap();
    assert_eq!(iter.offset(), first.next_offset());
    let second = iter.next().unwrap().unwrap();
    assert_eq!(second.offset(), 31);
    assert!(iter.next().unwrap().is_none());
}

#[test]
fn dwarf_relocations() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();
    let reloc = dwarf.relocations().unwrap().unwrap();
    assert_eq!(reloc.abbrev_addend(6), Some(8));
    assert_eq!(reloc.abbrev_addend(12), None);
    assert_eq!(reloc.addend(12), Some(0));
}

#[test]
fn dwarf_address_queries() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();

    let unit = dwarf.unit_for_address(0x1080).unwrap().unwrap();
    assert_eq!(unit.offset(), 0);
    assert!(dwarf.unit_for_address(0x2000).unwrap().is_none());

    assert_eq!(
        dwarf.source_for_address(0x1001).unwrap(),
        Some(SourceLocation {
            path: b"main.c".to_vec(),
            line: 5,
        })
    );
    assert_eq!(dwarf.source_for_address(0x5000).unwrap(), None);
    assert_eq!(dwarf.source_for_address(0).unwrap(), None);
}

#[test]
fn dwarf_line_program() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();
    let program = dwarf.line_program(0).unwrap();
    let lines = program.lines().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].path, b"main.c");
    assert_eq!(lines[0].line, 5);
    assert_eq!(lines[0].start_address, 0x1000);
    assert_eq!(lines[0].end_address, 0x1002);
}

#[test]
fn dwarf_macros() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();
    let units = dwarf.compilation_units().unwrap();
    let (kind, offset) = units[0].macro_offset().unwrap();
    assert_eq!(kind, SectionKind::DebugMacinfo);

    let table = dwarf.macro_table(kind, offset).unwrap();
    assert_eq!(table.base_file(), Some(0));
    let defines: Vec<_> = table.defines_in(0).collect();
    assert_eq!(defines.len(), 1);
    assert_eq!(defines[0].kind, constant::DW_MACINFO_define);
    assert_eq!(defines[0].line, 1);
    assert_eq!(defines[0].text, Some(&b"VERSION 1"[..]));

    assert_eq!(dwarf.macro_base_file(kind, offset).unwrap(), Some(0));
}

#[test]
fn dwarf_pubnames() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();
    assert_eq!(dwarf.public_name(24).unwrap(), Some(&b"main"[..]));
    assert_eq!(dwarf.public_name(11).unwrap(), None);
}

#[test]
fn dwarf_dump() {
    let file = debugread::elf::load_bytes(dwarf_object()).unwrap();
    let mut dwarf = file.dwarf();
    let units = dwarf.compilation_units().unwrap();

    let mut buf = Vec::new();
    let mut f = DefaultFormatter::new(&mut buf, 2);
    for unit in units.iter() {
        display::dump_unit(&mut f, unit).unwrap();
    }
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("compile_unit"));
    assert!(text.contains("(string) main"));
    assert!(text.contains("(string) other.c"));
}

fn stab_record(strx: u32, kind: u8, desc: u16, value: u32) -> [u8; 12] {
    let mut buf = [0; 12];
    buf[..4].copy_from_slice(&strx.to_le_bytes());
    buf[4] = kind;
    buf[6..8].copy_from_slice(&desc.to_le_bytes());
    buf[8..].copy_from_slice(&value.to_le_bytes());
    buf
}

/// An object whose only debugging information is STABS records. The
/// recorded source is the preprocessor intermediate `/src/foo.y`; the
/// undefined record's hint and the command line recover `foo.c`.
fn stabs_object() -> Vec<u8> {
    let mut stabstr = vec![0u8];
    let hint = stabstr.len() as u32;
    stabstr.extend_from_slice(b"foo.c\0");
    let dir = stabstr.len() as u32;
    stabstr.extend_from_slice(b"/src/\0");
    let source = stabstr.len() as u32;
    stabstr.extend_from_slice(b"/src/foo.y\0");
    let cmd = stabstr.len() as u32;
    stabstr.extend_from_slice(b"rm -f foo.y ; gcc foo.c\0");
    let obj = stabstr.len() as u32;
    stabstr.extend_from_slice(b"x.o\0");
    let strtab_size = stabstr.len() as u32;

    let mut stab = Vec::new();
    stab.extend_from_slice(&stab_record(hint, 0x00, 0, strtab_size)); // N_UNDF
    stab.extend_from_slice(&stab_record(dir, 0x64, 0, 0)); // N_SO directory
    stab.extend_from_slice(&stab_record(source, 0x64, 1, 0)); // N_SO source
    stab.extend_from_slice(&stab_record(obj, 0x38, 0, 0)); // N_OBJ
    stab.extend_from_slice(&stab_record(cmd, 0x34, 0, 0)); // N_CMDLINE
    stab.extend_from_slice(&stab_record(0, 0x2a, 10, 0)); // N_MAIN

    build_elf(&[(".stab", stab, 12), (".stabstr", stabstr, 0)])
}

#[test]
fn stabs_units() {
    let file = debugread::elf::load_bytes(stabs_object()).unwrap();
    assert!(!file.has_dwarf());
    assert!(file.has_stabs());

    let units = file.stab_units().unwrap();
    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert_eq!(unit.directory, b"/src/");
    assert_eq!(unit.source, b"/src/foo.c");
    assert_eq!(unit.source_path(), b"/src/foo.c");
    assert_eq!(unit.command_line.as_deref(), Some(&b"rm -f foo.y ; gcc foo.c"[..]));
    assert_eq!(unit.object.as_deref(), Some(&b"x.o"[..]));
    assert_eq!(unit.main_line, Some(10));
    assert!(unit.has_main());
    assert_eq!(unit.language, 1);

    let mut buf = Vec::new();
    let mut f = DefaultFormatter::new(&mut buf, 2);
    display::dump_stab_unit(&mut f, unit).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("/src/foo.c"));
    assert!(text.contains("main at line 10"));
}

#[test]
fn not_an_elf_file() {
    assert!(debugread::elf::load_bytes(b"not elf".to_vec()).is_err());
}
