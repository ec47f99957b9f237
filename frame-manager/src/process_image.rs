use memory::PAGE_SIZE;

/// Code page of every new process:
/// `addi 0, lb 8, addi 5, sb 9, add 8, sub 9, branch 0, jump 1`.
pub const SAMPLE_PROGRAM: [u8; PAGE_SIZE] = [
    0b011_00000,
    0b000_01000,
    0b011_00101,
    0b001_01001,
    0b010_01000,
    0b100_01001,
    0b110_00000,
    0b111_00001,
];

/// Contents of virtual page `vpn` of a new process.
///
/// Page 0 holds the sample program; every other byte at virtual address `v`
/// holds `v & 0xf`.
pub fn initial_page(vpn: usize) -> [u8; PAGE_SIZE] {
    if vpn == 0 {
        return SAMPLE_PROGRAM;
    }
    let mut page = [0; PAGE_SIZE];
    for (offset, byte) in page.iter_mut().enumerate() {
        *byte = ((vpn * PAGE_SIZE + offset) & 0xf) as u8;
    }
    page
}
