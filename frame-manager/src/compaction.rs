use log::{debug, info};
use memory::PhysicalMemory;

use layout::{
    decode_pcbs, encode_pcb_set, read_page_table_bytes, write_page_table, Pcb,
    BYTES_PER_PAGE_TABLE, PAGE_TABLE_REGION_SIZE, START_OF_PAGE_TABLES,
};

use crate::AllocError;

/// Packs every page table into a contiguous run starting at offset 0.
///
/// Tables keep their relative order (ascending by old base), so compacting a
/// packed region changes nothing. Bytes after the run are zeroed. Returns the
/// new memory and the first free offset.
pub fn compact_page_tables(memory: &PhysicalMemory) -> Result<(PhysicalMemory, u8), AllocError> {
    let mut pcbs = decode_pcbs(memory);
    pcbs.sort_by_key(|pcb| pcb.page_table_base);

    let needed = pcbs.len() * BYTES_PER_PAGE_TABLE;
    if needed > PAGE_TABLE_REGION_SIZE {
        return Err(AllocError::NoTableSpace { cursor: 0, needed });
    }

    let mut next = *memory;
    let mut moved = Vec::with_capacity(pcbs.len());
    let mut cursor = 0usize;
    for pcb in pcbs {
        // read from the untouched snapshot so overlapping moves are safe
        let table = read_page_table_bytes(memory, &pcb)?;
        let relocated = Pcb {
            page_table_base: cursor as u8,
            ..pcb
        };
        if relocated.page_table_base != pcb.page_table_base {
            debug!(
                "Moving page table of process {} from {} to {}",
                pcb.pid, pcb.page_table_base, cursor
            );
        }
        next = write_page_table(&next, &relocated, &table)?;
        moved.push(relocated);
        cursor += BYTES_PER_PAGE_TABLE;
    }
    next.fill(
        START_OF_PAGE_TABLES + cursor,
        PAGE_TABLE_REGION_SIZE - cursor,
        0,
    )
    .map_err(layout::LayoutError::from)?;
    let next = encode_pcb_set(&moved, &next)?;

    info!("Compacted {} page tables, next free offset {}", moved.len(), cursor);
    Ok((next, cursor as u8))
}
