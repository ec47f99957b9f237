use layout::{Pcb, Pid, BYTES_PER_PAGE_TABLE, PAGE_TABLE_REGION_SIZE, PCB_SLOTS};

/// Lowest PCB slot without a valid process.
pub fn lowest_free_slot(pcbs: &[Pcb]) -> Option<Pid> {
    (0..PCB_SLOTS as Pid).find(|slot| !pcbs.iter().any(|pcb| pcb.pid == *slot))
}

/// First offset in the page table region where a new table fits without
/// moving any existing one.
pub fn find_table_gap(pcbs: &[Pcb]) -> Option<u8> {
    let mut tables: Vec<(usize, usize)> = pcbs
        .iter()
        .map(|pcb| {
            let start = pcb.page_table_base as usize;
            (start, start + BYTES_PER_PAGE_TABLE)
        })
        .collect();
    tables.sort();

    let mut cursor = 0;
    for (start, end) in tables {
        if cursor + BYTES_PER_PAGE_TABLE <= start {
            return Some(cursor as u8);
        }
        cursor = cursor.max(end);
    }
    if cursor + BYTES_PER_PAGE_TABLE <= PAGE_TABLE_REGION_SIZE {
        return Some(cursor as u8);
    }
    None
}
