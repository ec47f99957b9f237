use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use layout::{
    decode_pcbs, encode_pcb_set, encode_pte, read_free_frames, read_page_table, write_free_frames,
    write_page_table, Pcb, Pid, BYTES_PER_PAGE_TABLE, PAGES_PER_PROCESS, PAGE_TABLE_REGION_SIZE,
};
use memory::PhysicalMemory;

use crate::{
    compaction::compact_page_tables,
    placement::{find_table_gap, lowest_free_slot},
    process_image::initial_page,
    AllocError, AllocationPolicy,
};

/// Creates a process with two freshly mapped frames.
///
/// Nothing is written unless every step succeeds: the returned memory is a
/// new snapshot and `memory` is left as it was.
pub fn allocate_process<R: Rng + ?Sized>(
    memory: &PhysicalMemory,
    rng: &mut R,
    policy: &AllocationPolicy,
) -> Result<(PhysicalMemory, Pcb), AllocError> {
    let mut free = read_free_frames(memory);
    if free.len() < PAGES_PER_PROCESS {
        debug!("No free frames");
        return Err(AllocError::OutOfFrames {
            requested: PAGES_PER_PROCESS,
            available: free.len(),
        });
    }

    let pcbs = decode_pcbs(memory);
    let pid = lowest_free_slot(&pcbs).ok_or(AllocError::NoFreeSlot)?;
    let first_process = pcbs.is_empty();

    let mut candidates: Vec<u8> = free.iter().collect();
    let (chosen, _) = candidates.partial_shuffle(rng, PAGES_PER_PROCESS);
    let frames: Vec<u8> = chosen.to_vec();
    debug!("Process {} gets frames {:?}", pid, frames);

    let (mut next, base) = match find_table_gap(&pcbs) {
        Some(base) => (*memory, base),
        None => {
            debug!("No gap for a page table, compacting");
            compact_page_tables(memory)?
        }
    };
    if base as usize + BYTES_PER_PAGE_TABLE > PAGE_TABLE_REGION_SIZE {
        return Err(AllocError::NoTableSpace {
            cursor: base as usize,
            needed: BYTES_PER_PAGE_TABLE,
        });
    }

    let pcb = Pcb::new(pid, base);
    let mut table = [0u8; BYTES_PER_PAGE_TABLE];
    for (vpn, frame) in frames.iter().enumerate() {
        // the very first page handed out is always read-only
        let writable = if first_process && vpn == 0 {
            false
        } else {
            rng.gen_bool(policy.writable_probability())
        };
        table[vpn] = encode_pte(*frame, writable);
        next.write_frame(*frame, &initial_page(vpn))
            .map_err(layout::LayoutError::from)?;
        free.remove(*frame);
    }

    next = write_page_table(&next, &pcb, &table)?;
    let mut live = decode_pcbs(&next);
    live.push(pcb);
    next = encode_pcb_set(&live, &next)?;
    next = write_free_frames(free, &next)?;

    info!(
        "Created process {} with page table at offset {} ({} frames left)",
        pid,
        base,
        free.len()
    );
    Ok((next, pcb))
}

/// Releases a process's frames and PCB, then compacts the page tables.
pub fn deallocate_process(memory: &PhysicalMemory, pid: Pid) -> Result<PhysicalMemory, AllocError> {
    let pcbs = decode_pcbs(memory);
    let target = pcbs
        .iter()
        .find(|pcb| pcb.pid == pid)
        .copied()
        .ok_or(AllocError::NotFound(pid))?;

    let mut free = read_free_frames(memory);
    for entry in read_page_table(memory, &target)?.iter().filter(|entry| entry.valid) {
        free.insert(entry.frame);
    }

    let remaining: Vec<Pcb> = pcbs.into_iter().filter(|pcb| pcb.pid != pid).collect();
    let next = encode_pcb_set(&remaining, memory)?;
    let next = write_free_frames(free, &next)?;
    let (next, _) = compact_page_tables(&next)?;

    info!("Deleted process {} ({} frames free)", pid, free.len());
    Ok(next)
}
