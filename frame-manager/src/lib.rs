use layout::{LayoutError, Pid};
use thiserror::Error;

pub mod compaction;
pub mod frame_allocator;
pub mod placement;
pub mod process_image;

pub use compaction::compact_page_tables;
pub use frame_allocator::{allocate_process, deallocate_process};

pub const WRITABLE_PAGE_PROBABILITY: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    #[error("cannot allocate {requested} frames, only {available} free")]
    OutOfFrames { requested: usize, available: usize },
    #[error("every PCB slot is in use")]
    NoFreeSlot,
    #[error("process {0} not found")]
    NotFound(Pid),
    #[error("page tables need {needed} bytes past offset {cursor}, the region is full")]
    NoTableSpace { cursor: usize, needed: usize },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Error, PartialEq)]
#[error("writable probability {0} is not within 0.0..=1.0")]
pub struct InvalidProbability(pub f64);

/// How new page table entries get their writable bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationPolicy {
    writable_probability: f64,
}

impl AllocationPolicy {
    pub fn new(writable_probability: f64) -> Result<Self, InvalidProbability> {
        if !(0.0..=1.0).contains(&writable_probability) {
            return Err(InvalidProbability(writable_probability));
        }
        Ok(AllocationPolicy {
            writable_probability,
        })
    }

    pub fn writable_probability(&self) -> f64 {
        self.writable_probability
    }
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        AllocationPolicy {
            writable_probability: WRITABLE_PAGE_PROBABILITY,
        }
    }
}
