pub mod page_table;
pub mod virtual_memory;

pub mod page_constants {
    // Shared by the page table, the disk and the workloads
    pub const PAGE_SIZE: usize = 4096;
    pub const WORD_SIZE: usize = 4;
}
