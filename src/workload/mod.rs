use anyhow::Result;

use crate::{config::Workload, storage::page::virtual_memory::VirtualMemory};

pub mod focus;
pub mod scan;
pub mod sort;

/// Runs `workload` over the whole of `memory` and returns its checksum.
pub fn run(workload: Workload, memory: &mut VirtualMemory) -> Result<u64> {
    match workload {
        Workload::Sort => sort::sort_program(memory),
        Workload::Scan => scan::scan_program(memory),
        Workload::Focus => focus::focus_program(memory),
    }
}
