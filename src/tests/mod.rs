pub mod config_test;

use std::{collections::HashSet, fs::remove_file, path::PathBuf};

use crate::{
    buffer::fault_handler::FaultHandler,
    config::Policy,
    storage::{
        disk::manager::Disk,
        page::{page_table::PageTable, virtual_memory::VirtualMemory},
    },
    utils::replacer::build_replacer,
};

// Unique per test and per process so tests can run in parallel
pub(crate) fn disk_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("virtmem_{}_{}.bin", name, std::process::id()))
}

pub(crate) fn memory(
    name: &str,
    npages: usize,
    nframes: usize,
    policy: Policy,
    seed: u64,
) -> VirtualMemory {
    let disk = Disk::open(disk_path(name), npages).expect("disk opens");
    let page_table = PageTable::new(npages, nframes).expect("page table");
    let replacer = build_replacer(policy, npages, nframes, Some(seed));

    VirtualMemory::new(page_table, FaultHandler::new(nframes, replacer, disk))
}

pub(crate) fn teardown(name: &str) {
    let _ = remove_file(disk_path(name));
}

// Frame table, page table and counters must agree after every fault
pub(crate) fn assert_invariants(memory: &VirtualMemory) {
    let page_table = memory.page_table();
    let handler = memory.handler();
    let frames = handler.frames();

    let resident: Vec<_> = frames.resident().collect();
    assert_eq!(resident.len(), frames.len() - frames.free_frames());

    let pages: HashSet<u32> = resident.iter().map(|&(_, page)| page).collect();
    assert_eq!(pages.len(), resident.len(), "a page occupies two frames");

    for &(frame, page) in &resident {
        let entry = page_table.get_entry(page).unwrap();
        assert!(entry.protection.is_resident(), "page {} in frame {} is unmapped", page, frame);
        assert_eq!(frame, entry.frame);
    }

    for page in 0..page_table.npages() as u32 {
        let entry = page_table.get_entry(page).unwrap();
        if entry.protection.is_resident() {
            assert_eq!(Some(page), frames.occupant(entry.frame));
        }
        assert_eq!(entry.protection.is_dirty(), page_table.is_dirty(page));
    }

    let stats = handler.stats();
    assert_eq!(stats.reads, handler.disk().num_reads());
    assert_eq!(stats.writes, handler.disk().num_writes());
}
