use anyhow::Result;

use crate::storage::page::virtual_memory::VirtualMemory;

const SCAN_PASSES: usize = 10;

// Sequential fill followed by repeated sequential reads. With fewer frames than
// pages every pass walks past the whole working set.
pub fn scan_program(memory: &mut VirtualMemory) -> Result<u64> {
    let length = memory.len();

    for i in 0..length {
        memory.write_u8(i, (i % 256) as u8)?;
    }

    let mut total: u64 = 0;
    for _ in 0..SCAN_PASSES {
        for i in 0..length {
            total += memory.read_u8(i)? as u64;
        }
    }

    Ok(total)
}
