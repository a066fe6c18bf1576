use anyhow::Result;
use fastrand::Rng;

use crate::storage::page::virtual_memory::VirtualMemory;

const FOCUS_SEED: u64 = 38290;
const HOT_SPOTS: usize = 100;
const WRITES_PER_SPOT: usize = 100;
const SPOT_SIZE: usize = 25;

// Bursts of writes clustered around random hot spots.
pub fn focus_program(memory: &mut VirtualMemory) -> Result<u64> {
    let length = memory.len();
    let mut rng = Rng::with_seed(FOCUS_SEED);

    for i in 0..length {
        memory.write_u8(i, 0)?;
    }

    for _ in 0..HOT_SPOTS {
        let start = rng.usize(..length);
        for _ in 0..WRITES_PER_SPOT {
            let addr = (start + rng.usize(..SPOT_SIZE)) % length;
            memory.write_u8(addr, rng.u8(..))?;
        }
    }

    let mut total: u64 = 0;
    for i in 0..length {
        total += memory.read_u8(i)? as u64;
    }

    Ok(total)
}
