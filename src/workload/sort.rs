use anyhow::Result;
use fastrand::Rng;

use crate::storage::page::{page_constants::WORD_SIZE, virtual_memory::VirtualMemory};

pub const SORT_SEED: u64 = 4856;

// Fills memory with random words and quicksorts them in place. Partitioning
// touches pages far apart, so this is the least local of the three programs.
pub fn sort_program(memory: &mut VirtualMemory) -> Result<u64> {
    let words = memory.len() / WORD_SIZE;
    let mut rng = Rng::with_seed(SORT_SEED);

    for i in 0..words {
        memory.write_u32(i * WORD_SIZE, rng.u32(..))?;
    }

    quicksort(memory, words)?;

    let mut total: u64 = 0;
    for i in 0..words {
        total += memory.read_u32(i * WORD_SIZE)? as u64;
    }

    Ok(total)
}

fn read_word(memory: &mut VirtualMemory, index: usize) -> Result<u32> {
    memory.read_u32(index * WORD_SIZE)
}

fn swap_words(memory: &mut VirtualMemory, a: usize, b: usize) -> Result<()> {
    if a == b {
        return Ok(());
    }
    let first = read_word(memory, a)?;
    let second = read_word(memory, b)?;
    memory.write_u32(a * WORD_SIZE, second)?;
    memory.write_u32(b * WORD_SIZE, first)
}

// Sorts words [0, len) with an explicit stack of half-open ranges
pub fn quicksort(memory: &mut VirtualMemory, len: usize) -> Result<()> {
    let mut ranges = vec![(0, len)];

    while let Some((lo, hi)) = ranges.pop() {
        if hi - lo < 2 {
            continue;
        }

        let pivot = partition(memory, lo, hi)?;

        // Larger side first so the smaller one is popped next
        if pivot - lo > hi - pivot {
            ranges.push((lo, pivot));
            ranges.push((pivot + 1, hi));
        } else {
            ranges.push((pivot + 1, hi));
            ranges.push((lo, pivot));
        }
    }

    Ok(())
}

fn partition(memory: &mut VirtualMemory, lo: usize, hi: usize) -> Result<usize> {
    let last = hi - 1;
    swap_words(memory, lo + (hi - lo) / 2, last)?;
    let pivot = read_word(memory, last)?;

    let mut store = lo;
    for i in lo..last {
        if read_word(memory, i)? < pivot {
            swap_words(memory, i, store)?;
            store += 1;
        }
    }
    swap_words(memory, store, last)?;

    Ok(store)
}
