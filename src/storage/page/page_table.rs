use std::fmt;

use anyhow::{bail, Result};

use super::page_constants::PAGE_SIZE;
use crate::{FrameId, PageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    Read,
    Write,
}

/// Permission state of a single page.
///
/// `ReadWrite` is the only record of dirtiness: a page becomes writable on its
/// first write fault and stays that way until it is evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    None,
    Read,
    ReadWrite,
}

impl Protection {
    pub fn allows(self, access: AccessType) -> bool {
        match (self, access) {
            (Protection::None, _) => false,
            (Protection::Read, AccessType::Read) => true,
            (Protection::Read, AccessType::Write) => false,
            (Protection::ReadWrite, _) => true,
        }
    }

    pub fn is_resident(self) -> bool {
        self != Protection::None
    }

    pub fn is_dirty(self) -> bool {
        self == Protection::ReadWrite
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub frame: FrameId,
    pub protection: Protection,
}

pub struct PageTable {
    entries: Vec<PageTableEntry>,
    nframes: usize,

    // nframes * PAGE_SIZE bytes of simulated physical memory
    physmem: Box<[u8]>,
}

impl PageTable {
    pub fn new(npages: usize, nframes: usize) -> Result<Self> {
        if npages == 0 || nframes == 0 {
            bail!(
                "page table needs at least one page and one frame (got {} pages, {} frames)",
                npages,
                nframes
            );
        }

        let entries = vec![
            PageTableEntry {
                frame: 0,
                protection: Protection::None,
            };
            npages
        ];

        Ok(PageTable {
            entries,
            nframes,
            physmem: vec![0u8; nframes * PAGE_SIZE].into_boxed_slice(),
        })
    }

    pub fn npages(&self) -> usize {
        self.entries.len()
    }

    pub fn nframes(&self) -> usize {
        self.nframes
    }

    pub fn get_entry(&self, page: PageId) -> Result<PageTableEntry> {
        match self.entries.get(page as usize) {
            Some(entry) => Ok(*entry),
            None => bail!("page {} out of range ({} pages)", page, self.npages()),
        }
    }

    pub fn set_entry(&mut self, page: PageId, frame: FrameId, protection: Protection) -> Result<()> {
        if frame as usize >= self.nframes {
            bail!("frame {} out of range ({} frames)", frame, self.nframes);
        }

        let npages = self.npages();
        let entry = match self.entries.get_mut(page as usize) {
            Some(entry) => entry,
            None => bail!("page {} out of range ({} pages)", page, npages),
        };

        entry.frame = frame;
        entry.protection = protection;
        Ok(())
    }

    pub fn is_dirty(&self, page: PageId) -> bool {
        self.entries
            .get(page as usize)
            .is_some_and(|entry| entry.protection.is_dirty())
    }

    fn frame_range(&self, frame: FrameId) -> Result<std::ops::Range<usize>> {
        if frame as usize >= self.nframes {
            bail!("frame {} out of range ({} frames)", frame, self.nframes);
        }

        let start = frame as usize * PAGE_SIZE;
        Ok(start..start + PAGE_SIZE)
    }

    pub fn frame(&self, frame: FrameId) -> Result<&[u8]> {
        let range = self.frame_range(frame)?;
        Ok(&self.physmem[range])
    }

    pub fn frame_mut(&mut self, frame: FrameId) -> Result<&mut [u8]> {
        let range = self.frame_range(frame)?;
        Ok(&mut self.physmem[range])
    }

    pub fn physmem(&self) -> &[u8] {
        &self.physmem
    }

    pub fn physmem_mut(&mut self) -> &mut [u8] {
        &mut self.physmem
    }
}

impl fmt::Display for PageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (page, entry) in self.entries.iter().enumerate() {
            let bits = match entry.protection {
                Protection::None => "--",
                Protection::Read => "r-",
                Protection::ReadWrite => "rw",
            };
            writeln!(f, "page {:06}: frame {:06} bits {}", page, entry.frame, bits)?;
        }
        Ok(())
    }
}
