use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};

use crate::{
    buffer::frame_table::FrameTable,
    storage::{
        disk::manager::Disk,
        page::page_table::{PageTable, Protection},
    },
    utils::replacer::Replacer,
    FrameId, PageId,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FaultStats {
    pub faults: u64,
    pub reads: u64,
    pub writes: u64,
}

impl fmt::Display for FaultStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of page faults: {}", self.faults)?;
        writeln!(f, "Number of disk reads: {}", self.reads)?;
        write!(f, "Number of disk writes: {}", self.writes)
    }
}

pub struct FaultHandler {
    // The frame table of the physical memory this handler manages
    frames: FrameTable,

    // Picks the victim once every frame is occupied
    replacer: Box<dyn Replacer>,

    disk: Disk,

    stats: FaultStats,
}

impl FaultHandler {
    pub fn new(nframes: usize, replacer: Box<dyn Replacer>, disk: Disk) -> Self {
        Self {
            frames: FrameTable::new(nframes),
            replacer,
            disk,
            stats: FaultStats::default(),
        }
    }

    /// Resolves one fault on `page`.
    ///
    /// A read-only page is upgraded in place. An absent page is read into the
    /// lowest free frame, or into the frame of a victim chosen by the replacer
    /// once memory is full. A dirty victim is written back first.
    pub fn handle_fault(&mut self, page_table: &mut PageTable, page: PageId) -> Result<()> {
        let entry = page_table.get_entry(page)?;

        match entry.protection {
            // Resident, first write since it was loaded
            Protection::Read => {
                trace!("page {} upgraded to read-write in frame {}", page, entry.frame);
                page_table.set_entry(page, entry.frame, Protection::ReadWrite)?;
            }
            Protection::None => match self.frames.find_free_frame() {
                Some(frame) => self.fill_free_frame(page_table, page, frame)?,
                None => self.evict_and_fill(page_table, page)?,
            },
            Protection::ReadWrite => {
                bail!("page {} faulted while already mapped read-write", page);
            }
        }

        self.stats.faults += 1;
        self.replacer.record_access(page);
        Ok(())
    }

    fn fill_free_frame(&mut self, page_table: &mut PageTable, page: PageId, frame: FrameId) -> Result<()> {
        self.frames.occupy(frame, page)?;

        self.disk
            .read_page(page, page_table.frame_mut(frame)?)
            .with_context(|| format!("couldn't load page {} into frame {}", page, frame))?;
        self.stats.reads += 1;

        page_table.set_entry(page, frame, Protection::Read)?;

        if !self.replacer.record_fill(page) {
            bail!(
                "{} replacer rejected page {} filling frame {}",
                self.replacer.policy(),
                page,
                frame
            );
        }

        trace!("page {} filled free frame {}", page, frame);
        Ok(())
    }

    fn evict_and_fill(&mut self, page_table: &mut PageTable, page: PageId) -> Result<()> {
        let victim = self
            .replacer
            .evict(page, &self.frames, page_table)
            .ok_or_else(|| {
                anyhow!(
                    "{} replacer found no victim for page {}",
                    self.replacer.policy(),
                    page
                )
            })?;

        let victim_entry = page_table.get_entry(victim)?;
        let frame = victim_entry.frame;

        if !victim_entry.protection.is_resident() || self.frames.occupant(frame) != Some(victim) {
            bail!(
                "victim page {} is not resident in frame {} (frame holds {:?})",
                victim,
                frame,
                self.frames.occupant(frame)
            );
        }

        // Flush the victim before its frame is overwritten
        if victim_entry.protection.is_dirty() {
            self.disk
                .write_page(victim, page_table.frame(frame)?)
                .with_context(|| format!("couldn't write back page {} from frame {}", victim, frame))?;
            self.stats.writes += 1;
            debug!("wrote back dirty page {} from frame {}", victim, frame);
        }

        self.disk
            .read_page(page, page_table.frame_mut(frame)?)
            .with_context(|| format!("couldn't load page {} into frame {}", page, frame))?;
        self.stats.reads += 1;

        self.frames.replace(frame, page)?;
        page_table.set_entry(page, frame, Protection::Read)?;
        page_table.set_entry(victim, frame, Protection::None)?;

        debug!("evicted page {} from frame {} for page {}", victim, frame, page);
        Ok(())
    }

    pub fn stats(&self) -> FaultStats {
        self.stats
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn replacer(&self) -> &dyn Replacer {
        self.replacer.as_ref()
    }

    pub fn disk(&self) -> &Disk {
        &self.disk
    }

    /// Syncs the backing store and returns the final counters.
    pub fn close(self) -> Result<FaultStats> {
        self.disk.close()?;
        Ok(self.stats)
    }
}
