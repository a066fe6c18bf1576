use anyhow::{bail, Result};

use crate::{FrameId, PageId};

// Which page, if any, occupies each physical frame.
//
// Frames are only ever filled once: after the first fill a frame is reused by
// eviction, never handed back, so `free_frames` only counts down.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Option<PageId>>,
    free_frames: usize,
}

impl FrameTable {
    pub fn new(nframes: usize) -> Self {
        FrameTable {
            frames: vec![None; nframes],
            free_frames: nframes,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn free_frames(&self) -> usize {
        self.free_frames
    }

    /// Lowest-index free frame, or `None` once every frame has been filled.
    pub fn find_free_frame(&self) -> Option<FrameId> {
        if self.free_frames == 0 {
            return None;
        }

        self.frames
            .iter()
            .position(|slot| slot.is_none())
            .map(|frame| frame as FrameId)
    }

    pub fn occupy(&mut self, frame: FrameId, page: PageId) -> Result<()> {
        let slot = match self.frames.get_mut(frame as usize) {
            Some(slot) => slot,
            None => bail!("frame {} out of range", frame),
        };

        if let Some(current) = slot {
            bail!("frame {} is already occupied by page {}", frame, current);
        }

        *slot = Some(page);
        self.free_frames -= 1;
        Ok(())
    }

    /// Hands an occupied frame to `page`, returning the page that held it.
    pub fn replace(&mut self, frame: FrameId, page: PageId) -> Result<PageId> {
        let slot = match self.frames.get_mut(frame as usize) {
            Some(slot) => slot,
            None => bail!("frame {} out of range", frame),
        };

        match slot.replace(page) {
            Some(previous) => Ok(previous),
            None => {
                *slot = None;
                bail!("frame {} is free, nothing to replace", frame)
            }
        }
    }

    pub fn occupant(&self, frame: FrameId) -> Option<PageId> {
        self.frames.get(frame as usize).copied().flatten()
    }

    pub fn frame_of(&self, page: PageId) -> Option<FrameId> {
        self.frames
            .iter()
            .position(|slot| *slot == Some(page))
            .map(|frame| frame as FrameId)
    }

    pub fn resident(&self) -> impl Iterator<Item = (FrameId, PageId)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, slot)| slot.map(|page| (frame as FrameId, page)))
    }
}
