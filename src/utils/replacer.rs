use fastrand::Rng;

use crate::{
    buffer::frame_table::FrameTable, config::Policy, storage::page::page_table::PageTable,
    utils::fifo_queue::FifoQueue, FrameId, PageId,
};

/// Victim selection for the fault handler.
///
/// `evict` is only called once every frame is occupied, so an implementation
/// may treat a free frame as a broken invariant and return `None`.
pub trait Replacer {
    fn policy(&self) -> Policy;

    /// `page` was loaded into a frame that had never been used.
    fn record_fill(&mut self, _page: PageId) -> bool {
        true
    }

    /// Picks the resident page whose frame `incoming` will take over.
    fn evict(&mut self, incoming: PageId, frames: &FrameTable, page_table: &PageTable)
        -> Option<PageId>;

    /// A fault on `page` has been resolved.
    fn record_access(&mut self, _page: PageId) {}
}

pub fn build_replacer(
    policy: Policy,
    npages: usize,
    nframes: usize,
    seed: Option<u64>,
) -> Box<dyn Replacer> {
    let rng = match seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    };

    match policy {
        Policy::Fifo => Box::new(FifoReplacer::new(nframes)),
        Policy::Rand => Box::new(RandomReplacer::new(rng)),
        Policy::Custom => Box::new(SecondChanceReplacer::new(npages, rng)),
    }
}

pub struct FifoReplacer {
    queue: FifoQueue<PageId>,
}

impl FifoReplacer {
    pub fn new(nframes: usize) -> Self {
        FifoReplacer {
            queue: FifoQueue::new(nframes),
        }
    }

    pub fn queue(&self) -> &FifoQueue<PageId> {
        &self.queue
    }
}

impl Replacer for FifoReplacer {
    fn policy(&self) -> Policy {
        Policy::Fifo
    }

    fn record_fill(&mut self, page: PageId) -> bool {
        self.queue.push_back(page)
    }

    // The oldest arrival leaves and the incoming page queues behind every
    // page still resident.
    fn evict(&mut self, incoming: PageId, _: &FrameTable, _: &PageTable) -> Option<PageId> {
        let victim = self.queue.pop_front()?;
        if !self.queue.push_back(incoming) {
            return None;
        }
        Some(victim)
    }
}

pub struct RandomReplacer {
    rng: Rng,
}

impl RandomReplacer {
    pub fn new(rng: Rng) -> Self {
        RandomReplacer { rng }
    }
}

impl Replacer for RandomReplacer {
    fn policy(&self) -> Policy {
        Policy::Rand
    }

    fn evict(&mut self, _: PageId, frames: &FrameTable, _: &PageTable) -> Option<PageId> {
        if frames.is_empty() {
            return None;
        }
        let frame = self.rng.usize(..frames.len()) as FrameId;
        frames.occupant(frame)
    }
}

/// Use-bit/dirty-bit policy selected by `custom` on the command line.
///
/// A first pass from a random frame to the end of the table looks for a page
/// that is neither recently used nor dirty, so eviction costs no write-back.
/// Failing that, a clock-style sweep from frame 0 clears use bits and takes
/// the first page that was already cold.
pub struct SecondChanceReplacer {
    use_bits: Vec<bool>,
    rng: Rng,
}

impl SecondChanceReplacer {
    pub fn new(npages: usize, rng: Rng) -> Self {
        SecondChanceReplacer {
            use_bits: vec![false; npages],
            rng,
        }
    }

    pub fn is_used(&self, page: PageId) -> bool {
        self.use_bits.get(page as usize).copied().unwrap_or(false)
    }

    fn clean_and_cold(&self, start: usize, frames: &FrameTable, page_table: &PageTable) -> Option<PageId> {
        (start..frames.len())
            .filter_map(|frame| frames.occupant(frame as FrameId))
            .find(|&page| !self.is_used(page) && !page_table.is_dirty(page))
    }

    fn sweep(&mut self, frames: &FrameTable) -> Option<PageId> {
        let nframes = frames.len();

        // One full lap clears every bit, so the second lap always ends it
        for frame in (0..nframes).cycle().take(2 * nframes) {
            let page = frames.occupant(frame as FrameId)?;
            let bit = self.use_bits.get_mut(page as usize)?;
            if !*bit {
                return Some(page);
            }
            *bit = false;
        }

        None
    }
}

impl Replacer for SecondChanceReplacer {
    fn policy(&self) -> Policy {
        Policy::Custom
    }

    fn evict(&mut self, _: PageId, frames: &FrameTable, page_table: &PageTable) -> Option<PageId> {
        if frames.is_empty() {
            return None;
        }

        let start = self.rng.usize(..frames.len());
        self.clean_and_cold(start, frames, page_table)
            .or_else(|| self.sweep(frames))
    }

    fn record_access(&mut self, page: PageId) {
        if let Some(bit) = self.use_bits.get_mut(page as usize) {
            *bit = true;
        }
    }
}

#[cfg(test)]
pub mod test {
    use fastrand::Rng;

    use super::{FifoReplacer, RandomReplacer, Replacer, SecondChanceReplacer};
    use crate::{
        buffer::frame_table::FrameTable,
        storage::page::page_table::{PageTable, Protection},
    };

    // Frame i holds pages[i] with the given protection
    fn resident(pages: &[(u32, Protection)], npages: usize) -> (FrameTable, PageTable) {
        let mut frames = FrameTable::new(pages.len());
        let mut page_table = PageTable::new(npages, pages.len()).unwrap();

        for (frame, &(page, protection)) in pages.iter().enumerate() {
            frames.occupy(frame as u32, page).unwrap();
            page_table.set_entry(page, frame as u32, protection).unwrap();
        }

        (frames, page_table)
    }

    #[test]
    fn fifo_replacer_test() {
        let (frames, page_table) = resident(
            &[(0, Protection::Read), (1, Protection::Read), (2, Protection::Read)],
            8,
        );
        let mut replacer = FifoReplacer::new(3);

        assert!(replacer.record_fill(0));
        assert!(replacer.record_fill(1));
        assert!(replacer.record_fill(2));

        // Pages leave in arrival order, newcomers queue at the tail
        assert_eq!(Some(0), replacer.evict(3, &frames, &page_table));
        assert_eq!(Some(1), replacer.evict(4, &frames, &page_table));
        assert_eq!(Some(2), replacer.evict(5, &frames, &page_table));
        assert_eq!(Some(3), replacer.evict(6, &frames, &page_table));

        let queued: Vec<u32> = replacer.queue().iter().copied().collect();
        assert_eq!(vec![4, 5, 6], queued);
        assert_eq!(3, replacer.queue().len());
    }

    #[test]
    fn fifo_replacer_empty_queue_test() {
        let (frames, page_table) = resident(&[(0, Protection::Read)], 2);
        let mut replacer = FifoReplacer::new(1);

        // Nothing was ever filled through this replacer
        assert_eq!(None, replacer.evict(1, &frames, &page_table));
    }

    #[test]
    fn random_replacer_test() {
        let (frames, page_table) = resident(
            &[(5, Protection::Read), (2, Protection::ReadWrite), (7, Protection::Read)],
            8,
        );
        let mut replacer = RandomReplacer::new(Rng::with_seed(7));

        for _ in 0..64 {
            let victim = replacer.evict(0, &frames, &page_table).unwrap();
            assert!([5, 2, 7].contains(&victim));
        }
    }

    #[test]
    fn second_chance_prefers_clean_cold_page_test() {
        // Only the last frame holds a page that is both unused and clean, so
        // every random start reaches it in the first pass.
        let (frames, page_table) = resident(
            &[(0, Protection::ReadWrite), (1, Protection::Read), (2, Protection::Read)],
            4,
        );
        let mut replacer = SecondChanceReplacer::new(4, Rng::with_seed(1));
        replacer.record_access(1);

        for _ in 0..16 {
            assert_eq!(Some(2), replacer.evict(3, &frames, &page_table));
        }
        assert!(replacer.is_used(1));
    }

    #[test]
    fn second_chance_falls_back_to_dirty_page_test() {
        let (frames, page_table) = resident(
            &[(0, Protection::Read), (1, Protection::ReadWrite), (2, Protection::Read)],
            4,
        );
        let mut replacer = SecondChanceReplacer::new(4, Rng::with_seed(3));
        replacer.record_access(0);
        replacer.record_access(2);

        // Page 1 is cold but dirty: the sweep from frame 0 clears page 0's bit
        // and stops at page 1 without reaching page 2.
        assert_eq!(Some(1), replacer.evict(3, &frames, &page_table));
        assert!(!replacer.is_used(0));
        assert!(replacer.is_used(2));
    }

    #[test]
    fn second_chance_all_used_test() {
        let (frames, page_table) = resident(
            &[(3, Protection::ReadWrite), (1, Protection::Read), (0, Protection::Read)],
            4,
        );
        let mut replacer = SecondChanceReplacer::new(4, Rng::with_seed(11));
        for page in [3, 1, 0] {
            replacer.record_access(page);
        }

        // A full lap clears every bit, then frame 0's page goes
        assert_eq!(Some(3), replacer.evict(2, &frames, &page_table));
        for page in [3, 1, 0] {
            assert!(!replacer.is_used(page));
        }
    }
}
