use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::debug;

use crate::{storage::page::page_constants::PAGE_SIZE, PageId};

pub const DEFAULT_DISK_PATH: &str = "myvirtualdisk";

// Block-addressable backing store. Block `n` holds the contents of page `n`,
// so the file is exactly `nblocks * PAGE_SIZE` bytes long.
pub struct Disk {
    file: File,
    path: PathBuf,
    nblocks: usize,

    num_reads: u64,
    num_writes: u64,
}

impl Disk {
    pub fn open(path: impl AsRef<Path>, nblocks: usize) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("couldn't open {}", path.display()))?;

        file.set_len((nblocks * PAGE_SIZE) as u64)
            .with_context(|| format!("couldn't size virtual disk {}", path.display()))?;

        debug!("opened {} with {} blocks", path.display(), nblocks);

        Ok(Disk {
            file,
            path: path.to_path_buf(),
            nblocks,
            num_reads: 0,
            num_writes: 0,
        })
    }

    fn offset(&self, block: PageId, len: usize) -> Result<u64> {
        if block as usize >= self.nblocks {
            bail!(
                "block {} out of range for disk of {} blocks",
                block,
                self.nblocks
            );
        }
        if len != PAGE_SIZE {
            bail!("buffer of {} bytes is not a whole block", len);
        }

        Ok(block as u64 * PAGE_SIZE as u64)
    }

    pub fn read_page(&mut self, block: PageId, page_data: &mut [u8]) -> Result<()> {
        let offset = self.offset(block, page_data.len())?;

        self.file
            .seek(SeekFrom::Start(offset))
            .with_context(|| format!("I/O error while seeking block {}", block))?;
        self.file
            .read_exact(page_data)
            .with_context(|| format!("I/O error while reading block {}", block))?;

        self.num_reads += 1;
        Ok(())
    }

    pub fn write_page(&mut self, block: PageId, page_data: &[u8]) -> Result<()> {
        let offset = self.offset(block, page_data.len())?;

        self.file
            .seek(SeekFrom::Start(offset))
            .with_context(|| format!("I/O error while seeking block {}", block))?;
        self.file
            .write_all(page_data)
            .with_context(|| format!("I/O error while writing block {}", block))?;

        self.num_writes += 1;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        self.file
            .sync_all()
            .with_context(|| format!("couldn't sync virtual disk {}", self.path.display()))?;
        Ok(())
    }

    pub fn nblocks(&self) -> usize {
        self.nblocks
    }

    pub fn num_reads(&self) -> u64 {
        self.num_reads
    }

    pub fn num_writes(&self) -> u64 {
        self.num_writes
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
