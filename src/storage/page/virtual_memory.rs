use anyhow::{bail, Result};
use byteorder::{ByteOrder, LittleEndian};

use super::{
    page_constants::{PAGE_SIZE, WORD_SIZE},
    page_table::{AccessType, PageTable},
};
use crate::{buffer::fault_handler::FaultHandler, PageId};

// Absent -> read-only -> read-write
const MAX_FAULTS_PER_ACCESS: usize = 2;

/// The virtual address space seen by a workload.
///
/// Every access is checked against the page table. When the protection does
/// not allow it, the fault handler runs and the access is retried, the way a
/// faulting instruction is re-executed once the handler returns.
pub struct VirtualMemory {
    page_table: PageTable,
    handler: FaultHandler,
}

impl VirtualMemory {
    pub fn new(page_table: PageTable, handler: FaultHandler) -> Self {
        Self {
            page_table,
            handler,
        }
    }

    pub fn len(&self) -> usize {
        self.page_table.npages() * PAGE_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Physical offset of `addr`, faulting until `access` is allowed
    fn translate(&mut self, addr: usize, access: AccessType) -> Result<usize> {
        if addr >= self.len() {
            bail!(
                "address {:#x} outside virtual memory of {:#x} bytes",
                addr,
                self.len()
            );
        }

        let page = (addr / PAGE_SIZE) as PageId;
        let offset = addr % PAGE_SIZE;

        let mut faults = 0;
        loop {
            let entry = self.page_table.get_entry(page)?;
            if entry.protection.allows(access) {
                return Ok(entry.frame as usize * PAGE_SIZE + offset);
            }

            if faults == MAX_FAULTS_PER_ACCESS {
                bail!(
                    "{:?} access to page {} still faulting after {} faults",
                    access,
                    page,
                    faults
                );
            }

            self.handler.handle_fault(&mut self.page_table, page)?;
            faults += 1;
        }
    }

    fn word_addr(addr: usize) -> Result<usize> {
        if addr % WORD_SIZE != 0 {
            bail!("unaligned word access at {:#x}", addr);
        }
        Ok(addr)
    }

    pub fn read_u8(&mut self, addr: usize) -> Result<u8> {
        let phys = self.translate(addr, AccessType::Read)?;
        Ok(self.page_table.physmem()[phys])
    }

    pub fn write_u8(&mut self, addr: usize, value: u8) -> Result<()> {
        let phys = self.translate(addr, AccessType::Write)?;
        self.page_table.physmem_mut()[phys] = value;
        Ok(())
    }

    pub fn read_u32(&mut self, addr: usize) -> Result<u32> {
        let phys = self.translate(Self::word_addr(addr)?, AccessType::Read)?;
        Ok(LittleEndian::read_u32(
            &self.page_table.physmem()[phys..phys + WORD_SIZE],
        ))
    }

    pub fn write_u32(&mut self, addr: usize, value: u32) -> Result<()> {
        let phys = self.translate(Self::word_addr(addr)?, AccessType::Write)?;
        LittleEndian::write_u32(
            &mut self.page_table.physmem_mut()[phys..phys + WORD_SIZE],
            value,
        );
        Ok(())
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn handler(&self) -> &FaultHandler {
        &self.handler
    }

    pub fn into_parts(self) -> (PageTable, FaultHandler) {
        (self.page_table, self.handler)
    }
}
