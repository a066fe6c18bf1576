use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    buffer::fault_handler::{FaultHandler, FaultStats},
    config::SimulationOptions,
    storage::{
        disk::manager::Disk,
        page::{page_table::PageTable, virtual_memory::VirtualMemory},
    },
    utils::replacer::build_replacer,
    workload,
};

// Everything one run needs: the options it was built from and the virtual
// memory that owns the page table, fault handler and backing store.
pub struct Simulation {
    pub(crate) options: SimulationOptions,
    pub(crate) memory: VirtualMemory,
}

impl Simulation {
    pub fn open(options: SimulationOptions) -> Result<Simulation> {
        info!(
            "{} pages, {} frames, policy {}, program {}",
            options.npages, options.nframes, options.policy, options.workload
        );

        let disk = Disk::open(&options.disk_path, options.npages)
            .context("couldn't create virtual disk")?;

        let page_table = PageTable::new(options.npages, options.nframes)
            .context("couldn't create page table")?;

        let replacer = build_replacer(
            options.policy,
            options.npages,
            options.nframes,
            options.seed,
        );
        let handler = FaultHandler::new(options.nframes, replacer, disk);

        Ok(Simulation {
            options,
            memory: VirtualMemory::new(page_table, handler),
        })
    }

    pub fn run(&mut self) -> Result<u64> {
        let result = workload::run(self.options.workload, &mut self.memory)
            .with_context(|| format!("{} program failed", self.options.workload))?;

        debug!("{} program finished: {:?}", self.options.workload, self.stats());
        Ok(result)
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn memory(&mut self) -> &mut VirtualMemory {
        &mut self.memory
    }

    pub fn page_table(&self) -> &PageTable {
        self.memory.page_table()
    }

    pub fn stats(&self) -> FaultStats {
        self.memory.handler().stats()
    }

    pub fn close(self) -> Result<FaultStats> {
        let (_, handler) = self.memory.into_parts();
        handler.close()
    }
}
