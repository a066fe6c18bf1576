use anyhow::Result;

use virtmem::{config, engine::Simulation, logger};

// virtmem <npages> <nframes> <rand|fifo|custom> <sort|scan|focus>
fn main() -> Result<()> {
    let matches = config::command().get_matches();
    let options = config::SimulationOptions::from_matches(&matches)?;

    logger::init(options.log_level)?;

    let workload = options.workload;
    let dump_page_table = options.dump_page_table;

    let mut simulation = Simulation::open(options)?;
    let result = simulation.run()?;
    println!("{} result is {}", workload, result);

    if dump_page_table {
        print!("{}", simulation.page_table());
    }

    let stats = simulation.close()?;
    println!("{}", stats);

    Ok(())
}
