use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

use crate::storage::disk::manager::DEFAULT_DISK_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Rand,
    Fifo,
    Custom,
}

impl Policy {
    pub const NAMES: [&'static str; 3] = ["rand", "fifo", "custom"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Rand => "rand",
            Policy::Fifo => "fifo",
            Policy::Custom => "custom",
        }
    }
}

impl FromStr for Policy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rand" => Ok(Policy::Rand),
            "fifo" => Ok(Policy::Fifo),
            "custom" => Ok(Policy::Custom),
            _ => Err(anyhow!(
                "unknown replacement policy: {} (expected rand|fifo|custom)",
                s
            )),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Sort,
    Scan,
    Focus,
}

impl Workload {
    pub const NAMES: [&'static str; 3] = ["sort", "scan", "focus"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Workload::Sort => "sort",
            Workload::Scan => "scan",
            Workload::Focus => "focus",
        }
    }
}

impl FromStr for Workload {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sort" => Ok(Workload::Sort),
            "scan" => Ok(Workload::Scan),
            "focus" => Ok(Workload::Focus),
            _ => Err(anyhow!(
                "unknown program: {} (expected sort|scan|focus)",
                s
            )),
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub npages: usize,
    pub nframes: usize,
    pub policy: Policy,
    pub workload: Workload,

    // Backing store file, recreated on every run
    pub disk_path: PathBuf,
    // Seeds the rand and custom replacers; entropy when absent
    pub seed: Option<u64>,

    pub log_level: LevelFilter,
    pub dump_page_table: bool,
}

impl SimulationOptions {
    pub fn new(npages: usize, nframes: usize, policy: Policy, workload: Workload) -> Self {
        SimulationOptions {
            npages,
            nframes,
            policy,
            workload,
            disk_path: PathBuf::from(DEFAULT_DISK_PATH),
            seed: None,
            log_level: LevelFilter::Warn,
            dump_page_table: false,
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut options = SimulationOptions::new(
            count_arg(matches, "npages")?,
            count_arg(matches, "nframes")?,
            name_arg(matches, "policy")?.parse()?,
            name_arg(matches, "workload")?.parse()?,
        );

        if let Some(path) = matches.get_one::<PathBuf>("disk") {
            options.disk_path = path.clone();
        }
        options.seed = matches.get_one::<u64>("seed").copied();
        options.log_level = match matches.get_count("verbose") {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        options.dump_page_table = matches.get_flag("dump-page-table");

        Ok(options)
    }
}

fn count_arg(matches: &ArgMatches, name: &str) -> Result<usize> {
    matches
        .get_one::<u32>(name)
        .map(|n| *n as usize)
        .with_context(|| format!("missing <{}>", name))
}

fn name_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing <{}>", name))
}

pub fn command() -> Command {
    Command::new("virtmem")
        .about("Demand-paged virtual memory simulator")
        .override_usage("virtmem <npages> <nframes> <rand|fifo|custom> <sort|scan|focus>")
        .arg(
            Arg::new("npages")
                .help("Number of virtual pages")
                .required(true)
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("nframes")
                .help("Number of physical frames")
                .required(true)
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("policy")
                .help("Page replacement policy")
                .required(true)
                .value_parser(Policy::NAMES),
        )
        .arg(
            Arg::new("workload")
                .help("Program to run against virtual memory")
                .required(true)
                .value_parser(Workload::NAMES),
        )
        .arg(
            Arg::new("disk")
                .long("disk")
                .help("Path of the backing store file")
                .default_value(DEFAULT_DISK_PATH)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the rand and custom policies")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more (repeat for debug and trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("dump-page-table")
                .long("dump-page-table")
                .help("Print the final page table")
                .action(ArgAction::SetTrue),
        )
}
