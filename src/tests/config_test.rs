#[cfg(test)]
pub mod test {
    use std::path::PathBuf;

    use log::LevelFilter;

    use crate::{
        config::{command, Policy, SimulationOptions, Workload},
        storage::disk::manager::DEFAULT_DISK_PATH,
    };

    fn parse(args: &[&str]) -> anyhow::Result<SimulationOptions> {
        let matches = command().try_get_matches_from(args)?;
        SimulationOptions::from_matches(&matches)
    }

    #[test]
    fn parse_required_args_test() {
        let options = parse(&["virtmem", "100", "10", "custom", "focus"]).unwrap();

        assert_eq!(100, options.npages);
        assert_eq!(10, options.nframes);
        assert_eq!(Policy::Custom, options.policy);
        assert_eq!(Workload::Focus, options.workload);
        assert_eq!(PathBuf::from(DEFAULT_DISK_PATH), options.disk_path);
        assert_eq!(None, options.seed);
        assert_eq!(LevelFilter::Warn, options.log_level);
        assert!(!options.dump_page_table);
    }

    #[test]
    fn parse_optional_args_test() {
        let options = parse(&[
            "virtmem",
            "8",
            "4",
            "rand",
            "sort",
            "--disk",
            "/tmp/other.disk",
            "--seed",
            "42",
            "-vv",
            "--dump-page-table",
        ])
        .unwrap();

        assert_eq!(Policy::Rand, options.policy);
        assert_eq!(Workload::Sort, options.workload);
        assert_eq!(PathBuf::from("/tmp/other.disk"), options.disk_path);
        assert_eq!(Some(42), options.seed);
        assert_eq!(LevelFilter::Debug, options.log_level);
        assert!(options.dump_page_table);

        let options = parse(&["virtmem", "8", "4", "fifo", "scan", "-vvvv"]).unwrap();
        assert_eq!(LevelFilter::Trace, options.log_level);
    }

    #[test]
    fn reject_bad_args_test() {
        let rejected: [&[&str]; 8] = [
            &["virtmem", "0", "10", "fifo", "scan"],
            &["virtmem", "10", "0", "fifo", "scan"],
            &["virtmem", "ten", "10", "fifo", "scan"],
            &["virtmem", "10", "-3", "fifo", "scan"],
            &["virtmem", "10", "10", "lru", "scan"],
            &["virtmem", "10", "10", "fifo", "grep"],
            &["virtmem", "10", "10", "fifo"],
            &["virtmem", "10", "10", "fifo", "scan", "--seed", "x"],
        ];

        for args in rejected {
            assert!(parse(args).is_err(), "{:?} should be rejected", args);
        }
    }

    #[test]
    fn policy_and_workload_names_test() {
        for name in Policy::NAMES {
            assert_eq!(name, name.parse::<Policy>().unwrap().as_str());
        }
        for name in Workload::NAMES {
            assert_eq!(name, name.parse::<Workload>().unwrap().to_string());
        }

        assert!("FIFO".parse::<Policy>().is_err());
        assert!("".parse::<Workload>().is_err());
    }
}
