#![warn(missing_docs)]

use std::path::PathBuf;
use structopt::StructOpt;

/// Scans the file system to find Java archives bundling the Log4j JndiLookup class.
#[derive(StructOpt, Debug)]
pub struct Cli {
    /// Command to run
    #[structopt(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(StructOpt, Debug)]
pub enum Command {
    /// Recursively scan a directory for .jar files containing JndiLookup.class
    Scan(ScanArgs),
}

/// Arguments of the `scan` command.
#[derive(StructOpt, Debug, Clone)]
pub struct ScanArgs {
    /// Directory to scan
    #[structopt(short, long, parse(from_os_str))]
    pub dir: PathBuf,

    /// Follow symbolic links while walking the directory.
    #[structopt(short, long)]
    pub follow_links: bool,

    /// Print extracted entries and enable log traces.
    #[structopt(short, long)]
    pub trace: bool,

    /// Print only the findings and the scan results.
    #[structopt(short, long)]
    pub silent: bool,
}

#[cfg(test)]
impl ScanArgs {
    /// Arguments scanning `dir` with every option left at its default.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ScanArgs {
            dir: dir.into(),
            follow_links: false,
            trace: false,
            silent: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_with_dir() {
        let cli = Cli::from_iter_safe(&["jndicheck-rs", "scan", "--dir", "/opt/app"]).unwrap();
        let Command::Scan(args) = cli.command;
        assert_eq!(args.dir, PathBuf::from("/opt/app"));
        assert!(!args.follow_links);
        assert!(!args.trace);
        assert!(!args.silent);
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::from_iter_safe(&["jndicheck-rs", "scan", "-d", "lib", "-f", "-s"]).unwrap();
        let Command::Scan(args) = cli.command;
        assert_eq!(args.dir, PathBuf::from("lib"));
        assert!(args.follow_links);
        assert!(args.silent);
    }

    #[test]
    fn dir_is_required() {
        assert!(Cli::from_iter_safe(&["jndicheck-rs", "scan"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::from_iter_safe(&["jndicheck-rs", "--dir", "lib"]).is_err());
    }
}
