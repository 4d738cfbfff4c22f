#![warn(missing_docs)]

use crate::log4shell_scanner::ScanReport;
use std::io::{self, Write};

/// Banner printed before the results
const BANNER: &str = "************************* Results of scan *************************";

/// Writes the results of a scan.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "Scan took: {:?}", report.elapsed)?;
    writeln!(
        out,
        "Visited {} entries, inspected {} archives",
        report.visited, report.archives
    )?;

    if report.interrupted {
        writeln!(out, "Scan stopped early, results are incomplete")?;
    }

    if report.vulnerable.is_empty() {
        writeln!(out, "No JndiLookup.class found in {}", report.root.display())?;
    } else {
        writeln!(out)?;
        for path in &report.vulnerable {
            writeln!(out, "{}", path.display())?;
        }
    }

    Ok(())
}

/// Prints the results of a scan on the standard output.
pub fn print_report(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report)?;
    out.flush()
}
