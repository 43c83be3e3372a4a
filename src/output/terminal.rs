//! Human-readable terminal output.

use colored::Colorize;

use super::OutputSink;
use crate::result::ResultRecord;

/// Reference sink: renders each record to standard output.
///
/// Raw integer microjoules are printed as-is; once confidence fields are
/// populated the energies switch to joules with a ± half-width. Domain
/// sections are omitted entirely when their series is absent.
#[derive(Debug, Default)]
pub struct PrintSink {
    raw: bool,
}

impl PrintSink {
    /// Create the default, formatted sink.
    pub fn new() -> Self {
        Self { raw: false }
    }

    /// Create a sink that prints the record's debug representation
    /// instead of the formatted layout.
    pub fn raw() -> Self {
        Self { raw: true }
    }
}

impl OutputSink for PrintSink {
    fn add(&mut self, record: &ResultRecord) {
        if self.raw {
            println!("{:?}", record);
        } else {
            println!("{}", format_record(record));
        }
    }
}

/// Format one record for human-readable terminal output.
pub fn format_record(record: &ResultRecord) -> String {
    let sep = "-".repeat(31);
    let mut out = String::new();

    out.push_str(&format!("Label : {}\n", record.label.bold()));
    out.push_str(&format!("Begin : {:.6} (unix epoch, s)\n", record.timestamp));
    match record.duration_conf {
        Some(conf) => out.push_str(&format!(
            "Duration : {:.4e} s (± {:.4e})\n",
            record.duration, conf
        )),
        None => out.push_str(&format!("Duration : {:.4e} s\n", record.duration)),
    }

    if let Some(pkg) = &record.pkg {
        out.push_str(&sep);
        out.push_str(&format!("\n{} :\n", "PKG".bold()));
        out.push_str(&energy_lines(pkg, record.pkg_conf.as_deref()));
    }
    if let Some(dram) = &record.dram {
        out.push_str(&sep);
        out.push_str(&format!("\n{} :\n", "DRAM".bold()));
        out.push_str(&energy_lines(dram, record.dram_conf.as_deref()));
        out.push_str(&sep);
        out.push('\n');
    }

    out
}

/// One line per socket: µJ when raw, J ± width when confidence is known.
fn energy_lines(series: &[f64], conf: Option<&[f64]>) -> String {
    let mut out = String::new();
    for (i, &uj) in series.iter().enumerate() {
        match conf.and_then(|c| c.get(i)) {
            Some(&half_width) => out.push_str(&format!(
                "\tsocket {} : {:.6e} J (± {:.4e})\n",
                i,
                uj / 1e6,
                half_width / 1e6
            )),
            None => out.push_str(&format!("\tsocket {} : {:.0} uJ\n", i, uj)),
        }
    }
    out
}
