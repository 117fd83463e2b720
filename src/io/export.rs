//! CSV export for episode step records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepRecord;

/// Column header for CSV step export.
///
/// `action_mw` holds the committed set-points joined by `;` in declaration
/// order, so the header is the same for every site.
const HEADER: &str = "step,settlement_period,action_mw,clipped,\
                       hgh_demand,lgh_demand,cooling_demand,electrical_demand,\
                       gas_price,import_price,export_price,\
                       generation_mw,gas_burnt,backup_heat,backup_cooling,\
                       import_mw,export_mw,gas_cost,import_cost,export_revenue,reward";

/// Exports step records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes step records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        let s = &r.settlement;
        let action = r
            .action
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(";");
        wtr.write_record(&[
            r.step.to_string(),
            r.settlement_period.to_string(),
            action,
            r.clipped.to_string(),
            format!("{:.4}", r.hgh_demand),
            format!("{:.4}", r.lgh_demand),
            format!("{:.4}", r.cooling_demand),
            format!("{:.4}", r.electrical_demand),
            format!("{:.4}", r.gas_price),
            format!("{:.4}", r.import_price),
            format!("{:.4}", r.export_price),
            format!("{:.4}", s.generation.power_output),
            format!("{:.4}", s.total_gas),
            format!("{:.4}", s.backup_heat),
            format!("{:.4}", s.backup_cooling),
            format!("{:.4}", s.import),
            format!("{:.4}", s.export),
            format!("{:.4}", s.gas_cost),
            format!("{:.4}", s.import_cost),
            format!("{:.4}", s.export_revenue),
            format!("{:.4}", s.reward),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
