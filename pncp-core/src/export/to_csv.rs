use csv::Writer;

use super::RecordSet;
use crate::errors::{PncpError, PncpResult};

pub fn render(records: &RecordSet) -> PncpResult<Vec<u8>> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record(&records.columns)?;

    for row in &records.rows {
        wtr.write_record(records.cells(row).map(|cell| cell.as_text()))?;
    }

    wtr.into_inner()
        .map_err(|e| PncpError::Export(e.to_string()))
}
