use std::path::Path;

use crate::input::InputError;
use crate::input::table::{DelimitedTable, parse_value, read_table};
use crate::model::records::ObservationRecord;

/// Location used when the table has no `location` column.
pub const DEFAULT_LOCATION: &str = "all";

pub fn load_observations(path: &Path) -> Result<Vec<ObservationRecord>, InputError> {
    let table = read_table(path)?;
    let records = observations_from_table(&table)?;
    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        "loaded observations"
    );
    Ok(records)
}

pub fn observations_from_table(table: &DelimitedTable) -> Result<Vec<ObservationRecord>, InputError> {
    let date_col = table.require_column("date")?;
    let value_col = table.require_column("value")?;
    let location_col = table.column("location");

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let location = match location_col {
            Some(idx) => row.fields[idx].clone(),
            None => DEFAULT_LOCATION.to_string(),
        };
        out.push(ObservationRecord {
            location,
            date: row.fields[date_col].clone(),
            value: parse_value(&row.fields[value_col], row.line_no, "value")?,
        });
    }

    if out.is_empty() {
        return Err(InputError::Empty("observations"));
    }
    Ok(out)
}
