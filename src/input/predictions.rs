use std::path::Path;

use crate::input::InputError;
use crate::input::observations::DEFAULT_LOCATION;
use crate::input::table::{DelimitedTable, parse_value, read_table};
use crate::model::records::{PredictionKind, PredictionRecord};

pub fn load_predictions(path: &Path) -> Result<Vec<PredictionRecord>, InputError> {
    let table = read_table(path)?;
    let default_model = model_name_from_path(path);
    let records = predictions_from_table(&table, &default_model)?;
    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        model = %default_model,
        "loaded predictions"
    );
    Ok(records)
}

/// File name without `.gz` and `.csv`/`.tsv` suffixes.
pub fn model_name_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let name = name
        .strip_suffix(".csv")
        .or_else(|| name.strip_suffix(".tsv"))
        .unwrap_or(name);
    name.to_string()
}

pub fn predictions_from_table(
    table: &DelimitedTable,
    default_model: &str,
) -> Result<Vec<PredictionRecord>, InputError> {
    let date_col = match table.column("target_end_date") {
        Some(idx) => idx,
        None => table.require_column("date")?,
    };
    let value_col = table.require_column("value")?;
    let quantile_col = table.require_column("quantile")?;
    let type_col = table.column("type");
    let model_col = table.column("model");
    let location_col = table.column("location");
    let horizon_col = table.column("horizon");

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let line = row.line_no;
        let is_point = match type_col.map(|idx| row.fields[idx].to_ascii_lowercase()) {
            None => false,
            Some(t) if t == "quantile" => false,
            Some(t) if t == "point" => true,
            Some(t) => {
                return Err(InputError::Parse {
                    line,
                    message: format!("unknown prediction type '{t}'"),
                });
            }
        };
        let kind = if is_point {
            PredictionKind::Point
        } else {
            let q = parse_value(&row.fields[quantile_col], line, "quantile")?;
            if !(q > 0.0 && q < 1.0) {
                return Err(InputError::Parse {
                    line,
                    message: format!("quantile {q} must lie strictly between 0 and 1"),
                });
            }
            PredictionKind::Quantile(q)
        };
        let horizon = match horizon_col.map(|idx| row.fields[idx].as_str()) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| InputError::Parse {
                line,
                message: format!("invalid horizon '{raw}'"),
            })?),
        };

        out.push(PredictionRecord {
            model: model_col
                .map(|idx| row.fields[idx].clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| default_model.to_string()),
            location: location_col
                .map(|idx| row.fields[idx].clone())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            target_end_date: row.fields[date_col].clone(),
            horizon,
            kind,
            value: parse_value(&row.fields[value_col], line, "value")?,
        });
    }

    if out.is_empty() {
        return Err(InputError::Empty("predictions"));
    }
    Ok(out)
}
