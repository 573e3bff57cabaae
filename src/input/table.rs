use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Comma for `.csv`/`.csv.gz`, tab otherwise.
pub fn delimiter_for(path: &Path) -> char {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".csv") { ',' } else { '\t' }
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub line_no: usize,
    pub fields: Vec<String>,
}

/// Header plus raw rows of a delimited file.
#[derive(Debug, Clone)]
pub struct DelimitedTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl DelimitedTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn require_column(&self, name: &str) -> Result<usize, InputError> {
        self.column(name)
            .ok_or_else(|| InputError::MissingColumn(name.to_string()))
    }
}

pub fn read_table(path: &Path) -> Result<DelimitedTable, InputError> {
    let delimiter = delimiter_for(path);
    let mut reader = open_maybe_gz(path)?;
    parse_table(&mut reader, delimiter)
}

pub fn parse_table(reader: &mut dyn BufRead, delimiter: char) -> Result<DelimitedTable, InputError> {
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse {
            line: 1,
            message: "file is empty".to_string(),
        });
    }
    let columns: Vec<String> = split_fields(buf.trim_end(), delimiter);
    if columns.iter().all(|c| c.is_empty()) {
        return Err(InputError::Parse {
            line: 1,
            message: "header is empty".to_string(),
        });
    }

    let mut rows = Vec::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line, delimiter);
        if fields.len() != columns.len() {
            return Err(InputError::Parse {
                line: line_no,
                message: format!(
                    "expected {} fields, found {}",
                    columns.len(),
                    fields.len()
                ),
            });
        }
        rows.push(TableRow { line_no, fields });
    }

    Ok(DelimitedTable { columns, rows })
}

fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect()
}

/// Parses a numeric cell; empty, `NA` and `NaN` become NaN.
pub fn parse_value(raw: &str, line: usize, column: &str) -> Result<f64, InputError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") || raw.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>().map_err(|_| InputError::Parse {
        line,
        message: format!("invalid {column} value '{raw}'"),
    })
}
