/// TOLERANT CSV READER
///
/// Reads sensor exports that are frequently imperfect: quoted fields,
/// blank or garbage numeric cells and rows with the wrong number of fields.
///
/// Rules:
/// - rows whose field count differs from the header are dropped
/// - every line is parsed on its own; a broken quote only loses its own row
/// - empty, `n/a`, `NaN` and non-finite cells (`inf`, `1e999`) become zero
/// - anything else that parses as a number is numeric, otherwise text
/// - empty or header-only input yields an empty table, never an error
use std::collections::HashMap;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;

use crate::config::{MomentumColumns, RotationColumns};
use crate::types::{MomentumSample, RotationSample, SegmentMomentum};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn parse(raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
            return CellValue::Number(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if !value.is_finite() => CellValue::Number(0.0),
            Ok(value) => CellValue::Number(value),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the cell; text reads as zero.
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(value) => *value,
            CellValue::Text(_) => 0.0,
        }
    }

    /// Identifier view of the cell, integers rendered without a fraction.
    pub fn as_key(&self) -> String {
        match self {
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            CellValue::Number(value) => value.to_string(),
            CellValue::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl CsvTable {
    pub fn parse(text: &str) -> CsvTable {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let headers: Vec<String> = match lines.next().and_then(parse_line) {
            Some(record) => record.iter().map(|h| h.to_string()).collect(),
            None => return CsvTable::default(),
        };
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return CsvTable::default();
        }

        // each line is read on its own so a stray quote cannot swallow the
        // rows that follow it
        let mut rows = Vec::new();
        let mut dropped = 0;
        for line in lines {
            match parse_line(line) {
                Some(record) if record.len() == headers.len() => {
                    rows.push(record.iter().map(CellValue::parse).collect());
                }
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!("Dropped {} malformed rows out of {}", dropped, rows.len() + dropped);
        }

        let column_index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        CsvTable { column_index, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = *self.column_index.get(column)?;
        self.rows.get(row)?.get(col)
    }

    /// Numeric cell value; missing columns read as zero.
    pub fn number(&self, row: usize, column: &str) -> f64 {
        self.cell(row, column).map(CellValue::as_number).unwrap_or(0.0)
    }

    pub fn key(&self, row: usize, column: &str) -> String {
        self.cell(row, column).map(CellValue::as_key).unwrap_or_default()
    }
}

pub fn read_momentum_samples(text: &str, columns: &MomentumColumns) -> Vec<MomentumSample> {
    let table = CsvTable::parse(text);

    let projected: Vec<Option<String>> = (0..3)
        .map(|i| Some(columns.projected(i)).filter(|name| table.has_column(name)))
        .collect();
    let components: Vec<[String; 3]> = (0..3).map(|i| columns.components(i)).collect();

    (0..table.len())
        .map(|row| {
            let segments = [0, 1, 2].map(|i| match &projected[i] {
                Some(name) => SegmentMomentum::Projected(table.number(row, name)),
                None => SegmentMomentum::Components([
                    table.number(row, &components[i][0]),
                    table.number(row, &components[i][1]),
                    table.number(row, &components[i][2]),
                ]),
            });

            MomentumSample {
                time: table.number(row, &columns.time),
                movement_id: table.key(row, &columns.movement_id),
                segments,
                total_kinetic_energy: table.number(row, &columns.total_kinetic_energy),
                center_of_mass: [
                    table.number(row, &columns.center_of_mass[0]),
                    table.number(row, &columns.center_of_mass[1]),
                    table.number(row, &columns.center_of_mass[2]),
                ],
            }
        })
        .collect()
}

pub fn read_rotation_samples(text: &str, columns: &RotationColumns) -> Vec<RotationSample> {
    let table = CsvTable::parse(text);
    (0..table.len())
        .map(|row| RotationSample {
            time: table.number(row, &columns.time),
            movement_id: table.key(row, &columns.movement_id),
            pelvis_rotation: table.number(row, &columns.pelvis_rotation),
            torso_rotation: table.number(row, &columns.torso_rotation),
        })
        .collect()
}

fn parse_line(line: &str) -> Option<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    match reader.records().next()? {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("Skipping unreadable CSV row: {}", e);
            None
        }
    }
}

/// Group samples by movement identifier in order of first appearance.
pub fn group_by_movement<T, F>(samples: Vec<T>, movement_id: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> &str,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for sample in samples {
        let id = movement_id(&sample).to_string();
        match positions.get(&id) {
            Some(&pos) => groups[pos].1.push(sample),
            None => {
                positions.insert(id.clone(), groups.len());
                groups.push((id, vec![sample]));
            }
        }
    }

    groups
}
