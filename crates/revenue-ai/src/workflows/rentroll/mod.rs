//! Rent-roll ingestion boundary. Loosely-typed vendor spreadsheets are
//! normalized into strongly-typed [`UnitState`] records here; all the
//! validation and defaulting lives at this edge so the pricing engine never
//! sees a raw cell.

mod mapping;
mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::workflows::pricing::UnitState;
use normalizer::{clean_money, normalize_token};

#[derive(Debug, thiserror::Error)]
pub enum RentRollImportError {
    #[error("failed to read rent roll: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rent-roll CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown unit status '{value}'")]
    UnknownStatus { row: usize, value: String },
    #[error("row {row}: could not parse rent '{value}'")]
    InvalidRent { row: usize, value: String },
    #[error("row {row}: could not parse date '{value}'")]
    InvalidDate { row: usize, value: String },
}

pub struct RentRollImporter;

impl RentRollImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        as_of: NaiveDate,
    ) -> Result<Vec<UnitState>, RentRollImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, as_of)
    }

    /// Parse a rent roll, rejecting rows this pipeline cannot price safely.
    /// `as_of` anchors the vacant-day computation.
    pub fn from_reader<R: Read>(
        reader: R,
        as_of: NaiveDate,
    ) -> Result<Vec<UnitState>, RentRollImportError> {
        let mut units = Vec::new();

        // Row numbers are 1-based and count the header line, matching what a
        // spreadsheet shows the person fixing the export.
        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let row_number = index + 2;

            let status = mapping::status_for_normalized(&normalize_token(&row.status))
                .ok_or_else(|| RentRollImportError::UnknownStatus {
                    row: row_number,
                    value: row.status.clone(),
                })?;

            let current_rent = match row.rent.as_deref() {
                Some(raw) => {
                    clean_money(raw).ok_or_else(|| RentRollImportError::InvalidRent {
                        row: row_number,
                        value: raw.to_string(),
                    })?
                }
                None => 0.0,
            };

            let amenity_adjustment = match row.amenity_adjustment.as_deref() {
                Some(raw) => {
                    clean_money(raw).ok_or_else(|| RentRollImportError::InvalidRent {
                        row: row_number,
                        value: raw.to_string(),
                    })?
                }
                None => 0.0,
            };

            let move_out = parse_optional_date(row.move_out.as_deref(), row_number)?;
            let available_on = parse_optional_date(row.available_on.as_deref(), row_number)?;
            let vacant_since = parse_optional_date(row.vacant_since.as_deref(), row_number)?;

            let vacant_days = vacant_since
                .map(|since| (as_of - since).num_days().max(0) as u32)
                .unwrap_or(0);

            let floorplan_label = row
                .floorplan_label
                .unwrap_or_else(|| row.floorplan.clone());

            units.push(UnitState {
                unit_id: row.unit,
                floorplan: row.floorplan,
                floorplan_label,
                status,
                current_rent,
                vacant_days,
                amenity_adjustment,
                move_out,
                available_on,
            });
        }

        Ok(units)
    }
}

fn parse_optional_date(
    value: Option<&str>,
    row_number: usize,
) -> Result<Option<NaiveDate>, RentRollImportError> {
    match value {
        None => Ok(None),
        Some(raw) => parser::parse_date(raw)
            .map(Some)
            .ok_or_else(|| RentRollImportError::InvalidDate {
                row: row_number,
                value: raw.to_string(),
            }),
    }
}
