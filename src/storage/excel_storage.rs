use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::storage::csv_storage::CSV_HEADER;
use crate::storage::file_storage::{FileFormat, FileStorage};

const SHEET_NAME: &str = "Vacancies";

/// First worksheet of an `.xlsx` workbook, one row per vacancy under a
/// header row naming the fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelFormat;

pub type ExcelStorage = FileStorage<ExcelFormat>;

impl FileFormat for ExcelFormat {
    const NAME: &'static str = "xlsx";

    fn decode(bytes: &[u8]) -> Result<Vec<Vacancy>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| Error::Corrupt(format!("not an xlsx workbook: {}", e)))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Corrupt("workbook has no worksheets".to_string()))?
            .map_err(|e| Error::Corrupt(e.to_string()))?;

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(cells) => cells
                .iter()
                .map(|cell| match cell {
                    Data::String(name) => name.trim().to_string(),
                    _ => String::new(),
                })
                .collect(),
            None => return Ok(Vec::new()),
        };

        rows.filter(|cells| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|cells| {
                let record: Map<String, JsonValue> = header
                    .iter()
                    .zip(cells)
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, cell)| (name.clone(), cell_to_json(name, cell)))
                    .collect();
                Vacancy::from_value(JsonValue::Object(record))
            })
            .collect()
    }

    fn encode(vacancies: &[Vacancy]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        for (col, name) in CSV_HEADER.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
        }

        for (i, vacancy) in vacancies.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_number(row, 0, vacancy.id as f64)?;
            worksheet.write_string(row, 1, &vacancy.title)?;
            worksheet.write_string(row, 2, &vacancy.company)?;
            worksheet.write_string(row, 3, &vacancy.description)?;
            worksheet.write_number(row, 4, vacancy.salary_from.to_f64().unwrap_or_default())?;
            worksheet.write_number(row, 5, vacancy.salary_to.to_f64().unwrap_or_default())?;
            worksheet.write_string(row, 6, &vacancy.currency)?;
            worksheet.write_string(row, 7, &vacancy.area)?;
            worksheet.write_string(row, 8, &vacancy.url)?;
        }

        worksheet.set_column_width(1, 40)?;
        worksheet.set_column_width(2, 30)?;
        worksheet.set_column_width(3, 60)?;
        worksheet.set_column_width(8, 40)?;

        Ok(workbook.save_to_buffer()?)
    }
}

/// Columns read back as numbers; a blank cell anywhere else is an empty
/// string, not a missing value.
const NUMERIC_COLUMNS: [&str; 3] = ["id", "salary_from", "salary_to"];

/// Spreadsheets store every number as a float, so whole floats come back
/// as integers for the id column to validate.
fn cell_to_json(column: &str, cell: &Data) -> JsonValue {
    match cell {
        Data::Empty if !NUMERIC_COLUMNS.contains(&column) => JsonValue::from(""),
        Data::Int(value) => JsonValue::from(*value),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
            JsonValue::from(*value as i64)
        }
        Data::Float(value) => JsonValue::from(*value),
        Data::String(value) => JsonValue::from(value.as_str()),
        Data::Bool(value) => JsonValue::from(*value),
        _ => JsonValue::Null,
    }
}
