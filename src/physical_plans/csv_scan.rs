use std::any::Any;
use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use csv_core::{Reader, ReaderBuilder};

use crate::{
    data_types::DataType,
    row::{Datum, Row},
    sources::ColumnHandle,
    PlanError, PlanResult,
};

use super::PhysicalPlan;

const MAX_RECORD_BYTES: usize = 16384;
const MAX_RECORD_FIELDS: usize = 256;

/// Record-at-a-time reader over a csv split, feeding one line at a time
/// into the csv state machine. Quoted fields spanning lines are rejected.
pub struct CsvSplitReader {
    buf_reader: BufReader<File>,
    inputs_buf: String,
    outputs_buf: Vec<u8>,
    field_ends: Vec<usize>,
    csv_reader: Reader,
}

impl CsvSplitReader {
    pub fn open(path: &str) -> PlanResult<Self> {
        let csv_reader = ReaderBuilder::new().build();
        let f = File::open(path).map_err(|e| {
            PlanError::StorageEngine(format!("read csv file {path} failed: {e}"))
        })?;
        let buf_reader = BufReader::new(f);

        let inputs_buf = String::with_capacity(4096);
        let outputs_buf = [0; MAX_RECORD_BYTES].to_vec();
        let field_ends = [0; MAX_RECORD_FIELDS].to_vec();
        Ok(Self {
            buf_reader,
            inputs_buf,
            outputs_buf,
            field_ends,
            csv_reader,
        })
    }

    pub fn try_read_next(&mut self) -> PlanResult<Option<Vec<String>>> {
        // read_line will fail when encounter invalid UTF-8 bytes
        self.inputs_buf.clear();
        let num_read = self
            .buf_reader
            .read_line(&mut self.inputs_buf)
            .map_err(|e| PlanError::StorageEngine(format!("read csv file error: {e}")))?;
        // the last line of a file may come without a terminator; the csv
        // state machine needs one to close the record
        if num_read > 0 && !self.inputs_buf.ends_with('\n') {
            self.inputs_buf.push('\n');
        }
        let inputs = self.inputs_buf.as_bytes();
        let (result, _num_read, _num_write, num_fields) = self.csv_reader.read_record(
            inputs,
            self.outputs_buf.as_mut_slice(),
            self.field_ends.as_mut_slice(),
        );
        match result {
            csv_core::ReadRecordResult::InputEmpty => Err(PlanError::StorageEngine(
                "csv record spans multiple lines, which is not supported".to_owned(),
            )),
            csv_core::ReadRecordResult::OutputFull => Err(PlanError::StorageEngine(
                format!("csv record exceeded maximum buffer size: {MAX_RECORD_BYTES}"),
            )),
            csv_core::ReadRecordResult::OutputEndsFull => {
                Err(PlanError::StorageEngine(format!(
                    "csv record exceeded maximum supported num fields: {MAX_RECORD_FIELDS}"
                )))
            }
            csv_core::ReadRecordResult::Record => {
                let mut offset = 0;
                let record = (0..num_fields)
                    .map(|field_idx| {
                        let end = self.field_ends[field_idx];
                        // from_utf8_lossy will check the UTF-8 validity against the bytes
                        let v = String::from_utf8_lossy(&self.outputs_buf[offset..end]);
                        offset = end;
                        v.to_string()
                    })
                    .collect();
                Ok(Some(record))
            }
            csv_core::ReadRecordResult::End => Ok(None),
        }
    }
}

/// Leaf operator reading a csv file split, emitting one channel per
/// requested column in the requested order.
pub struct CsvScan {
    path: String,
    columns: Vec<ColumnHandle>,
    reader: Option<CsvSplitReader>,
}

impl CsvScan {
    pub fn new(path: String, columns: Vec<ColumnHandle>) -> Self {
        Self {
            path,
            columns,
            reader: None,
        }
    }

    fn parse_value(value: &str, column: &ColumnHandle) -> PlanResult<Datum> {
        if value.is_empty() && column.data_type != DataType::String {
            return Ok(Datum::Null);
        }
        match column.data_type {
            DataType::Int64 => value
                .parse::<i64>()
                .map(Datum::Int64)
                .map_err(|e| Self::parse_error(value, column, e.to_string())),
            DataType::Float64 => value
                .parse::<f64>()
                .map(Datum::Float64)
                .map_err(|e| Self::parse_error(value, column, e.to_string())),
            DataType::String => Ok(Datum::String(value.to_owned())),
            DataType::DateTime => Ok(Datum::DateTime(value.to_owned())),
            DataType::Boolean => Ok(Datum::Boolean(value.to_lowercase() == "true")),
            other => Err(PlanError::StorageEngine(format!(
                "cannot read csv field as {other}"
            ))),
        }
    }

    fn parse_error(value: &str, column: &ColumnHandle, cause: String) -> PlanError {
        PlanError::StorageEngine(format!(
            "csv field {value:?} does not parse as {} for column {}: {cause}",
            column.data_type, column.name
        ))
    }
}

impl PhysicalPlan for CsvScan {
    fn setup(&mut self) -> PlanResult<()> {
        let mut reader = CsvSplitReader::open(self.path.as_str())?;
        // skip header
        let _ = reader.try_read_next()?;
        self.reader = Some(reader);
        Ok(())
    }

    fn next(&mut self) -> PlanResult<Option<Row>> {
        let reader = self.reader.as_mut().ok_or_else(|| {
            PlanError::Unknown("csv scan pulled before setup".to_owned())
        })?;
        if let Some(record) = reader.try_read_next()? {
            let mut fields = Vec::with_capacity(self.columns.len());
            for column in &self.columns {
                let value = record.get(column.index).ok_or_else(|| {
                    PlanError::StorageEngine(format!(
                        "csv record has {} fields, column {} wants field {}",
                        record.len(),
                        column.name,
                        column.index
                    ))
                })?;
                fields.push(Self::parse_value(value, column)?);
            }
            Ok(Some(Row::new(fields)))
        } else {
            Ok(None)
        }
    }

    fn channel_count(&self) -> usize {
        self.columns.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
