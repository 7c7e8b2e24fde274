//! Minimal CSV reading for the dataset exports.
//!
//! Handles RFC-4180 quoting: quoted fields may contain commas, doubled
//! quotes, and line breaks. The first record is treated as the header row.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub struct CsvReader<R: BufRead> {
    reader: R,
    headers: Vec<String>,
}

impl CsvReader<BufReader<File>> {
    /// Open a CSV file and consume its header row.
    pub fn open(path: &Path) -> io::Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: BufRead> CsvReader<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let headers = read_record(&mut reader)?.unwrap_or_default();
        Ok(Self { reader, headers })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of a named column in the header row.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Next data record, or `None` at end of input.
    pub fn next_record(&mut self) -> io::Result<Option<Vec<String>>> {
        read_record(&mut self.reader)
    }
}

fn read_record<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<String>>> {
    let mut raw = String::new();
    if reader.read_line(&mut raw)? == 0 {
        return Ok(None);
    }

    // An odd number of quote characters means a quoted field continues past
    // the line break; keep reading until it closes or the input ends.
    while raw.matches('"').count() % 2 == 1 {
        if reader.read_line(&mut raw)? == 0 {
            break;
        }
    }

    Ok(Some(parse_record(raw.trim_end_matches(['\r', '\n']))))
}

fn parse_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
