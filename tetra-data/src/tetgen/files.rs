//! Readers for TetGen's `.node`, `.ele` and `.face` output files.
//!
//! All three share one layout: a header row with the record count, then one
//! row per record starting with the record's own index. `#` starts a comment.

use crate::error::{DataError, DataResult};
use glam::DVec3;

struct Table<'a> {
    file: &'a str,
    rows: Vec<(usize, Vec<&'a str>)>,
}

impl<'a> Table<'a> {
    fn new(file: &'a str, text: &'a str) -> Self {
        let rows = text
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let content = line.split('#').next().unwrap_or("");
                let tokens: Vec<&str> = content.split_whitespace().collect();
                (!tokens.is_empty()).then_some((i + 1, tokens))
            })
            .collect();
        Self { file, rows }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> DataError {
        DataError::EngineOutput {
            file: self.file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Header row fields plus the record rows it announces.
    fn split(&self, min_header: usize) -> DataResult<(Vec<usize>, &[(usize, Vec<&'a str>)])> {
        let Some((line, header)) = self.rows.first() else {
            return Err(self.error(1, "file is empty"));
        };
        if header.len() < min_header {
            return Err(self.error(
                *line,
                format!("header needs {} fields, found {}", min_header, header.len()),
            ));
        }
        let fields = header
            .iter()
            .map(|t| t.parse::<usize>().map_err(|_| self.error(*line, format!("bad header field '{}'", t))))
            .collect::<DataResult<Vec<_>>>()?;

        let count = fields[0];
        let records = &self.rows[1..];
        if records.len() < count {
            let last = records.last().map_or(*line, |(l, _)| *l);
            return Err(self.error(
                last,
                format!("header announces {} records, found {}", count, records.len()),
            ));
        }
        Ok((fields, &records[..count]))
    }

    fn field<T: std::str::FromStr>(&self, line: usize, tokens: &[&str], at: usize) -> DataResult<T> {
        let token = tokens
            .get(at)
            .ok_or_else(|| self.error(line, format!("missing column {}", at + 1)))?;
        token
            .parse()
            .map_err(|_| self.error(line, format!("cannot parse '{}'", token)))
    }

    fn index(&self, line: usize, tokens: &[&str], at: usize, base: i64) -> DataResult<usize> {
        let raw: i64 = self.field(line, tokens, at)?;
        usize::try_from(raw - base)
            .map_err(|_| self.error(line, format!("index {} is below the first index {}", raw, base)))
    }
}

/// Parse a `.node` file into points and the index of its first record.
pub(crate) fn parse_nodes(file: &str, text: &str) -> DataResult<(Vec<DVec3>, i64)> {
    let table = Table::new(file, text);
    let (header, records) = table.split(2)?;
    if header[1] != 3 {
        let line = table.rows[0].0;
        return Err(table.error(line, format!("expected 3 dimensions, found {}", header[1])));
    }

    let mut base = 0;
    let mut points = Vec::with_capacity(records.len());
    for (i, (line, tokens)) in records.iter().enumerate() {
        let index: i64 = table.field(*line, tokens, 0)?;
        if i == 0 {
            base = index;
        }
        points.push(DVec3::new(
            table.field(*line, tokens, 1)?,
            table.field(*line, tokens, 2)?,
            table.field(*line, tokens, 3)?,
        ));
    }
    Ok((points, base))
}

/// Parse a `.ele` file. Second-order elements keep only their corner nodes.
pub(crate) fn parse_elements(file: &str, text: &str, base: i64) -> DataResult<Vec<[usize; 4]>> {
    let table = Table::new(file, text);
    let (header, records) = table.split(2)?;
    if header[1] != 4 && header[1] != 10 {
        let line = table.rows[0].0;
        return Err(table.error(line, format!("expected 4 or 10 nodes per tetrahedron, found {}", header[1])));
    }

    records
        .iter()
        .map(|(line, tokens)| {
            Ok([
                table.index(*line, tokens, 1, base)?,
                table.index(*line, tokens, 2, base)?,
                table.index(*line, tokens, 3, base)?,
                table.index(*line, tokens, 4, base)?,
            ])
        })
        .collect()
}

/// Parse a `.face` file of boundary triangles.
pub(crate) fn parse_faces(file: &str, text: &str, base: i64) -> DataResult<Vec<[usize; 3]>> {
    let table = Table::new(file, text);
    let (_, records) = table.split(1)?;

    records
        .iter()
        .map(|(line, tokens)| {
            Ok([
                table.index(*line, tokens, 1, base)?,
                table.index(*line, tokens, 2, base)?,
                table.index(*line, tokens, 3, base)?,
            ])
        })
        .collect()
}
