//! Opening-brace tally for JSON-like vertex dumps.
//!
//! This is a character count, not a parser: every `{` byte is counted no
//! matter where it appears (strings, comments, malformed input).

use crate::error::{DataError, DataResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Count `{` bytes in `reader`, reading line by line until EOF.
pub fn count_braces<R: BufRead>(mut reader: R) -> std::io::Result<usize> {
    let mut line = Vec::new();
    let mut count = 0;
    let mut lines = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        lines += 1;
        count += line.iter().filter(|&&b| b == b'{').count();
    }

    debug!("Counted {} braces over {} lines", count, lines);
    Ok(count)
}

/// Open `path` and count its `{` bytes.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn count_braces_in_file(path: impl AsRef<Path>) -> DataResult<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::open(path, e))?;
    Ok(count_braces(BufReader::new(file))?)
}
