use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Appends `value` as one compact JSON line, flushing before returning.
///
/// Deliberately synchronous: a single call has no internal `.await` point, which is what gives
/// the store's single-writer discipline its teeth without needing an async lock held across a
/// suspension point.
pub fn write_line(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Lazily streams the JSON values stored one-per-line in `path`, skipping blank lines.
pub fn read_lines(path: &Path) -> Result<impl Iterator<Item = Result<Value>>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);

    Ok(reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(Into::into)),
        Err(why) => Some(Err(why.into())),
    }))
}

/// Counts the non-blank lines in `path`, or `0` if the file does not exist.
pub fn count_lines(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut count = 0;
    for line in reader.lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }

    Ok(count)
}
