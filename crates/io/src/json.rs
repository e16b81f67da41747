// JSON-lines export of eligible cases

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fosa_engine::OutputRecord;

use crate::error::IoError;

/// One `{"aftale", "bilagsnummer", "fp"}` object per line, in record order.
pub fn to_json_lines(records: &[OutputRecord]) -> String {
    let mut out = String::new();
    for record in records {
        // OutputRecord holds only strings, so serialization cannot fail
        if let Ok(line) = serde_json::to_string(record) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

pub fn write_json_lines(path: &Path, records: &[OutputRecord]) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(to_json_lines(records).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| IoError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_lines_layout() {
        let records = vec![OutputRecord::new("A1", "D1", "P1"), OutputRecord::new("A2", "D2", "P2")];
        assert_eq!(
            to_json_lines(&records),
            "{\"aftale\":\"A1\",\"bilagsnummer\":\"D1\",\"fp\":\"P1\"}\n\
             {\"aftale\":\"A2\",\"bilagsnummer\":\"D2\",\"fp\":\"P2\"}\n"
        );
        assert_eq!(to_json_lines(&[]), "");
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queue.jsonl");
        let records = vec![OutputRecord::new("Æ1", "D1", "P1")];
        write_json_lines(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let back: OutputRecord = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(back, records[0]);
    }
}
