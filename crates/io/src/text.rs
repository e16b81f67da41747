// Text decoding for exports produced on Windows hosts

use std::path::Path;

use crate::error::IoError;

/// Read a file as text, falling back to Windows-1252 when it is not UTF-8.
pub fn read_text(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::read(path, e))?;
    Ok(decode(bytes))
}

/// Decode bytes as UTF-8, or as Windows-1252 if that fails.
pub fn decode(bytes: Vec<u8>) -> String {
    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
