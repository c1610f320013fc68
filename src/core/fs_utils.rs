//! File system utility helpers (BOM-aware readers, etc.)
use std::fs;
use std::path::Path;

/// Reads a source file as UTF-8 text.
///
/// UTF-16 files (by BOM) are decoded, a UTF-8 BOM is stripped, and invalid UTF-8
/// falls back to Windows-1251 with a warning.
pub fn read_source_file(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_source(&bytes))
}

pub fn decode_source(bytes: &[u8]) -> String {
    let content = match bytes {
        [0xFF, 0xFE, ..] => decode_with(encoding_rs::UTF_16LE, bytes),
        [0xFE, 0xFF, ..] => decode_with(encoding_rs::UTF_16BE, bytes),
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => {
                tracing::debug!("UTF-8 decoding failed, trying Windows-1251");
                decode_with(encoding_rs::WINDOWS_1251, bytes)
            }
        },
    };
    match content.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => content,
    }
}

fn decode_with(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> String {
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Errors detected while decoding {} file", encoding.name());
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFclass A { }";
        assert_eq!(decode_source(bytes), "class A { }");
    }

    #[test]
    fn decodes_utf16le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "int x;".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_source(&bytes), "int x;");
    }
}
