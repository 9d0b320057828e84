/*
 * Turns raw document bytes into text for matching.
 *
 * Encoding policy: a UTF-8 or UTF-16 byte order mark wins; otherwise content
 * that is valid UTF-8 is taken as UTF-8; anything else is decoded with the
 * configured fallback encoding. Decoding never fails, malformed sequences
 * become U+FFFD.
 */
use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::io;
use std::path::Path;

/*
 * Maps an encoding label such as "windows-1252" or "utf-16le" to an encoding.
 * Unknown labels fall back to UTF-8 with a warning.
 */
pub fn resolve_encoding(label: &str) -> &'static Encoding {
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) => encoding,
        None => {
            log::warn!("TextDecoding: Unknown encoding label '{label}', using UTF-8.");
            UTF_8
        }
    }
}

pub fn decode_text(bytes: &[u8], fallback: &'static Encoding) -> String {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, had_errors) = fallback.decode_without_bom_handling(bytes);
            if had_errors {
                log::trace!(
                    "TextDecoding: Malformed sequences replaced while decoding as {}.",
                    fallback.name()
                );
            }
            text.into_owned()
        }
    }
}

/*
 * Reads a whole document and decodes it. Only the read can fail.
 */
pub fn read_document_text(path: &Path, fallback: &'static Encoding) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_text(&bytes, fallback))
}
