//! BLAKE3 hashing utilities for store keys and payload digests

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, file_read_failed};

/// Hash prefix for BLAKE3 payload digests
pub const HASH_PREFIX: &str = "blake3:";

/// Number of hex characters of the vendor digest used in a store key
pub const KEY_HASH_LEN: usize = 16;

/// Short hex digest of a string, used for filesystem-safe identifiers
pub fn short_hex(value: &str) -> String {
    let digest = blake3::hash(value.as_bytes()).to_hex();
    digest.as_str()[..KEY_HASH_LEN].to_string()
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let read_error =
        |e: std::io::Error| file_read_failed(path.display().to_string(), e.to_string());
    let file = File::open(path).map_err(read_error)?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(read_error)?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppstowError;
    use tempfile::TempDir;

    #[test]
    fn test_hash_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("game.jar");
        std::fs::write(&file_path, "payload").unwrap();

        let hash = hash_file(&file_path).unwrap();
        assert!(hash.starts_with(HASH_PREFIX));
        assert_eq!(hash, hash_file(&file_path).unwrap());
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/game.jar"));
        assert!(matches!(result, Err(AppstowError::FileReadFailed { .. })));
    }

    #[test]
    fn test_short_hex() {
        let a = short_hex("Acme");
        assert_eq!(a.len(), KEY_HASH_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, short_hex("Acme"));
        assert_ne!(a, short_hex("Other"));
    }
}
