//! Fallible buffer allocation

use crate::error::{Error, Result};

/// Allocate `len` bytes filled with `value`.
///
/// Reports [`Error::Allocation`] instead of aborting the process when the
/// allocator cannot satisfy the request.
pub fn try_filled(len: usize, value: u8) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { bytes: len })?;
    data.resize(len, value);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_filled() {
        let data = try_filled(16, 7).unwrap();
        assert_eq!(data.len(), 16);
        assert!(data.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_try_filled_overflow() {
        let err = try_filled(usize::MAX, 0).unwrap_err();
        assert!(matches!(err, Error::Allocation { bytes } if bytes == usize::MAX));
    }
}
