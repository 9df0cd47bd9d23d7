use terrane_core::addressing::is_unreasonable_local;

use crate::error::PersistError;
use crate::format::{build_header, HEADER_SIZE};

/// Validate the dimension header of a chunk save.
///
/// A mismatch means the save was written by a build with different chunk
/// dimensions; callers treat it as a corrupt save and regenerate.
pub fn validate_header(bytes: &[u8]) -> Result<(), PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::FileTooSmall(bytes.len(), HEADER_SIZE));
    }

    let expected = build_header();
    let actual = [bytes[0], bytes[1], bytes[2]];
    if actual != expected {
        if header_exceeds_dimensions(actual) {
            log::warn!("chunk save header {actual:?} is larger than this build's {expected:?}");
        }
        return Err(PersistError::DimensionMismatch { expected, actual });
    }

    Ok(())
}

/// Whether a header describes chunks larger than this build's along any axis.
fn header_exceeds_dimensions(header: [u8; 3]) -> bool {
    is_unreasonable_local(header[0] as u32, header[1] as u32, header[2] as u32)
}
