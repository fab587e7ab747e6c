// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Random identifiers for users and sub-resources.

use anyhow::anyhow;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::AppError;

const ID_BYTES: usize = 10;

/// Fill a buffer from the system CSPRNG.
pub fn random_bytes(buf: &mut [u8]) -> Result<(), AppError> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| AppError::Internal(anyhow!("System RNG failure")))
}

/// New 20-character hex identifier.
pub fn new_id() -> Result<String, AppError> {
    let mut buf = [0u8; ID_BYTES];
    random_bytes(&mut buf)?;
    Ok(hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_shape() {
        let a = new_id().unwrap();
        let b = new_id().unwrap();
        assert_eq!(a.len(), ID_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
