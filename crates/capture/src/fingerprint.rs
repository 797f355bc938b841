// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic invocation + stdin digest.
//!
//! The digest is SHA-256 over the invocation text, a newline, then every
//! stdin byte in order. Stdin is hashed incrementally so its size never
//! bounds memory.

use crate::invocation::Invocation;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read, Write};

/// 256-bit digest identifying one invocation + stdin pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form used as the storage key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.to_hex()
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

/// Incremental fingerprint state.
///
/// Seeded with the invocation line, then fed stdin chunks through its
/// [`Write`] impl so it can sit behind a tee like any other sink.
#[derive(Clone)]
pub struct Fingerprinter {
    hasher: Sha256,
    stdin_bytes: u64,
}

impl Fingerprinter {
    pub fn new(invocation: &Invocation) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(invocation.text().as_bytes());
        hasher.update(b"\n");
        Self {
            hasher,
            stdin_bytes: 0,
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.stdin_bytes += chunk.len() as u64;
    }

    /// Number of stdin bytes hashed so far.
    pub fn stdin_bytes(&self) -> u64 {
        self.stdin_bytes
    }

    pub fn finish(self) -> Fingerprint {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.hasher.finalize());
        Fingerprint(bytes)
    }
}

impl Write for Fingerprinter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One-shot fingerprint computation over a blocking reader.
pub struct FingerprintComputer;

impl FingerprintComputer {
    /// Hash `invocation` and everything `stdin` yields.
    ///
    /// Hashing itself is total; the only error is a failing reader.
    pub fn compute<R: Read>(invocation: &Invocation, mut stdin: R) -> io::Result<Fingerprint> {
        let mut fp = Fingerprinter::new(invocation);
        io::copy(&mut stdin, &mut fp)?;
        Ok(fp.finish())
    }

    /// Hash an in-memory stdin.
    pub fn compute_bytes(invocation: &Invocation, stdin: &[u8]) -> Fingerprint {
        let mut fp = Fingerprinter::new(invocation);
        fp.update(stdin);
        fp.finish()
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
