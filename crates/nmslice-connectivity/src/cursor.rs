// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read cursor over the shared parameter region

use byteorder::{ByteOrder, LittleEndian};
use nmslice_neural::Accum;

use crate::error::{ConnectivityError, Result};

/// Little-endian word reader that tracks how far the region has been consumed
///
/// The region itself is never mutated; each initialiser reads its fixed
/// prefix and leaves the cursor just past it.
#[derive(Debug, Clone)]
pub struct ParamCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ParamCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        if self.remaining() < needed {
            return Err(ConnectivityError::ParameterRegionExhausted {
                needed,
                remaining: self.remaining(),
            });
        }
        let bytes = self.bytes;
        let start = self.position;
        self.position += needed;
        Ok(&bytes[start..start + needed])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    /// One s16.15 word
    pub fn read_accum(&mut self) -> Result<Accum> {
        Ok(Accum::from_bits(self.read_i32()?))
    }

    /// `N` consecutive words
    pub fn read_words<const N: usize>(&mut self) -> Result<[u32; N]> {
        let raw = self.take(4 * N)?;
        let mut words = [0u32; N];
        LittleEndian::read_u32_into(raw, &mut words);
        Ok(words)
    }
}
