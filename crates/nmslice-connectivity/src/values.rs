// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pull-based numeric value sources for weights and delays

use byteorder::{ByteOrder, LittleEndian};
use nmslice_neural::Accum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::cursor::ParamCursor;
use crate::error::{ConnectivityError, Result};

/// Produces one value per call
pub trait ValueSource: Send {
    fn next_value(&mut self) -> Accum;
}

/// Source ids as they appear in the parameter region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ValueSourceId {
    Constant = 0,
    Uniform = 1,
}

impl TryFrom<u32> for ValueSourceId {
    type Error = ConnectivityError;

    fn try_from(id: u32) -> Result<Self> {
        match id {
            0 => Ok(Self::Constant),
            1 => Ok(Self::Uniform),
            other => Err(ConnectivityError::UnknownValueSource(other)),
        }
    }
}

/// Same value every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantSource(pub Accum);

impl ValueSource for ConstantSource {
    fn next_value(&mut self) -> Accum {
        self.0
    }
}

/// Uniform over the fixed-point grid in `[low, high)`
#[derive(Debug, Clone)]
pub struct UniformSource {
    low: Accum,
    high: Accum,
    rng: StdRng,
}

impl UniformSource {
    pub fn new(low: Accum, high: Accum, seed: u64) -> Self {
        Self {
            low,
            high,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn from_seed_words(low: Accum, high: Accum, words: [u32; 4]) -> Self {
        let mut seed = [0u8; 32];
        LittleEndian::write_u32_into(&words, &mut seed[..16]);
        LittleEndian::write_u32_into(&words, &mut seed[16..]);
        Self {
            low,
            high,
            rng: StdRng::from_seed(seed),
        }
    }
}

impl ValueSource for UniformSource {
    fn next_value(&mut self) -> Accum {
        if self.low >= self.high {
            return self.low;
        }
        Accum::from_bits(self.rng.gen_range(self.low.to_bits()..self.high.to_bits()))
    }
}

/// Read a source id and its parameters
///
/// Layout: `id`, then for constant one value word, for uniform `low`,
/// `high` and four seed words.
pub fn init_value_source(cursor: &mut ParamCursor<'_>) -> Result<Box<dyn ValueSource>> {
    match ValueSourceId::try_from(cursor.read_u32()?)? {
        ValueSourceId::Constant => {
            let value = cursor.read_accum()?;
            debug!("[CONN-GEN] Constant source, value = {}", value);
            Ok(Box::new(ConstantSource(value)))
        }
        ValueSourceId::Uniform => {
            let low = cursor.read_accum()?;
            let high = cursor.read_accum()?;
            let seed = cursor.read_words::<4>()?;
            debug!("[CONN-GEN] Uniform source, [{}, {})", low, high);
            Ok(Box::new(UniformSource::from_seed_words(low, high, seed)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(words: &[u32]) -> Vec<u8> {
        let mut bytes = vec![0u8; words.len() * 4];
        LittleEndian::write_u32_into(words, &mut bytes);
        bytes
    }

    #[test]
    fn test_constant_from_region() {
        let bytes = region(&[0, Accum::from_num(2.5).to_bits() as u32]);
        let mut cursor = ParamCursor::new(&bytes);
        let mut source = init_value_source(&mut cursor).unwrap();
        assert_eq!(source.next_value(), Accum::from_num(2.5));
        assert_eq!(source.next_value(), Accum::from_num(2.5));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_uniform_stays_in_range_and_is_reproducible() {
        let low = Accum::from_num(1);
        let high = Accum::from_num(3);
        let bytes = region(&[
            1,
            low.to_bits() as u32,
            high.to_bits() as u32,
            1,
            2,
            3,
            4,
        ]);
        let mut a = init_value_source(&mut ParamCursor::new(&bytes)).unwrap();
        let mut b = init_value_source(&mut ParamCursor::new(&bytes)).unwrap();
        for _ in 0..200 {
            let value = a.next_value();
            assert!(value >= low && value < high);
            assert_eq!(value, b.next_value());
        }
    }

    #[test]
    fn test_degenerate_uniform_returns_low() {
        let mut source = UniformSource::new(Accum::from_num(4), Accum::from_num(4), 9);
        assert_eq!(source.next_value(), Accum::from_num(4));
    }

    #[test]
    fn test_unknown_id_rejected() {
        let bytes = region(&[5]);
        let result = init_value_source(&mut ParamCursor::new(&bytes));
        assert!(matches!(result, Err(ConnectivityError::UnknownValueSource(5))));
    }
}
