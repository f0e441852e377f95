// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Synaptic Ring Buffer
//!
//! Delay-line storage for pending synaptic input. Each slot accumulates every
//! contribution due at ticks congruent to it modulo the delay range, so
//! insertion and per-tick draining are both O(1) per slot with no event lists.
//!
//! ## Index layout
//!
//! ```text
//!  MSB                                                         LSB
//!  | tick & delay_mask | channel (type bits) | neuron (index bits) |
//! ```
//!
//! Two deliveries whose target ticks differ by a multiple of the delay range
//! land in the same slot and are summed. Choosing a delay range that covers
//! the largest configured delay is the caller's responsibility.

use alloc::vec;
use alloc::vec::Vec;

use nmslice_neural::{Accum, OverflowPolicy};

use crate::error::{Result, RuntimeError};

/// Largest supported total index width
pub const MAX_RING_BUFFER_BITS: u32 = 28;

/// Packed ring-buffer index
///
/// * `synapse_type_index_bits` - channel bits plus neuron bits (shift applied to the tick)
/// * `synapse_index_bits` - neuron bits (shift applied to the channel)
/// * `delay_mask` - mask applied to the tick before shifting
///
/// # Example
/// ```
/// use nmslice_runtime::ring_buffer_index;
///
/// // 1 channel bit, 4 neuron bits, 8 delay slots
/// assert_eq!(ring_buffer_index(9, 1, 3, 5, 4, 0b111), (1 << 5) | (1 << 4) | 3);
/// ```
#[inline]
pub const fn ring_buffer_index(
    tick: u32,
    channel: u32,
    neuron: u32,
    synapse_type_index_bits: u32,
    synapse_index_bits: u32,
    delay_mask: u32,
) -> usize {
    (((tick & delay_mask) << synapse_type_index_bits)
        | (channel << synapse_index_bits)
        | neuron) as usize
}

/// Field widths of a ring-buffer index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBufferLayout {
    type_bits: u32,
    neuron_index_bits: u32,
    delay_bits: u32,
}

impl RingBufferLayout {
    /// Validate and build a layout
    pub fn new(type_bits: u32, neuron_index_bits: u32, delay_bits: u32) -> Result<Self> {
        // Overflowing widths report as u32::MAX
        let total_bits = type_bits
            .checked_add(neuron_index_bits)
            .and_then(|bits| bits.checked_add(delay_bits))
            .unwrap_or(u32::MAX);
        if total_bits > MAX_RING_BUFFER_BITS {
            return Err(RuntimeError::InvalidLayout {
                total_bits,
                max_bits: MAX_RING_BUFFER_BITS,
            });
        }
        Ok(Self {
            type_bits,
            neuron_index_bits,
            delay_bits,
        })
    }

    /// Bits for the channel ordinal
    pub fn type_bits(&self) -> u32 {
        self.type_bits
    }

    /// Bits for the neuron ordinal
    pub fn neuron_index_bits(&self) -> u32 {
        self.neuron_index_bits
    }

    /// Bits for the tick (delay range is `1 << delay_bits`)
    pub fn delay_bits(&self) -> u32 {
        self.delay_bits
    }

    /// Shift applied to the masked tick
    pub fn synapse_type_index_bits(&self) -> u32 {
        self.type_bits + self.neuron_index_bits
    }

    /// Mask applied to the tick
    pub fn delay_mask(&self) -> u32 {
        (1u32 << self.delay_bits) - 1
    }

    /// Number of distinct ticks before slots alias
    pub fn delay_range(&self) -> u32 {
        1u32 << self.delay_bits
    }

    /// Number of neurons addressable
    pub fn max_neurons(&self) -> u32 {
        1u32 << self.neuron_index_bits
    }

    /// Number of channels addressable
    pub fn max_channels(&self) -> u32 {
        1u32 << self.type_bits
    }

    /// Total number of slots (always a power of two)
    pub fn size(&self) -> usize {
        1usize << (self.delay_bits + self.type_bits + self.neuron_index_bits)
    }

    /// Slot index for (tick, channel, neuron)
    #[inline]
    pub fn index(&self, tick: u32, channel: u32, neuron: u32) -> usize {
        ring_buffer_index(
            tick,
            channel,
            neuron,
            self.synapse_type_index_bits(),
            self.neuron_index_bits,
            self.delay_mask(),
        )
    }
}

/// Fixed-size circular array of fixed-point accumulators
#[derive(Debug, Clone)]
pub struct RingBuffer {
    layout: RingBufferLayout,
    overflow: OverflowPolicy,
    slots: Vec<Accum>,
}

impl RingBuffer {
    /// Allocate a zeroed buffer
    pub fn new(layout: RingBufferLayout, overflow: OverflowPolicy) -> Self {
        Self {
            layout,
            overflow,
            slots: vec![Accum::ZERO; layout.size()],
        }
    }

    /// Index layout
    pub fn layout(&self) -> &RingBufferLayout {
        &self.layout
    }

    /// Overflow policy applied on accumulation
    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; a layout has at least one slot
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn check(&self, channel: u32, neuron: u32) -> Result<()> {
        if channel >= self.layout.max_channels() {
            return Err(RuntimeError::OrdinalOutOfRange {
                field: "channel",
                value: channel,
                limit: self.layout.max_channels(),
            });
        }
        if neuron >= self.layout.max_neurons() {
            return Err(RuntimeError::OrdinalOutOfRange {
                field: "neuron",
                value: neuron,
                limit: self.layout.max_neurons(),
            });
        }
        Ok(())
    }

    /// Accumulate `weight` into the slot for `target_tick`
    pub fn add(&mut self, target_tick: u32, channel: u32, neuron: u32, weight: Accum) -> Result<()> {
        self.check(channel, neuron)?;
        let idx = self.layout.index(target_tick, channel, neuron);
        self.slots[idx] = self.overflow.add(self.slots[idx], weight);
        Ok(())
    }

    /// Accumulate `weight` to arrive `delay` ticks after `current_tick`
    pub fn schedule(
        &mut self,
        current_tick: u32,
        delay: u32,
        channel: u32,
        neuron: u32,
        weight: Accum,
    ) -> Result<()> {
        self.add(current_tick.wrapping_add(delay), channel, neuron, weight)
    }

    /// Slot content without clearing it
    pub fn peek(&self, tick: u32, channel: u32, neuron: u32) -> Result<Accum> {
        self.check(channel, neuron)?;
        Ok(self.slots[self.layout.index(tick, channel, neuron)])
    }

    /// Read and zero every slot addressed by `tick`
    ///
    /// `deliver` receives `(neuron, channel, value)` for each slot in
    /// neuron-major order, zero values included.
    pub fn drain_tick<F>(&mut self, tick: u32, n_neurons: u32, n_channels: u32, mut deliver: F)
    where
        F: FnMut(u32, u32, Accum),
    {
        debug_assert!(n_neurons <= self.layout.max_neurons());
        debug_assert!(n_channels <= self.layout.max_channels());
        for neuron in 0..n_neurons {
            for channel in 0..n_channels {
                let idx = self.layout.index(tick, channel, neuron);
                deliver(neuron, channel, self.slots[idx]);
                self.slots[idx] = Accum::ZERO;
            }
        }
    }

    /// Zero every slot
    pub fn clear(&mut self) {
        self.slots.fill(Accum::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> RingBufferLayout {
        // 2 channels, 8 neurons, 16 delay slots
        RingBufferLayout::new(1, 3, 4).unwrap()
    }

    #[test]
    fn test_layout_size_is_power_of_two() {
        let layout = layout();
        assert_eq!(layout.size(), 256);
        assert!(layout.size().is_power_of_two());
        assert_eq!(layout.delay_mask(), 0xF);
        assert_eq!(layout.synapse_type_index_bits(), 4);
    }

    #[test]
    fn test_layout_rejects_too_many_bits() {
        let err = RingBufferLayout::new(2, 20, 8).unwrap_err();
        assert_eq!(err, RuntimeError::InvalidLayout { total_bits: 30, max_bits: 28 });
    }

    #[test]
    fn test_layout_rejects_overflowing_widths() {
        let err = RingBufferLayout::new(u32::MAX, 1, 4).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::InvalidLayout {
                total_bits: u32::MAX,
                max_bits: 28
            }
        );
        assert!(RingBufferLayout::new(4, 8, u32::MAX - 11).is_err());
    }

    #[test]
    fn test_indices_are_distinct_within_one_tick() {
        let layout = layout();
        let mut seen = alloc::vec::Vec::new();
        for neuron in 0..8 {
            for channel in 0..2 {
                seen.push(layout.index(5, channel, neuron));
            }
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_schedule_and_drain() {
        let mut rb = RingBuffer::new(layout(), OverflowPolicy::Saturate);
        rb.schedule(10, 3, 1, 2, Accum::from_num(1.5)).unwrap();
        assert_eq!(rb.peek(13, 1, 2).unwrap(), Accum::from_num(1.5));

        let mut delivered = alloc::vec::Vec::new();
        rb.drain_tick(13, 8, 2, |n, c, v| {
            if v != Accum::ZERO {
                delivered.push((n, c, v));
            }
        });
        assert_eq!(delivered, [(2, 1, Accum::from_num(1.5))]);
        assert_eq!(rb.peek(13, 1, 2).unwrap(), Accum::ZERO);
    }

    #[test]
    fn test_delay_beyond_range_aliases_and_accumulates() {
        let mut rb = RingBuffer::new(layout(), OverflowPolicy::Saturate);
        // delay 20 wraps to slot (0 + 20) mod 16 = 4
        rb.schedule(0, 20, 0, 1, Accum::from_num(2)).unwrap();
        rb.schedule(0, 4, 0, 1, Accum::from_num(3)).unwrap();
        assert_eq!(rb.peek(4, 0, 1).unwrap(), Accum::from_num(5));
        assert_eq!(rb.peek(20, 0, 1).unwrap(), Accum::from_num(5));
    }

    #[test]
    fn test_overflow_policy_applies_on_add() {
        let mut saturating = RingBuffer::new(layout(), OverflowPolicy::Saturate);
        saturating.add(0, 0, 0, Accum::MAX).unwrap();
        saturating.add(0, 0, 0, Accum::from_num(1)).unwrap();
        assert_eq!(saturating.peek(0, 0, 0).unwrap(), Accum::MAX);

        let mut wrapping = RingBuffer::new(layout(), OverflowPolicy::Wrap);
        wrapping.add(0, 0, 0, Accum::MAX).unwrap();
        wrapping.add(0, 0, 0, Accum::from_bits(1)).unwrap();
        assert_eq!(wrapping.peek(0, 0, 0).unwrap(), Accum::MIN);
    }

    #[test]
    fn test_ordinal_out_of_range() {
        let mut rb = RingBuffer::new(layout(), OverflowPolicy::Saturate);
        assert_eq!(
            rb.add(0, 0, 8, Accum::ONE),
            Err(RuntimeError::OrdinalOutOfRange { field: "neuron", value: 8, limit: 8 })
        );
        assert_eq!(
            rb.add(0, 2, 0, Accum::ONE),
            Err(RuntimeError::OrdinalOutOfRange { field: "channel", value: 2, limit: 2 })
        );
    }
}
