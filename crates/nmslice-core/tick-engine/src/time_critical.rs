// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Time-critical input processing, run inside the timer handler

use nmslice_neural::ChannelShaper;
use nmslice_runtime::RingBuffer;

/// Decay every channel, then feed this tick's ring-buffer slots into it
///
/// Every slot addressed by `tick` is zero afterwards. The shaper dimensions
/// must fit the ring buffer layout (checked when the scheduler is built).
pub fn process_ring_buffers(tick: u32, ring_buffer: &mut RingBuffer, shaper: &mut ChannelShaper) {
    shaper.shape_all();

    let n_neurons = shaper.n_neurons() as u32;
    let n_channels = shaper.n_channels() as u32;
    ring_buffer.drain_tick(tick, n_neurons, n_channels, |neuron, channel, delivered| {
        shaper.add_input(neuron as usize, channel as usize, delivered);
    });
}
