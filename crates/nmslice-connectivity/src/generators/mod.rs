// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connection generator variants.

Each variant is initialised from its fixed-format parameter prefix and then
asked to generate connections for a post-synaptic slice. Generators keep no
mutable state between calls, so disjoint slices can be generated in any
order, or by different owners.
*/

pub mod all_to_all;
pub mod one_to_one;
pub mod winner_take_all;

use std::ops::Range;

use nmslice_neural::Accum;

use crate::cursor::ParamCursor;
use crate::error::{ConnectivityError, Result};
use crate::sink::{ConnectionRecord, MatrixSink};
use crate::values::ValueSource;

pub use all_to_all::AllToAllConnector;
pub use one_to_one::OneToOneConnector;
pub use winner_take_all::WinnerTakeAllConnector;

/// Connector ids as they appear in the parameter region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ConnectorId {
    OneToOne = 0,
    AllToAll = 1,
    WinnerTakeAll = 7,
}

impl TryFrom<u32> for ConnectorId {
    type Error = ConnectivityError;

    fn try_from(id: u32) -> Result<Self> {
        match id {
            0 => Ok(Self::OneToOne),
            1 => Ok(Self::AllToAll),
            7 => Ok(Self::WinnerTakeAll),
            other => Err(ConnectivityError::UnknownConnector(other)),
        }
    }
}

impl ConnectorId {
    /// Read this connector's parameter prefix and build the generator
    pub fn initialise(self, cursor: &mut ParamCursor<'_>) -> Result<Box<dyn ConnectionGenerator>> {
        Ok(match self {
            Self::OneToOne => Box::new(OneToOneConnector::initialise(cursor)?),
            Self::AllToAll => Box::new(AllToAllConnector::initialise(cursor)?),
            Self::WinnerTakeAll => Box::new(WinnerTakeAllConnector::initialise(cursor)?),
        })
    }
}

/// Weight and delay scaling applied to every emitted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionScaling {
    pub weight_scale: Accum,
    /// Simulation ticks per delay-source unit
    pub timestep_per_delay: Accum,
}

impl Default for ConnectionScaling {
    fn default() -> Self {
        Self {
            weight_scale: Accum::ONE,
            timestep_per_delay: Accum::ONE,
        }
    }
}

/// Index ranges for one generate call (half-open)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Whole pre-synaptic range of the projection
    pub pre: Range<u32>,
    /// Whole post-synaptic range of the projection
    ///
    /// Grouping connectors align their groups to `post.start`, not to
    /// absolute index zero.
    pub post: Range<u32>,
    /// Part of `post` owned by the caller
    pub post_slice: Range<u32>,
    pub scaling: ConnectionScaling,
}

impl GenerateRequest {
    /// Request covering the whole post range
    pub fn full(pre: Range<u32>, post: Range<u32>) -> Self {
        Self {
            post_slice: post.clone(),
            pre,
            post,
            scaling: ConnectionScaling::default(),
        }
    }

    pub fn with_slice(mut self, post_slice: Range<u32>) -> Self {
        self.post_slice = post_slice;
        self
    }

    pub fn with_scaling(mut self, scaling: ConnectionScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Post indices to generate: the slice clipped to the post range
    pub fn post_window(&self) -> Range<u32> {
        let start = self.post_slice.start.max(self.post.start);
        let end = self.post_slice.end.min(self.post.end);
        start..end.max(start)
    }
}

/// A connector variant
pub trait ConnectionGenerator: Send {
    fn name(&self) -> &'static str;

    /// Emit connections for `request.post_window()` into `sink`
    ///
    /// Fails only when the sink rejects a write.
    fn generate(
        &self,
        request: &GenerateRequest,
        weights: &mut dyn ValueSource,
        delays: &mut dyn ValueSource,
        sink: &mut dyn MatrixSink,
    ) -> Result<()>;
}

/// Delay in generator units to whole ticks, rounded, at least one tick
pub fn rescale_delay(delay: Accum, timestep_per_delay: Accum) -> u16 {
    let ticks = delay.saturating_mul(timestep_per_delay).saturating_round();
    ticks.to_num::<i32>().clamp(1, u16::MAX as i32) as u16
}

/// Pull one weight and one delay, scale them and write the record
pub(crate) fn make_connection(
    pre: u32,
    post: u32,
    scaling: &ConnectionScaling,
    weights: &mut dyn ValueSource,
    delays: &mut dyn ValueSource,
    sink: &mut dyn MatrixSink,
) -> Result<()> {
    let weight = weights.next_value().saturating_mul(scaling.weight_scale);
    let delay = rescale_delay(delays.next_value(), scaling.timestep_per_delay);
    sink.write_synapse(ConnectionRecord {
        pre,
        post,
        weight,
        delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_delay_rounds_and_clamps() {
        let one = Accum::ONE;
        assert_eq!(rescale_delay(Accum::from_num(2.4), one), 2);
        assert_eq!(rescale_delay(Accum::from_num(2.5), one), 3);
        assert_eq!(rescale_delay(Accum::from_num(1.5), Accum::from_num(10)), 15);
        assert_eq!(rescale_delay(Accum::ZERO, one), 1);
        assert_eq!(rescale_delay(Accum::from_num(-3), one), 1);
        assert_eq!(rescale_delay(Accum::MAX, Accum::from_num(4)), u16::MAX);
    }

    #[test]
    fn test_post_window_clips_slice() {
        let request = GenerateRequest::full(0..10, 4..12).with_slice(0..8);
        assert_eq!(request.post_window(), 4..8);

        let disjoint = GenerateRequest::full(0..10, 4..12).with_slice(20..30);
        assert!(disjoint.post_window().is_empty());
    }

    #[test]
    fn test_connector_ids() {
        assert_eq!(ConnectorId::try_from(7).unwrap(), ConnectorId::WinnerTakeAll);
        assert_eq!(
            ConnectorId::try_from(3),
            Err(ConnectivityError::UnknownConnector(3))
        );
    }
}
