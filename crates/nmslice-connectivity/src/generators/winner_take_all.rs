// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Winner-take-all connector
//!
//! Both populations are split into groups of `n_values` aligned to the start
//! of their ranges. Every post neuron receives a connection from each pre
//! neuron of the matching group except the one at its own position.

use tracing::debug;

use super::{make_connection, ConnectionGenerator, GenerateRequest};
use crate::cursor::ParamCursor;
use crate::error::{ConnectivityError, Result};
use crate::sink::MatrixSink;
use crate::values::ValueSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinnerTakeAllConnector {
    n_values: u32,
}

impl WinnerTakeAllConnector {
    pub fn new(n_values: u32) -> Result<Self> {
        if n_values == 0 {
            return Err(ConnectivityError::InvalidParameter(
                "winner-take-all group size must be non-zero".to_string(),
            ));
        }
        Ok(Self { n_values })
    }

    /// Parameter prefix: one word, the group size
    pub fn initialise(cursor: &mut ParamCursor<'_>) -> Result<Self> {
        let n_values = cursor.read_u32()?;
        debug!("[CONN-GEN] WTA connector, n_values = {}", n_values);
        Self::new(n_values)
    }

    pub fn n_values(&self) -> u32 {
        self.n_values
    }
}

impl ConnectionGenerator for WinnerTakeAllConnector {
    fn name(&self) -> &'static str {
        "winner_take_all"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        weights: &mut dyn ValueSource,
        delays: &mut dyn ValueSource,
        sink: &mut dyn MatrixSink,
    ) -> Result<()> {
        let n = self.n_values;
        let window = request.post_window();
        if window.is_empty() {
            return Ok(());
        }
        let pre = &request.pre;

        // Resume mid-group from the position of the first post index
        let offset = window.start - request.post.start;
        let mut post_value = offset % n;
        let mut pre_start = pre.start.saturating_add((offset / n).saturating_mul(n));
        let mut pre_end = pre_start.saturating_add(n).min(pre.end);

        for post in window {
            for pre_index in pre_start..pre_end {
                if pre_index - pre_start != post_value {
                    make_connection(
                        pre_index,
                        post,
                        &request.scaling,
                        weights,
                        delays,
                        sink,
                    )?;
                }
            }

            post_value += 1;
            if post_value == n {
                post_value = 0;
                pre_start = pre_start.saturating_add(n);
                if pre_start >= pre.end {
                    break;
                }
                pre_end = pre_start.saturating_add(n).min(pre.end);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BoundedMatrix;
    use crate::values::ConstantSource;
    use nmslice_neural::Accum;

    fn run(connector: &WinnerTakeAllConnector, request: &GenerateRequest) -> BoundedMatrix {
        let mut sink = BoundedMatrix::with_capacity(1024);
        connector
            .generate(
                request,
                &mut ConstantSource(Accum::ONE),
                &mut ConstantSource(Accum::ONE),
                &mut sink,
            )
            .unwrap();
        sink
    }

    #[test]
    fn test_two_full_groups() {
        let wta = WinnerTakeAllConnector::new(4).unwrap();
        let sink = run(&wta, &GenerateRequest::full(0..8, 0..8));

        assert_eq!(sink.len(), 24);
        for record in sink.records() {
            assert_ne!(record.pre, record.post);
            assert_eq!(record.pre / 4, record.post / 4);
            assert_ne!(record.pre % 4, record.post % 4);
        }
    }

    #[test]
    fn test_short_final_group() {
        let wta = WinnerTakeAllConnector::new(4).unwrap();
        // Groups {0..4}, {4..6}
        let sink = run(&wta, &GenerateRequest::full(0..6, 0..6));
        // 4 * 3 + post 4 <- pre 5, post 5 <- pre 4
        assert_eq!(sink.len(), 14);
    }

    #[test]
    fn test_offset_ranges_align_to_range_start() {
        let wta = WinnerTakeAllConnector::new(2).unwrap();
        let sink = run(&wta, &GenerateRequest::full(10..14, 100..104));
        let pairs: Vec<(u32, u32)> = sink.records().iter().map(|r| (r.pre, r.post)).collect();
        assert_eq!(pairs, vec![(11, 100), (10, 101), (13, 102), (12, 103)]);
    }

    #[test]
    fn test_mid_group_slice() {
        let wta = WinnerTakeAllConnector::new(3).unwrap();
        let sink = run(&wta, &GenerateRequest::full(0..6, 0..6).with_slice(2..4));
        let pairs: Vec<(u32, u32)> = sink.records().iter().map(|r| (r.pre, r.post)).collect();
        assert_eq!(pairs, vec![(0, 2), (1, 2), (4, 3), (5, 3)]);
    }

    #[test]
    fn test_sink_exhaustion_is_fatal() {
        let wta = WinnerTakeAllConnector::new(4).unwrap();
        let mut sink = BoundedMatrix::with_capacity(5);
        let result = wta.generate(
            &GenerateRequest::full(0..8, 0..8),
            &mut ConstantSource(Accum::ONE),
            &mut ConstantSource(Accum::ONE),
            &mut sink,
        );
        assert_eq!(result, Err(ConnectivityError::SinkFull { capacity: 5 }));
        assert_eq!(sink.len(), 5);
    }

    #[test]
    fn test_zero_group_size_rejected() {
        assert!(WinnerTakeAllConnector::new(0).is_err());
    }
}
