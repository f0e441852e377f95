// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! One-to-one connector: post `i` of the range receives pre `i` of the range

use tracing::debug;

use super::{make_connection, ConnectionGenerator, GenerateRequest};
use crate::cursor::ParamCursor;
use crate::error::Result;
use crate::sink::MatrixSink;
use crate::values::ValueSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneToOneConnector;

impl OneToOneConnector {
    /// No parameter prefix
    pub fn initialise(_cursor: &mut ParamCursor<'_>) -> Result<Self> {
        debug!("[CONN-GEN] One-to-one connector");
        Ok(Self)
    }
}

impl ConnectionGenerator for OneToOneConnector {
    fn name(&self) -> &'static str {
        "one_to_one"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        weights: &mut dyn ValueSource,
        delays: &mut dyn ValueSource,
        sink: &mut dyn MatrixSink,
    ) -> Result<()> {
        for post in request.post_window() {
            let pre = request.pre.start + (post - request.post.start);
            if pre >= request.pre.end {
                break;
            }
            make_connection(pre, post, &request.scaling, weights, delays, sink)?;
        }
        Ok(())
    }
}
