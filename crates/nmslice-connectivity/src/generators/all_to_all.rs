// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! All-to-all connector

use tracing::debug;

use super::{make_connection, ConnectionGenerator, GenerateRequest};
use crate::cursor::ParamCursor;
use crate::error::Result;
use crate::sink::MatrixSink;
use crate::values::ValueSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllToAllConnector {
    /// When false, `pre == post` pairs are skipped (projection onto itself)
    pub allow_self_connections: bool,
}

impl AllToAllConnector {
    /// Parameter prefix: one word, non-zero allows self connections
    pub fn initialise(cursor: &mut ParamCursor<'_>) -> Result<Self> {
        let allow_self_connections = cursor.read_u32()? != 0;
        debug!(
            "[CONN-GEN] All-to-all connector, allow_self_connections = {}",
            allow_self_connections
        );
        Ok(Self {
            allow_self_connections,
        })
    }
}

impl ConnectionGenerator for AllToAllConnector {
    fn name(&self) -> &'static str {
        "all_to_all"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        weights: &mut dyn ValueSource,
        delays: &mut dyn ValueSource,
        sink: &mut dyn MatrixSink,
    ) -> Result<()> {
        for post in request.post_window() {
            for pre in request.pre.clone() {
                if !self.allow_self_connections && pre == post {
                    continue;
                }
                make_connection(pre, post, &request.scaling, weights, delays, sink)?;
            }
        }
        Ok(())
    }
}
