// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Generation pass: owns every connector initialised during one
//! initialisation phase

use tracing::{debug, error, info};

use crate::cursor::ParamCursor;
use crate::error::{ConnectivityError, Result};
use crate::generators::{ConnectionGenerator, ConnectorId, GenerateRequest};
use crate::sink::MatrixSink;
use crate::values::ValueSource;

/// Opaque handle returned by [`GenerationPass::add_connector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorHandle(usize);

impl ConnectorHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Arena of initialised connectors
///
/// Handles stay valid until [`GenerationPass::free`]; dropping the pass frees
/// whatever is left.
#[derive(Default)]
pub struct GenerationPass {
    connectors: Vec<Option<Box<dyn ConnectionGenerator>>>,
    connections_written: usize,
}

impl GenerationPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a connector id and that connector's parameters
    pub fn add_connector(&mut self, cursor: &mut ParamCursor<'_>) -> Result<ConnectorHandle> {
        let id = ConnectorId::try_from(cursor.read_u32()?)?;
        let generator = id.initialise(cursor)?;
        Ok(self.insert(generator))
    }

    /// Register an already built connector
    pub fn insert(&mut self, generator: Box<dyn ConnectionGenerator>) -> ConnectorHandle {
        let handle = ConnectorHandle(self.connectors.len());
        debug!(
            "[CONN-GEN] Registered {} as handle {}",
            generator.name(),
            handle.0
        );
        self.connectors.push(Some(generator));
        handle
    }

    /// Generate through `handle`
    ///
    /// A sink failure is fatal for the pass and is returned unchanged.
    pub fn generate(
        &mut self,
        handle: ConnectorHandle,
        request: &GenerateRequest,
        weights: &mut dyn ValueSource,
        delays: &mut dyn ValueSource,
        sink: &mut dyn MatrixSink,
    ) -> Result<usize> {
        let generator = self
            .connectors
            .get(handle.0)
            .and_then(Option::as_ref)
            .ok_or(ConnectivityError::UnknownHandle(handle.0))?;

        let mut counting = CountingSink::new(sink);
        let result = generator.generate(request, weights, delays, &mut counting);
        let written = counting.written;
        self.connections_written += written;

        if let Err(e) = &result {
            error!(
                "[CONN-GEN] {} failed after {} connections: {}",
                generator.name(),
                written,
                e
            );
        }
        result.map(|_| written)
    }

    /// Release one connector; a handle can be freed once
    pub fn free(&mut self, handle: ConnectorHandle) -> Result<()> {
        match self.connectors.get_mut(handle.0).and_then(Option::take) {
            Some(generator) => {
                debug!("[CONN-GEN] Freed {} (handle {})", generator.name(), handle.0);
                Ok(())
            }
            None => Err(ConnectivityError::UnknownHandle(handle.0)),
        }
    }

    /// Connectors not yet freed
    pub fn live_connectors(&self) -> usize {
        self.connectors.iter().filter(|c| c.is_some()).count()
    }

    pub fn connections_written(&self) -> usize {
        self.connections_written
    }

    /// Free everything and report the pass total
    pub fn finish(self) -> usize {
        info!(
            "[CONN-GEN] Generation pass complete: {} connectors, {} connections",
            self.connectors.len(),
            self.connections_written
        );
        self.connections_written
    }
}

/// Counts successful writes on the way through
struct CountingSink<'a> {
    inner: &'a mut dyn MatrixSink,
    written: usize,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a mut dyn MatrixSink) -> Self {
        Self { inner, written: 0 }
    }
}

impl MatrixSink for CountingSink<'_> {
    fn write_synapse(&mut self, record: crate::sink::ConnectionRecord) -> Result<()> {
        self.inner.write_synapse(record)?;
        self.written += 1;
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}
