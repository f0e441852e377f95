// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-of-run provenance

use std::io::Write;

use nmslice_runtime::BackgroundQueueStats;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TickError};

/// Diagnostics written once at the end of a run
///
/// Word layout: neuron block, synapse block, then the two background
/// counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub neuron: Vec<u32>,
    pub synapse: Vec<u32>,
    pub max_backgrounds_queued: u32,
    pub n_background_queue_overloads: u32,
    /// Ticks completed before finalisation
    pub ticks_run: u32,
}

impl ProvenanceRecord {
    pub fn new(neuron: Vec<u32>, synapse: Vec<u32>, stats: BackgroundQueueStats, ticks_run: u32) -> Self {
        Self {
            neuron,
            synapse,
            max_backgrounds_queued: stats.max_backgrounds_queued,
            n_background_queue_overloads: stats.n_background_overloads,
            ticks_run,
        }
    }

    /// Flat word image as stored in the provenance region
    pub fn to_words(&self) -> Vec<u32> {
        let mut words = Vec::with_capacity(self.neuron.len() + self.synapse.len() + 2);
        words.extend_from_slice(&self.neuron);
        words.extend_from_slice(&self.synapse);
        words.push(self.max_backgrounds_queued);
        words.push(self.n_background_queue_overloads);
        words
    }
}

/// Destination for the finalisation record
pub trait ProvenanceSink: Send {
    fn store(&mut self, record: &ProvenanceRecord) -> Result<()>;
}

impl<F> ProvenanceSink for F
where
    F: FnMut(&ProvenanceRecord) -> Result<()> + Send,
{
    fn store(&mut self, record: &ProvenanceRecord) -> Result<()> {
        self(record)
    }
}

/// Writes the record as one JSON document
pub struct JsonProvenanceWriter<W: Write + Send> {
    writer: W,
    pretty: bool,
}

impl<W: Write + Send> JsonProvenanceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pretty: false }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ProvenanceSink for JsonProvenanceWriter<W> {
    fn store(&mut self, record: &ProvenanceRecord) -> Result<()> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(record)
        } else {
            serde_json::to_vec(record)
        }
        .map_err(|e| TickError::ProvenanceWrite(e.to_string()))?;

        self.writer
            .write_all(&encoded)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush())
            .map_err(|e| TickError::ProvenanceWrite(e.to_string()))
    }
}
