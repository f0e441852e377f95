// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Destinations for generated connections

use nmslice_neural::Accum;
use tracing::error;

use crate::error::{ConnectivityError, Result};

/// One synapse: global pre and post indices, scaled weight, delay in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionRecord {
    pub pre: u32,
    pub post: u32,
    pub weight: Accum,
    pub delay: u16,
}

/// Accepts one record per call; a full sink is fatal for the pass
pub trait MatrixSink {
    fn write_synapse(&mut self, record: ConnectionRecord) -> Result<()>;

    fn capacity(&self) -> usize;
}

/// Heap-backed sink with a fixed capacity chosen at construction
#[derive(Debug, Clone, Default)]
pub struct BoundedMatrix {
    records: Vec<ConnectionRecord>,
    capacity: usize,
}

impl BoundedMatrix {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn records(&self) -> &[ConnectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ConnectionRecord> {
        self.records
    }
}

impl MatrixSink for BoundedMatrix {
    fn write_synapse(&mut self, record: ConnectionRecord) -> Result<()> {
        if self.records.len() >= self.capacity {
            error!(
                "[CONN-GEN] Matrix not sized correctly (capacity {})",
                self.capacity
            );
            return Err(ConnectivityError::SinkFull {
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Statically sized sink for allocation-free builds
#[derive(Debug, Clone, Default)]
pub struct StaticMatrix<const N: usize> {
    records: heapless::Vec<ConnectionRecord, N>,
}

impl<const N: usize> StaticMatrix<N> {
    pub fn new() -> Self {
        Self {
            records: heapless::Vec::new(),
        }
    }

    pub fn records(&self) -> &[ConnectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<const N: usize> MatrixSink for StaticMatrix<N> {
    fn write_synapse(&mut self, record: ConnectionRecord) -> Result<()> {
        self.records.push(record).map_err(|_| {
            error!("[CONN-GEN] Matrix not sized correctly (capacity {})", N);
            ConnectivityError::SinkFull { capacity: N }
        })
    }

    fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pre: u32) -> ConnectionRecord {
        ConnectionRecord {
            pre,
            post: 0,
            weight: Accum::ONE,
            delay: 1,
        }
    }

    #[test]
    fn test_bounded_rejects_past_capacity() {
        let mut sink = BoundedMatrix::with_capacity(2);
        sink.write_synapse(record(0)).unwrap();
        sink.write_synapse(record(1)).unwrap();
        assert_eq!(
            sink.write_synapse(record(2)),
            Err(ConnectivityError::SinkFull { capacity: 2 })
        );
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_static_rejects_past_capacity() {
        let mut sink = StaticMatrix::<1>::new();
        sink.write_synapse(record(0)).unwrap();
        assert!(sink.write_synapse(record(1)).is_err());
        assert_eq!(sink.records(), &[record(0)]);
    }
}
