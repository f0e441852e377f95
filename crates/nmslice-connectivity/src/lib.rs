// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Structural connection generation.

Connectivity is synthesised on demand during the initialisation phase instead
of being stored as a full matrix. Each connector reads its parameters from a
shared little-endian parameter region, then emits `(pre, post, weight, delay)`
records for the post-synaptic slice a core owns.

```text
parameter region ──► ParamCursor ──► GenerationPass::add_connector ──► handle
                                      GenerationPass::generate(handle, request,
                                          weights, delays, sink) ──► MatrixSink
```
*/

pub mod cursor;
pub mod error;
pub mod generators;
pub mod pass;
pub mod sink;
pub mod values;

pub use cursor::ParamCursor;
pub use error::{ConnectivityError, Result};
pub use generators::{
    rescale_delay, AllToAllConnector, ConnectionGenerator, ConnectionScaling, ConnectorId,
    GenerateRequest, OneToOneConnector, WinnerTakeAllConnector,
};
pub use pass::{ConnectorHandle, GenerationPass};
pub use sink::{BoundedMatrix, ConnectionRecord, MatrixSink, StaticMatrix};
pub use values::{init_value_source, ConstantSource, UniformSource, ValueSource, ValueSourceId};
