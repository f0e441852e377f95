// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Slice-wise generation reproduces single-call generation

use std::collections::BTreeSet;

use nmslice_connectivity::{
    BoundedMatrix, ConnectionGenerator, ConnectionRecord, ConnectivityError, ConstantSource,
    GenerateRequest, GenerationPass, StaticMatrix, WinnerTakeAllConnector,
};
use nmslice_neural::Accum;
use proptest::prelude::*;

fn generate(wta: &WinnerTakeAllConnector, request: &GenerateRequest) -> Vec<ConnectionRecord> {
    let mut sink = BoundedMatrix::with_capacity(64 * 64);
    wta.generate(
        request,
        &mut ConstantSource(Accum::ONE),
        &mut ConstantSource(Accum::from_num(2)),
        &mut sink,
    )
    .unwrap();
    sink.into_records()
}

#[test]
fn test_wta_four_by_eight() {
    let wta = WinnerTakeAllConnector::new(4).unwrap();
    let records = generate(&wta, &GenerateRequest::full(0..8, 0..8));
    assert_eq!(records.len(), 24);
    assert!(records.iter().all(|r| r.pre != r.post));
    assert!(records.iter().all(|r| r.pre % 4 != r.post % 4));
    assert!(records.iter().all(|r| r.delay == 2));

    let unique: BTreeSet<_> = records.iter().copied().collect();
    assert_eq!(unique.len(), 24);
}

#[test]
fn test_two_halves_equal_full() {
    let wta = WinnerTakeAllConnector::new(4).unwrap();
    let full: BTreeSet<_> = generate(&wta, &GenerateRequest::full(0..8, 0..8))
        .into_iter()
        .collect();

    let mut halves = generate(&wta, &GenerateRequest::full(0..8, 0..8).with_slice(0..3));
    halves.extend(generate(
        &wta,
        &GenerateRequest::full(0..8, 0..8).with_slice(3..8),
    ));
    assert_eq!(halves.len(), full.len());
    assert_eq!(halves.into_iter().collect::<BTreeSet<_>>(), full);
}

#[test]
fn test_static_sink_exhaustion_aborts_pass() {
    let mut pass = GenerationPass::new();
    let handle = pass.insert(Box::new(WinnerTakeAllConnector::new(4).unwrap()));
    let mut sink = StaticMatrix::<10>::new();
    let result = pass.generate(
        handle,
        &GenerateRequest::full(0..8, 0..8),
        &mut ConstantSource(Accum::ONE),
        &mut ConstantSource(Accum::ONE),
        &mut sink,
    );
    assert_eq!(result, Err(ConnectivityError::SinkFull { capacity: 10 }));
    assert_eq!(sink.len(), 10);
    assert_eq!(pass.connections_written(), 10);
}

proptest! {
    #[test]
    fn prop_disjoint_slices_union_is_full_run(
        n in 1u32..7,
        pre_len in 1u32..40,
        post_len in 1u32..40,
        pre_start in 0u32..20,
        post_start in 0u32..20,
        cuts in proptest::collection::vec(0u32..40, 0..5),
    ) {
        let wta = WinnerTakeAllConnector::new(n).unwrap();
        let pre = pre_start..pre_start + pre_len;
        let post = post_start..post_start + post_len;
        let request = GenerateRequest::full(pre.clone(), post.clone());
        let full = generate(&wta, &request);

        let mut bounds: Vec<u32> = cuts
            .into_iter()
            .map(|c| post.start + c % post_len)
            .collect();
        bounds.push(post.start);
        bounds.push(post.end);
        bounds.sort_unstable();
        bounds.dedup();

        let mut pieces = Vec::new();
        for pair in bounds.windows(2) {
            pieces.extend(generate(&wta, &request.clone().with_slice(pair[0]..pair[1])));
        }

        prop_assert_eq!(pieces.len(), full.len());
        let full_set: BTreeSet<_> = full.into_iter().collect();
        prop_assert_eq!(full_set.len(), pieces.len());
        prop_assert_eq!(pieces.into_iter().collect::<BTreeSet<_>>(), full_set);
    }

    #[test]
    fn prop_no_self_position(n in 1u32..7, len in 1u32..40) {
        let wta = WinnerTakeAllConnector::new(n).unwrap();
        for record in generate(&wta, &GenerateRequest::full(0..len, 0..len)) {
            prop_assert_eq!(record.pre / n, record.post / n);
            prop_assert_ne!(record.pre, record.post);
        }
    }
}
