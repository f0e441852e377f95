// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Off-target run of one simulation core.
//!
//! Loads `nmslice.toml` (or defaults), generates winner-take-all inhibition
//! for the slice, drives the tick engine with a host timer loop until it
//! pauses, then prints the provenance record as JSON.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use nmslice::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    NmsliceConfig,
};
use nmslice::connectivity::{
    init_value_source, BoundedMatrix, GenerateRequest, GenerationPass, ParamCursor,
};
use nmslice::host::{deliver_spikes, LeakyIntegrator, Recorder, SpikeLog, StaticSynapses};
use nmslice::neural::Accum;
use nmslice::observability::{debug_flags_help, init_logging, parse_debug_flags};
use nmslice::runtime::{HostInterrupts, SlotQueue};
use nmslice::setup;
use nmslice::tick_engine::{
    Collaborators, JsonProvenanceWriter, TickOutcome, TickScheduler,
};
use tracing::{error, info};

const CONNECTOR_WTA: u32 = 7;
const SOURCE_CONSTANT: u32 = 0;
const SOURCE_UNIFORM: u32 = 1;

struct Args {
    config_path: Option<PathBuf>,
    group_size: u32,
    overrides: HashMap<String, String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: slice_sim [--config <path>] [--wta <group size>] [--set key=value]...\n\n\
         Override keys: simulation_ticks, infinite_run, timer_period_us, n_neurons,\n\
         background_slots, log_level\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config_path: None,
        group_size: 4,
        overrides: HashMap::new(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                parsed.config_path = Some(PathBuf::from(v));
            }
            "--wta" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                parsed.group_size = v.parse().unwrap_or_else(|_| usage_and_exit());
            }
            "--set" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                let Some((key, value)) = v.split_once('=') else {
                    usage_and_exit();
                };
                parsed.overrides.insert(key.to_string(), value.to_string());
            }
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    parsed
}

fn load(args: &Args) -> NmsliceConfig {
    let path = args.config_path.clone().or_else(|| find_config_file().ok());
    match path {
        Some(path) => load_config(Some(&path), Some(&args.overrides)).unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {e}", path.display());
            process::exit(2);
        }),
        None => {
            let mut config = NmsliceConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &args.overrides);
            config
        }
    }
}

fn words_to_region(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn run(args: Args, config: NmsliceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (sched_config, ring_buffer, shaper) = setup::engine_parts(&config)?;
    let n_neurons = config.simulation.n_neurons;
    let inhibitory = setup::synapse_model(&config)
        .channel_by_target("inhibitory")
        .ok_or("synapse model has no inhibitory channel")? as u32;

    // Parameter region: connector, weight source, delay source
    let region = words_to_region(&[
        CONNECTOR_WTA,
        args.group_size,
        SOURCE_CONSTANT,
        Accum::from_num(0.8).to_bits() as u32,
        SOURCE_UNIFORM,
        Accum::from_num(1).to_bits() as u32,
        Accum::from_num(3).to_bits() as u32,
        0x1234_5678,
        0x9abc_def0,
        0x0fed_cba9,
        0x8765_4321,
    ]);
    let mut cursor = ParamCursor::new(&region);
    let mut pass = GenerationPass::new();
    let wta = pass.add_connector(&mut cursor)?;
    let mut weights = init_value_source(&mut cursor)?;
    let mut delays = init_value_source(&mut cursor)?;

    let capacity = n_neurons as usize * args.group_size.saturating_sub(1) as usize;
    let mut matrix = BoundedMatrix::with_capacity(capacity);
    pass.generate(
        wta,
        &GenerateRequest::full(0..n_neurons, 0..n_neurons),
        weights.as_mut(),
        delays.as_mut(),
        &mut matrix,
    )?;
    pass.free(wta)?;
    pass.finish();
    let connections = matrix.into_records();

    let spikes = SpikeLog::default();
    let recorder = Recorder::new();
    let collaborators = Collaborators::new(
        Box::new(LeakyIntegrator::new(n_neurons as usize, 0.9, 1.0, spikes.clone())),
        Box::new(StaticSynapses::default()),
        Box::new(recorder.clone()),
    );
    let mut scheduler = TickScheduler::new(
        sched_config,
        ring_buffer,
        shaper,
        HostInterrupts::new(),
        SlotQueue::new(config.scheduler.background_slots),
        collaborators,
    )?
    .with_provenance_sink(Box::new(JsonProvenanceWriter::new(std::io::stdout()).pretty()));

    let excitatory_drive = Accum::from_num(0.6);
    loop {
        match scheduler.on_timer_event() {
            TickOutcome::Paused { tick } => {
                info!("Run complete at tick {}", tick);
                break;
            }
            TickOutcome::Ignored => break,
            TickOutcome::Submitted { tick } | TickOutcome::Overloaded { tick } => {
                // External drive: one neuron per tick, round robin
                scheduler.deliver(1, 0, tick % n_neurons.max(1), excitatory_drive)?;
            }
        }
        scheduler.run_pending_background();

        let fired: Vec<_> = spikes.lock().map(|mut s| s.drain(..).collect()).unwrap_or_default();
        deliver_spikes(&mut scheduler, &connections, &fired, inhibitory)?;
    }

    let record = scheduler.finalize()?;
    info!(
        "{} connections, {} overloads, ready signals {}",
        connections.len(),
        record.n_background_queue_overloads,
        recorder.stats().ready_signals
    );
    Ok(())
}

fn main() {
    let args = parse_args();
    let config = load(&args);

    let flags = parse_debug_flags();
    if let Err(e) = init_logging(&flags, &config.logging.level) {
        eprintln!("Failed to initialise logging: {e:#}");
        process::exit(2);
    }

    if let Err(e) = run(args, config) {
        error!("slice_sim failed: {}", e);
        process::exit(1);
    }
}
