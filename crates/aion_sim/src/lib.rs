//! Event-driven HDL simulator for the Aion FPGA toolchain.
//!
//! This crate implements a delta-cycle-accurate simulation engine that
//! consumes an elaborated `Design` from `aion_ir` and executes it with
//! 4-state logic (IEEE 1164), multi-driver resolution, edge-sensitive
//! process scheduling, and VCD waveform output.
//!
//! # Architecture
//!
//! The simulator flattens the module hierarchy at construction time, mapping
//! all signals to flat `SimSignalId` identifiers. Processes are scheduled via
//! an event-driven loop with delta cycles for combinational propagation and
//! edge detection for sequential logic.
//!
//! # Usage
//!
//! ```ignore
//! use aion_sim::{simulate, SimConfig};
//!
//! let config = SimConfig::default();
//! let result = simulate(&design, &config, &interner)?;
//! println!("Simulation ended at {}", result.final_time);
//! ```
//!
//! # Modules
//!
//! - `error` — Simulation error types
//! - `time` — Femtosecond-precision time with delta cycles
//! - `value` — Signal state, driver resolution, drive strength
//! - `evaluator` — Expression evaluation and statement execution
//! - `waveform` — Waveform recording (VCD format)
//! - `kernel` — Simulation kernel with event queue and delta-cycle loop

#![warn(missing_docs)]

pub mod error;
pub mod evaluator;
pub mod fst;
pub mod interactive;
pub mod kernel;
pub mod time;
pub mod value;
pub mod waveform;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use aion_common::Interner;
use aion_ir::Design;

pub use error::SimError;
pub use fst::FstRecorder;
pub use interactive::InteractiveSim;
pub use kernel::{SimKernel, SimResult, StepResult};
pub use time::SimTime;
pub use value::{DriveStrength, Driver, SimSignalId, SimSignalState};
pub use waveform::{VcdRecorder, WaveformRecorder};

/// Waveform output format selection.
///
/// Controls which waveform recorder implementation is used during simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveformOutputFormat {
    /// Value Change Dump (IEEE 1364) — human-readable text format.
    Vcd,
    /// Fast Signal Trace — compressed binary format (GTKWave native).
    Fst,
}

/// Configuration for a simulation run.
///
/// Controls time limits, waveform output, and other simulation parameters.
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// Optional simulation time limit in femtoseconds.
    /// If `None`, simulation runs until event queue empties or `$finish`.
    pub time_limit: Option<u64>,
    /// Optional path for waveform output.
    pub waveform_path: Option<PathBuf>,
    /// Whether to record waveform data. Ignored if `waveform_path` is `None`.
    pub record_waveform: bool,
    /// Waveform output format. Defaults to VCD if not specified.
    pub waveform_format: Option<WaveformOutputFormat>,
}

/// High-level entry point: runs a simulation on an elaborated design.
///
/// Creates a `SimKernel`, optionally attaches a VCD recorder, configures
/// time limits, and executes the simulation to completion. The `interner`
/// is used to resolve interned signal names for waveform output.
pub fn simulate(
    design: &Design,
    config: &SimConfig,
    interner: &Interner,
) -> Result<SimResult, SimError> {
    let mut kernel = SimKernel::new(design, interner)?;

    if let Some(limit) = config.time_limit {
        kernel.set_time_limit(limit);
    }

    if config.record_waveform {
        if let Some(path) = &config.waveform_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            let format = config.waveform_format.unwrap_or(WaveformOutputFormat::Vcd);
            let recorder: Box<dyn WaveformRecorder> = match format {
                WaveformOutputFormat::Vcd => Box::new(VcdRecorder::new(writer)),
                WaveformOutputFormat::Fst => Box::new(FstRecorder::new(writer)),
            };
            kernel.set_recorder(recorder);
        }
    }

    if let Some(limit) = config.time_limit {
        kernel.run(limit)
    } else {
        kernel.run_to_completion()
    }
}
