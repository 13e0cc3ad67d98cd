//! Static timing analysis and constraint management for the Aion FPGA toolchain.
//!
//! This crate provides SDC/XDC constraint parsing, a device-independent timing
//! graph representation, and a static timing analysis (STA) engine. It computes
//! arrival times, required times, and slack at every endpoint, then extracts
//! critical paths for timing closure.
//!
//! # Usage
//!
//! ```ignore
//! use aion_timing::{parse_sdc, analyze_timing, TimingConstraints, TimingGraph};
//!
//! // Parse constraints
//! let constraints = parse_sdc(sdc_source, &interner, &sink);
//!
//! // Build timing graph (from PnR netlist via timing bridge)
//! let graph = build_timing_graph(&netlist, &arch);
//!
//! // Run STA
//! let report = analyze_timing(&graph, &constraints, &interner, &sink)?;
//! println!("Met: {}, worst slack: {:.3} ns", report.met, report.worst_slack_ns);
//! ```
//!
//! # Architecture
//!
//! - [`constraints`] — timing constraint types (clocks, I/O delays, exceptions)
//! - [`sdc`] — SDC/XDC file parser
//! - [`graph`] — device-independent timing graph (nodes + delay edges)
//! - [`sta`] — STA algorithm (forward/backward propagation, slack, critical paths)
//! - [`report`] — timing report types (critical paths, per-domain summaries)

#![warn(missing_docs)]

pub mod constraints;
pub mod graph;
pub mod ids;
pub mod report;
pub mod sdc;
pub mod sta;

pub use constraints::{
    ClockConstraint, FalsePath, IoDelay, MaxDelayPath, MulticyclePath, TimingConstraints,
};
pub use graph::{TimingEdge, TimingEdgeType, TimingGraph, TimingNode, TimingNodeType};
pub use ids::{TimingEdgeId, TimingNodeId};
pub use report::{ClockDomainTiming, CriticalPath, PathElement, TimingEndpoint, TimingReport};
pub use sdc::parse_sdc;
pub use sta::{analyze, analyze_timing, TimingAnalysis};
