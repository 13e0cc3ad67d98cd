//! Placement engine for the PnR pipeline.
//!
//! Assigns each cell in the netlist to a physical site on the FPGA device.
//! Uses random initial placement followed by simulated annealing refinement
//! to minimize wire length and timing-critical path delays.

mod analytic;
mod anneal;
mod cost;
mod random;

use crate::data::PnrNetlist;
use aion_arch::Architecture;
use aion_diagnostics::DiagnosticSink;

pub use cost::PlacementCost;

/// Performs placement on the netlist, assigning each cell to a device site.
///
/// First generates a random initial placement drawn from the architecture's
/// real site list, then pulls netted cells toward a low-wirelength solution
/// with analytic global placement, then refines the result with simulated
/// annealing to minimize estimated wire length, timing, and congestion cost.
/// `seed` makes both the random and annealing phases reproducible.
pub fn place(netlist: &mut PnrNetlist, arch: &dyn Architecture, sink: &DiagnosticSink, seed: u64) {
    random::random_placement(netlist, arch, sink, seed);
    analytic::analytic_placement(netlist, arch, sink);
    anneal::simulated_annealing(netlist, arch, sink, seed.wrapping_add(1));
}
