//! Routing engine for the PnR pipeline.
//!
//! Routes all nets in the netlist, connecting each driver pin to its sink
//! pins through the device's routing fabric. Uses the PathFinder negotiated
//! congestion algorithm with bidirectional A* search for individual net
//! arcs.

mod astar;
mod congestion;
mod pathfinder;

use crate::data::PnrNetlist;
use aion_arch::Architecture;
use aion_diagnostics::DiagnosticSink;

/// Routes all nets in the netlist.
///
/// Devices with no routing graph at all (no wires or pips) get direct stub
/// trees; every other device routes through [`pathfinder::pathfinder_route`].
pub fn route(netlist: &mut PnrNetlist, arch: &dyn Architecture, sink: &DiagnosticSink) {
    if arch.routing_graph().wires.is_empty() {
        pathfinder::stub_routing(netlist, sink);
    } else {
        pathfinder::pathfinder_route(netlist, arch, sink);
    }
}
