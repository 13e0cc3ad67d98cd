//! Resource usage counting for synthesized netlists.
//!
//! Walks the cells in a netlist and tallies LUTs, FFs, BRAMs, DSPs, and I/Os
//! to produce a [`ResourceUsage`] summary.

use crate::netlist::Netlist;
use aion_arch::ResourceUsage;
use aion_ir::{CellKind, PortDirection};

/// Counts resource usage from the cells in a netlist.
///
/// Examines each live cell and categorizes it as a LUT, FF, BRAM, DSP, or I/O
/// based on its [`CellKind`].
pub(crate) fn count_resources(netlist: &Netlist) -> ResourceUsage {
    let mut usage = ResourceUsage::default();

    for (cell_id, cell) in netlist.cells.iter() {
        if netlist.is_dead(cell_id) {
            continue;
        }

        match &cell.kind {
            CellKind::Lut { .. } => {
                // Each LUT counts as one LUT resource
                usage.luts += 1;
            }

            CellKind::Dff { width, .. } => {
                // Each DFF bit counts as one FF resource
                usage.ffs += *width;
            }

            CellKind::Latch { width } => {
                // Latches consume FF resources (implemented as FFs in most architectures)
                usage.ffs += *width;
            }

            CellKind::Bram(_) => {
                usage.bram += 1;
            }

            CellKind::Dsp(_) => {
                usage.dsp += 1;
            }

            CellKind::Iobuf(_) => {
                usage.io += 1;
            }

            CellKind::Pll(_) => {
                usage.pll += 1;
            }

            // Generic gates that haven't been tech-mapped yet
            // count as LUTs (approximate)
            CellKind::And { width }
            | CellKind::Or { width }
            | CellKind::Xor { width }
            | CellKind::Not { width } => {
                usage.luts += *width;
            }

            CellKind::Mux { width, .. } => {
                usage.luts += *width;
            }

            CellKind::Add { width }
            | CellKind::Sub { width }
            | CellKind::Shl { width }
            | CellKind::Shr { width } => {
                // Arithmetic uses roughly width LUTs
                usage.luts += *width;
            }

            CellKind::Mul { width } => {
                // Unmapped multiplier — very rough estimate
                usage.luts += width * width;
            }

            CellKind::Eq { width } | CellKind::Lt { width } => {
                usage.luts += *width;
            }

            CellKind::Carry { width } => {
                usage.luts += *width;
            }

            CellKind::Memory { depth, width, .. } => {
                // Unmapped memory — estimate as LUT-RAM
                usage.luts += depth * width / 16;
            }

            // These don't consume physical resources
            CellKind::Const { .. }
            | CellKind::Concat
            | CellKind::Slice { .. }
            | CellKind::Repeat { .. }
            | CellKind::Instance { .. }
            | CellKind::BlackBox { .. } => {}
        }
    }

    // Count I/O from ports
    for port in &netlist.ports {
        if port.direction == PortDirection::Input
            || port.direction == PortDirection::Output
            || port.direction == PortDirection::InOut
        {
            usage.io += 1;
        }
    }

    usage
}
