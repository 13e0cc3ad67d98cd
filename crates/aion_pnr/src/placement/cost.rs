//! Placement cost functions.
//!
//! Evaluates the quality of a placement using half-perimeter wire length
//! (HPWL) against each site's real grid coordinates, a timing-criticality
//! weighted wirelength term, and a density-based congestion estimate. The
//! total cost is a weighted sum used by simulated annealing to guide
//! placement optimization.

use crate::data::PnrNetlist;
use crate::ids::{PnrCellId, PnrNetId};
use aion_arch::ids::SiteId;
use aion_arch::Architecture;

/// Weights for the placement cost function components.
#[derive(Debug, Clone)]
pub struct PlacementCost {
    /// Weight for wire length (HPWL) component.
    pub weight_wirelength: f64,
    /// Weight for timing component.
    pub weight_timing: f64,
    /// Weight for congestion component.
    pub weight_congestion: f64,
}

impl Default for PlacementCost {
    fn default() -> Self {
        Self {
            weight_wirelength: 1.0,
            weight_timing: 0.5,
            weight_congestion: 0.1,
        }
    }
}

/// The bounding box and per-component costs of a single net.
struct NetCost {
    hpwl: f64,
    timing: f64,
    congestion: f64,
}

impl PlacementCost {
    /// Computes the total placement cost for the current netlist state.
    ///
    /// Returns a weighted sum of HPWL, a criticality-weighted wirelength
    /// penalty for timing-critical nets, and a bounding-box pin-density
    /// congestion estimate.
    pub fn total_cost(&self, netlist: &PnrNetlist, arch: &dyn Architecture) -> f64 {
        let mut total = 0.0;
        for i in 0..netlist.nets.len() {
            total += self.weighted_net_cost(netlist, arch, PnrNetId::from_raw(i as u32));
        }
        total
    }

    /// Computes the incremental cost change from swapping two cells: only
    /// recomputes the weighted cost for nets affected by the swapped cells,
    /// rather than recomputing the entire cost from scratch.
    pub fn incremental_cost(
        &self,
        netlist: &PnrNetlist,
        arch: &dyn Architecture,
        affected_nets: &[PnrNetId],
    ) -> f64 {
        affected_nets
            .iter()
            .map(|&id| self.weighted_net_cost(netlist, arch, id))
            .sum()
    }

    fn weighted_net_cost(&self, netlist: &PnrNetlist, arch: &dyn Architecture, net_id: PnrNetId) -> f64 {
        let Some(nc) = net_cost(netlist, arch, net_id) else {
            return 0.0;
        };
        self.weight_wirelength * nc.hpwl + self.weight_timing * nc.timing + self.weight_congestion * nc.congestion
    }
}

/// Computes the total half-perimeter wire length across all nets.
///
/// HPWL is the half-perimeter of the bounding box of all pins on each net,
/// using each cell's real site coordinates on `arch`'s grid.
pub fn total_hpwl(netlist: &PnrNetlist, arch: &dyn Architecture) -> f64 {
    let mut total = 0.0;
    for i in 0..netlist.nets.len() {
        total += net_hpwl(netlist, arch, PnrNetId::from_raw(i as u32));
    }
    total
}

/// Computes the HPWL for a single net.
fn net_hpwl(netlist: &PnrNetlist, arch: &dyn Architecture, net_id: PnrNetId) -> f64 {
    net_cost(netlist, arch, net_id).map(|c| c.hpwl).unwrap_or(0.0)
}

/// Computes the bounding box and derived costs of one net, or `None` if
/// fewer than one of its pins is placed.
fn net_cost(netlist: &PnrNetlist, arch: &dyn Architecture, net_id: PnrNetId) -> Option<NetCost> {
    let net = netlist.net(net_id);

    let mut min_x = i64::MAX;
    let mut max_x = i64::MIN;
    let mut min_y = i64::MAX;
    let mut max_y = i64::MIN;

    let driver_cell = netlist.pin(net.driver).cell;
    if let Some(site) = netlist.cell(driver_cell).placement {
        let (x, y) = site_coords(arch, site);
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    for &sink_pin in &net.sinks {
        let sink_cell = netlist.pin(sink_pin).cell;
        if let Some(site) = netlist.cell(sink_cell).placement {
            let (x, y) = site_coords(arch, site);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_x == i64::MAX {
        return None;
    }

    let hpwl = (max_x - min_x + max_y - min_y) as f64;
    let timing = if net.timing_critical { hpwl } else { 0.0 };
    let area = ((max_x - min_x + 1) * (max_y - min_y + 1)) as f64;
    let pins = 1.0 + net.sinks.len() as f64;
    let congestion = (pins * pins) / area;

    Some(NetCost {
        hpwl,
        timing,
        congestion,
    })
}

/// Returns the real `(col, row)` grid coordinates of a site, or `(0, 0)` if
/// the site does not exist on this device.
fn site_coords(arch: &dyn Architecture, site: SiteId) -> (i64, i64) {
    arch.get_site(site)
        .map(|s| (s.tile_col as i64, s.tile_row as i64))
        .unwrap_or((0, 0))
}

/// Returns the list of net IDs touching any of the given cells, used to
/// scope [`PlacementCost::incremental_cost`] after a move.
pub fn affected_nets(netlist: &PnrNetlist, cells: &[PnrCellId]) -> Vec<PnrNetId> {
    let mut nets = std::collections::HashSet::new();

    for pin in &netlist.pins {
        if cells.contains(&pin.cell) {
            if let Some(net_id) = pin.net {
                nets.insert(net_id);
            }
        }
    }

    for (i, net) in netlist.nets.iter().enumerate() {
        let driver_cell = netlist.pin(net.driver).cell;
        if cells.contains(&driver_cell) {
            nets.insert(PnrNetId::from_raw(i as u32));
        }
        for &sink in &net.sinks {
            let sink_cell = netlist.pin(sink).cell;
            if cells.contains(&sink_cell) {
                nets.insert(PnrNetId::from_raw(i as u32));
            }
        }
    }

    nets.into_iter().collect()
}
