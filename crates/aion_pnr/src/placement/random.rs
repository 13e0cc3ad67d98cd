//! Random initial placement.
//!
//! Assigns each unplaced cell to a random compatible site, drawn from the
//! architecture's real site list (not a synthetic ID range), and commits it
//! through [`crate::context::bind_bel`] at [`PlaceStrength::Weak`] so the
//! binding layer's invariants (no two cells on one site) hold from the very
//! first placement, not just after detail placement.

use crate::context::bind_bel;
use crate::data::{PnrCellType, PnrNetlist};
use aion_arch::ids::SiteId;
use aion_arch::types::SiteType;
use aion_arch::Architecture;
use aion_common::{DeterministicRng, PlaceStrength};
use aion_diagnostics::DiagnosticSink;

/// Assigns each unplaced cell to a random site of a compatible type.
///
/// Fixed cells are left unchanged. Fails closed: a cell with no compatible
/// free site anywhere on the device is left unplaced (later stages may
/// legalize or report the shortfall).
pub(crate) fn random_placement(
    netlist: &mut PnrNetlist,
    arch: &dyn Architecture,
    _sink: &DiagnosticSink,
    seed: u64,
) {
    let mut rng = DeterministicRng::new(seed);
    let mut used_sites: std::collections::HashSet<SiteId> = netlist
        .cells
        .iter()
        .filter_map(|c| c.placement)
        .collect();

    for i in 0..netlist.cells.len() {
        if netlist.cells[i].placement.is_some() {
            continue;
        }
        let mut candidates = site_candidates_for_type(arch, &netlist.cells[i].cell_type);
        candidates.retain(|s| !used_sites.contains(s));
        if candidates.is_empty() {
            continue;
        }
        let idx = rng.rng(candidates.len());
        let site = candidates[idx];
        let cell_id = netlist.cells[i].id;
        if bind_bel(netlist, cell_id, site, PlaceStrength::Weak).is_ok() {
            used_sites.insert(site);
        }
    }
}

/// Returns every site a cell of the given type may legally occupy.
fn site_candidates_for_type(arch: &dyn Architecture, cell_type: &PnrCellType) -> Vec<SiteId> {
    let types = site_types_for(cell_type);
    types
        .into_iter()
        .flat_map(|t| arch.sites_of_type(t))
        .collect()
}

/// Maps a cell type to the site types it may be placed on.
pub(crate) fn site_types_for(cell_type: &PnrCellType) -> Vec<SiteType> {
    match cell_type {
        PnrCellType::Lut { .. } | PnrCellType::Carry => vec![SiteType::LutFf, SiteType::Alm],
        PnrCellType::Dff => vec![SiteType::LutFf, SiteType::Ff, SiteType::Alm],
        PnrCellType::Bram(_) => vec![SiteType::BramSite],
        PnrCellType::Dsp(_) => vec![SiteType::DspSite],
        PnrCellType::Iobuf { .. } => vec![SiteType::IoPad],
        PnrCellType::Pll(_) => vec![SiteType::Pll],
    }
}
