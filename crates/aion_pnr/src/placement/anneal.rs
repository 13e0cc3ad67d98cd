//! Simulated annealing placement refinement.
//!
//! Starting from the initial placement, repeatedly proposes cell swaps
//! within a search diameter and accepts or rejects each move using the
//! Metropolis criterion. The temperature decreases geometrically; the
//! diameter adapts each temperature step toward a target acceptance rate so
//! moves stay local once the placement has mostly settled (the same
//! `rlim *= 1 - 0.44 + r_accept` update used by classic annealing placers).
//! Cluster roots move together with their children, validated against the
//! architecture at each candidate site. Movable cells are split into
//! disjoint x-coordinate bands that anneal independently in parallel, then
//! merge back through [`bind_bel`].

use crate::context::bind_bel;
use crate::data::{PnrCellId, PnrCellType, PnrNetlist};
use crate::placement::cost::{affected_nets, PlacementCost};
use aion_arch::ids::SiteId;
use aion_arch::Architecture;
use aion_common::{DeterministicRng, PlaceStrength};
use aion_diagnostics::DiagnosticSink;
use rayon::prelude::*;

/// Cooling rate for simulated annealing (multiplied each outer iteration).
const COOLING_RATE: f64 = 0.95;

/// Minimum temperature threshold to stop annealing.
const MIN_TEMPERATURE: f64 = 0.01;

/// Number of moves per temperature step, as a multiplier of cell count.
const MOVES_PER_TEMP_MULTIPLIER: usize = 10;

/// Acceptance rate the diameter controller steers toward.
const TARGET_ACCEPTANCE: f64 = 0.44;

/// Smallest the search diameter is allowed to shrink to.
const MIN_DIAMETER: f64 = 2.0;

/// Upper bound on how many x-bands the device is split into for parallel
/// annealing, regardless of how many threads rayon reports.
const MAX_PARTITIONS: usize = 4;

/// Refines cell placement using simulated annealing.
///
/// Splits movable cells into independent x-coordinate bands, anneals each
/// band in parallel against its own cloned netlist, then commits every
/// band's result back through [`bind_bel`]. Bands are geographically
/// disjoint so the merge never contends over a site.
pub(crate) fn simulated_annealing(
    netlist: &mut PnrNetlist,
    arch: &dyn Architecture,
    _sink: &DiagnosticSink,
    seed: u64,
) {
    let movable = movable_roots(netlist);
    if movable.len() < 2 {
        return;
    }

    let num_partitions = rayon::current_num_threads()
        .clamp(1, MAX_PARTITIONS)
        .min(movable.len());
    if num_partitions <= 1 {
        anneal_partition(netlist, arch, seed, &movable);
        return;
    }

    let bands = partition_by_x(netlist, arch, &movable, num_partitions);
    let partials: Vec<PnrNetlist> = bands
        .par_iter()
        .enumerate()
        .map(|(i, band)| {
            let mut clone = netlist.clone();
            anneal_partition(&mut clone, arch, seed.wrapping_add(i as u64 * 0x9e37_79b1), band);
            clone
        })
        .collect();

    for (band, partial) in bands.iter().zip(partials.iter()) {
        for &root in band {
            for member in cluster_members(partial, root) {
                if let Some(site) = partial.cell(member).placement {
                    let _ = bind_bel(netlist, member, site, PlaceStrength::Weak);
                }
            }
        }
    }
}

/// Anneals a single set of movable cluster roots in place.
fn anneal_partition(
    netlist: &mut PnrNetlist,
    arch: &dyn Architecture,
    seed: u64,
    movable: &[PnrCellId],
) {
    if movable.len() < 2 {
        return;
    }
    let mut rng = DeterministicRng::new(seed);
    let cost_fn = PlacementCost::default();
    let num_cells = movable.len();

    let (width, height) = arch.grid_dimensions();
    let max_diameter = width.max(height).max(1) as f64;
    let mut diameter = max_diameter;

    let mut temperature = (num_cells as f64).sqrt() * 2.0;
    let moves_per_temp = (MOVES_PER_TEMP_MULTIPLIER * num_cells).max(10);

    while temperature > MIN_TEMPERATURE {
        let mut accepted = 0;

        for _ in 0..moves_per_temp {
            let Some((a, b)) = select_swap_pair(&mut rng, netlist, arch, movable, diameter) else {
                continue;
            };

            let touched: Vec<PnrCellId> = cluster_members(netlist, a)
                .into_iter()
                .chain(cluster_members(netlist, b))
                .collect();
            let scoped_nets = affected_nets(netlist, &touched);
            let before = cost_fn.incremental_cost(netlist, arch, &scoped_nets);

            if !try_cluster_swap(netlist, arch, a, b) {
                continue;
            }

            let after = cost_fn.incremental_cost(netlist, arch, &scoped_nets);
            let delta = after - before;
            let accept = delta < 0.0 || rng.uniform() < (-delta / temperature).exp();

            if accept && moved_cells_valid(netlist, arch, &touched) {
                accepted += 1;
            } else {
                // Undo: swapping again restores each cluster's original site.
                try_cluster_swap(netlist, arch, a, b);
            }
        }

        temperature *= COOLING_RATE;
        let acceptance_rate = accepted as f64 / moves_per_temp as f64;
        diameter = adapt_diameter(diameter, acceptance_rate, max_diameter);
        if acceptance_rate < 0.001 {
            break;
        }
    }
}

/// Returns every cell that may be independently selected as a move anchor:
/// non-fixed cells that are not themselves a cluster child.
fn movable_roots(netlist: &PnrNetlist) -> Vec<PnrCellId> {
    netlist
        .cells
        .iter()
        .filter(|c| !c.is_fixed && c.cluster_root.is_none())
        .map(|c| c.id)
        .collect()
}

/// Returns `root` plus every cell clustered under it (empty for a
/// standalone cell).
fn cluster_members(netlist: &PnrNetlist, root: PnrCellId) -> Vec<PnrCellId> {
    let mut members = vec![root];
    members.extend(netlist.cell(root).children.iter().copied());
    members
}

/// Splits `movable` into `num_partitions` disjoint bands by current (or
/// default) x coordinate.
fn partition_by_x(
    netlist: &PnrNetlist,
    arch: &dyn Architecture,
    movable: &[PnrCellId],
    num_partitions: usize,
) -> Vec<Vec<PnrCellId>> {
    let (width, _) = arch.grid_dimensions();
    let band_width = (width.max(1) as f64 / num_partitions as f64).max(1.0);
    let mut bands = vec![Vec::new(); num_partitions];
    for &root in movable {
        let x = cell_coords(netlist, arch, root).0.max(0) as f64;
        let idx = ((x / band_width) as usize).min(num_partitions - 1);
        bands[idx].push(root);
    }
    bands
}

/// Selects two movable, type-compatible cells within `diameter` of each
/// other, trying up to 50 random pairs before giving up.
fn select_swap_pair(
    rng: &mut DeterministicRng,
    netlist: &PnrNetlist,
    arch: &dyn Architecture,
    movable: &[PnrCellId],
    diameter: f64,
) -> Option<(PnrCellId, PnrCellId)> {
    if movable.len() < 2 {
        return None;
    }
    for _ in 0..50 {
        let a = movable[rng.rng(movable.len())];
        let b = movable[rng.rng(movable.len())];
        if a == b {
            continue;
        }
        let cell_a = netlist.cell(a);
        let cell_b = netlist.cell(b);
        if !cell_type_compatible(&cell_a.cell_type, &cell_b.cell_type) {
            continue;
        }
        if within_diameter(netlist, arch, a, b, diameter) {
            return Some((a, b));
        }
    }
    None
}

fn within_diameter(
    netlist: &PnrNetlist,
    arch: &dyn Architecture,
    a: PnrCellId,
    b: PnrCellId,
    diameter: f64,
) -> bool {
    let (xa, ya) = cell_coords(netlist, arch, a);
    let (xb, yb) = cell_coords(netlist, arch, b);
    ((xa - xb).abs() + (ya - yb).abs()) as f64 <= diameter
}

fn cell_coords(netlist: &PnrNetlist, arch: &dyn Architecture, cell: PnrCellId) -> (i64, i64) {
    netlist
        .cell(cell)
        .placement
        .and_then(|s| arch.get_site(s))
        .map(|s| (s.tile_col as i64, s.tile_row as i64))
        .unwrap_or((0, 0))
}

/// Updates the search diameter toward [`TARGET_ACCEPTANCE`] acceptance.
fn adapt_diameter(diameter: f64, acceptance_rate: f64, max_diameter: f64) -> f64 {
    let factor = 1.0 - TARGET_ACCEPTANCE + acceptance_rate;
    (diameter * factor).clamp(MIN_DIAMETER, max_diameter)
}

/// Swaps cluster roots `a` and `b` onto each other's sites, moving every
/// child rigidly with its root. Calling this twice in a row restores the
/// original placement, since each call reads sites from the netlist's
/// current state rather than caching them.
///
/// Fails (and mutates nothing) if either cluster has no valid landing site
/// at the other's location, or if a child's target site is already held by
/// a cell outside the two clusters being swapped.
fn try_cluster_swap(
    netlist: &mut PnrNetlist,
    arch: &dyn Architecture,
    a: PnrCellId,
    b: PnrCellId,
) -> bool {
    let Some(site_a) = netlist.cell(a).placement else { return false; };
    let Some(site_b) = netlist.cell(b).placement else { return false; };

    let Some(targets_a) = cluster_target_sites(netlist, arch, a, site_b) else { return false; };
    let Some(targets_b) = cluster_target_sites(netlist, arch, b, site_a) else { return false; };

    let members_a: Vec<PnrCellId> = targets_a.iter().map(|&(c, _)| c).collect();
    let members_b: Vec<PnrCellId> = targets_b.iter().map(|&(c, _)| c).collect();
    let mut all_targets = targets_a;
    all_targets.extend(targets_b);

    if targets_conflict_externally(netlist, &members_a, &members_b, &all_targets) {
        return false;
    }

    for (cell, site) in all_targets {
        if bind_bel(netlist, cell, site, PlaceStrength::Weak).is_err() {
            return false;
        }
    }
    true
}

/// Computes the landing site for `root` and each of its children if `root`
/// were placed at `root_site`, validating each child's tile/BEL against the
/// architecture. Returns `None` if any member has no valid landing site.
fn cluster_target_sites(
    netlist: &PnrNetlist,
    arch: &dyn Architecture,
    root: PnrCellId,
    root_site: SiteId,
) -> Option<Vec<(PnrCellId, SiteId)>> {
    let root_cell = netlist.cell(root);
    let root_info = arch.get_site(root_site)?;
    let (root_col, root_row) = (root_info.tile_col as i64, root_info.tile_row as i64);

    let mut placements = vec![(root, root_site)];
    for &child in &root_cell.children {
        let c = netlist.cell(child);
        let col = root_col + c.dx as i64;
        let row = root_row + c.dy as i64;
        if col < 0 || row < 0 {
            return None;
        }
        let z = if c.abs_z { c.dz.max(0) as u32 } else { c.dz.max(0) as u32 };
        let bel = arch.bel_by_location(col as u32, row as u32, z)?;
        if !arch.is_bel_location_valid(bel) {
            return None;
        }
        let tile = arch.get_tile(col as u32, row as u32)?;
        let site_id = *tile.sites.first()?;
        placements.push((child, site_id));
    }
    Some(placements)
}

/// Returns `true` if any target site is already held by a cell outside
/// `members_a`/`members_b`.
fn targets_conflict_externally(
    netlist: &PnrNetlist,
    members_a: &[PnrCellId],
    members_b: &[PnrCellId],
    targets: &[(PnrCellId, SiteId)],
) -> bool {
    for &(_, site) in targets {
        if let Some(occupant) = netlist.cells.iter().find(|c| c.placement == Some(site)) {
            if !members_a.contains(&occupant.id) && !members_b.contains(&occupant.id) {
                return true;
            }
        }
    }
    false
}

/// Checks every moved cell's representative BEL against
/// [`Architecture::is_bel_location_valid`], reverting the move if any fails.
fn moved_cells_valid(netlist: &PnrNetlist, arch: &dyn Architecture, cells: &[PnrCellId]) -> bool {
    cells.iter().all(|&c| {
        let Some(site) = netlist.cell(c).placement else { return true };
        let Some(s) = arch.get_site(site) else { return false };
        match s.bels.first() {
            Some(bel) => arch.is_bel_location_valid(bel.id),
            None => true,
        }
    })
}

/// Returns whether two cell types can swap placement locations.
fn cell_type_compatible(a: &PnrCellType, b: &PnrCellType) -> bool {
    matches!(
        (a, b),
        (PnrCellType::Lut { .. }, PnrCellType::Lut { .. })
            | (PnrCellType::Dff, PnrCellType::Dff)
            | (PnrCellType::Carry, PnrCellType::Carry)
            | (PnrCellType::Carry, PnrCellType::Lut { .. })
            | (PnrCellType::Lut { .. }, PnrCellType::Carry)
            | (PnrCellType::Bram(_), PnrCellType::Bram(_))
            | (PnrCellType::Dsp(_), PnrCellType::Dsp(_))
            | (PnrCellType::Iobuf { .. }, PnrCellType::Iobuf { .. })
            | (PnrCellType::Pll(_), PnrCellType::Pll(_))
    )
}
