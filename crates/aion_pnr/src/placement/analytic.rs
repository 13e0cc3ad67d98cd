//! Analytic global placement.
//!
//! Runs between the random initial placement and simulated annealing.
//! Builds a quadratic wirelength model of the netted cells (a star net
//! model centered on each net's driver, the usual clique-to-star weighting
//! `2/n` for an `n`-pin net), solves it per axis with Jacobi-preconditioned
//! conjugate gradient for continuous target coordinates, then legalizes
//! those targets onto real sites by recursive bisection. Cells with no
//! placed net, fixed cells, and cluster members are left untouched — the
//! model only ever reassigns standalone movable cells with at least one
//! net.

use crate::context::bind_bel;
use crate::data::PnrNetlist;
use crate::ids::PnrCellId;
use crate::placement::random::site_types_for;
use aion_arch::ids::SiteId;
use aion_arch::types::SiteType;
use aion_arch::Architecture;
use aion_common::PlaceStrength;
use aion_diagnostics::DiagnosticSink;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Refines the placement of netted, unclustered movable cells using a
/// quadratic wirelength model and recursive-bisection legalization.
///
/// Cells with no net, fixed cells, and clustered cells are left at whatever
/// placement they already hold going in.
pub(crate) fn analytic_placement(netlist: &mut PnrNetlist, arch: &dyn Architecture, _sink: &DiagnosticSink) {
    let roots = netted_movable_roots(netlist);
    if roots.len() < 2 {
        return;
    }
    let index_of: HashMap<PnrCellId, usize> =
        roots.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let sys_x = build_axis_system(netlist, arch, &index_of, Axis::X);
    let sys_y = build_axis_system(netlist, arch, &index_of, Axis::Y);

    let x0: Vec<f64> = roots.iter().map(|&c| coord(netlist, arch, c, Axis::X)).collect();
    let y0: Vec<f64> = roots.iter().map(|&c| coord(netlist, arch, c, Axis::Y)).collect();

    let xs = conjugate_gradient(&sys_x, x0, 100, 1e-6);
    let ys = conjugate_gradient(&sys_y, y0, 100, 1e-6);

    let targets: HashMap<PnrCellId, (f64, f64)> = roots
        .iter()
        .zip(xs.into_iter().zip(ys))
        .map(|(&c, (x, y))| (c, (x, y)))
        .collect();

    legalize(netlist, arch, &roots, &targets);
}

/// Returns the movable, unclustered cell roots that appear on at least one
/// net and currently hold a placement (the system has no anchor otherwise).
fn netted_movable_roots(netlist: &PnrNetlist) -> Vec<PnrCellId> {
    let mut netted: HashSet<PnrCellId> = HashSet::new();
    for net in &netlist.nets {
        netted.insert(cluster_root_of(netlist, netlist.pin(net.driver).cell));
        for &sink in &net.sinks {
            netted.insert(cluster_root_of(netlist, netlist.pin(sink).cell));
        }
    }
    netlist
        .cells
        .iter()
        .filter(|c| {
            !c.is_fixed
                && c.cluster_root.is_none()
                && c.children.is_empty()
                && c.placement.is_some()
                && netted.contains(&c.id)
        })
        .map(|c| c.id)
        .collect()
}

fn cluster_root_of(netlist: &PnrNetlist, cell: PnrCellId) -> PnrCellId {
    netlist.cell(cell).cluster_root.unwrap_or(cell)
}

fn coord(netlist: &PnrNetlist, arch: &dyn Architecture, cell: PnrCellId, axis: Axis) -> f64 {
    let Some(site) = netlist.cell(cell).placement else { return 0.0 };
    let Some(s) = arch.get_site(site) else { return 0.0 };
    match axis {
        Axis::X => s.tile_col as f64,
        Axis::Y => s.tile_row as f64,
    }
}

/// A sparse symmetric positive semi-definite system `A x = rhs`, stored as
/// a diagonal plus per-row off-diagonal entries.
struct SparseSystem {
    diag: Vec<f64>,
    off: Vec<Vec<(usize, f64)>>,
    rhs: Vec<f64>,
}

impl SparseSystem {
    fn new(n: usize) -> Self {
        Self {
            diag: vec![0.0; n],
            off: vec![Vec::new(); n],
            rhs: vec![0.0; n],
        }
    }

    /// Adds a spring of weight `w` between two movable rows.
    fn add_edge(&mut self, u: usize, v: usize, w: f64) {
        self.diag[u] += w;
        self.diag[v] += w;
        self.off[u].push((v, -w));
        self.off[v].push((u, -w));
    }

    /// Adds a spring of weight `w` between a movable row and a fixed point.
    fn add_anchor(&mut self, u: usize, w: f64, pos: f64) {
        self.diag[u] += w;
        self.rhs[u] += w * pos;
    }

    fn mul(&self, x: &[f64]) -> Vec<f64> {
        let mut y: Vec<f64> = self.diag.iter().zip(x).map(|(d, xi)| d * xi).collect();
        for (i, offs) in self.off.iter().enumerate() {
            for &(j, w) in offs {
                y[i] += w * x[j];
            }
        }
        y
    }
}

fn build_axis_system(
    netlist: &PnrNetlist,
    arch: &dyn Architecture,
    index_of: &HashMap<PnrCellId, usize>,
    axis: Axis,
) -> SparseSystem {
    let mut sys = SparseSystem::new(index_of.len());
    for net in &netlist.nets {
        let total_pins = 1 + net.sinks.len();
        if total_pins < 2 {
            continue;
        }
        let weight = 2.0 / total_pins as f64;
        let driver_root = cluster_root_of(netlist, netlist.pin(net.driver).cell);
        for &sink_pin in &net.sinks {
            let sink_root = cluster_root_of(netlist, netlist.pin(sink_pin).cell);
            if sink_root == driver_root {
                continue;
            }
            connect(&mut sys, netlist, arch, index_of, axis, driver_root, sink_root, weight);
        }
    }
    sys
}

fn connect(
    sys: &mut SparseSystem,
    netlist: &PnrNetlist,
    arch: &dyn Architecture,
    index_of: &HashMap<PnrCellId, usize>,
    axis: Axis,
    a: PnrCellId,
    b: PnrCellId,
    w: f64,
) {
    match (index_of.get(&a), index_of.get(&b)) {
        (Some(&ia), Some(&ib)) => sys.add_edge(ia, ib, w),
        (Some(&ia), None) => sys.add_anchor(ia, w, coord(netlist, arch, b, axis)),
        (None, Some(&ib)) => sys.add_anchor(ib, w, coord(netlist, arch, a, axis)),
        (None, None) => {}
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Solves `sys * x = sys.rhs` with Jacobi-preconditioned conjugate gradient,
/// starting from `x0`.
fn conjugate_gradient(sys: &SparseSystem, x0: Vec<f64>, max_iter: usize, tol: f64) -> Vec<f64> {
    let n = sys.rhs.len();
    if n == 0 {
        return x0;
    }
    let precond = |r: &[f64]| -> Vec<f64> {
        r.iter()
            .zip(&sys.diag)
            .map(|(ri, di)| if *di > 1e-9 { ri / di } else { *ri })
            .collect()
    };

    let mut x = x0;
    let ax = sys.mul(&x);
    let mut r: Vec<f64> = sys.rhs.iter().zip(&ax).map(|(b, a)| b - a).collect();
    let mut z = precond(&r);
    let mut p = z.clone();
    let mut rz_old = dot(&r, &z);

    for _ in 0..max_iter {
        if rz_old.abs() < tol {
            break;
        }
        let ap = sys.mul(&p);
        let pap = dot(&p, &ap);
        if pap.abs() < 1e-12 {
            break;
        }
        let alpha = rz_old / pap;
        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * ap[i];
        }
        if dot(&r, &r) < tol {
            break;
        }
        z = precond(&r);
        let rz_new = dot(&r, &z);
        let beta = rz_new / rz_old;
        for i in 0..n {
            p[i] = z[i] + beta * p[i];
        }
        rz_old = rz_new;
    }
    x
}

/// Assigns each root in `cells` a real site by splitting the group into two
/// halves (alternating x/y each level) and recursing until one cell
/// remains, at which point it takes the nearest still-free site to its
/// solved target.
fn legalize(
    netlist: &mut PnrNetlist,
    arch: &dyn Architecture,
    cells: &[PnrCellId],
    targets: &HashMap<PnrCellId, (f64, f64)>,
) {
    let mut by_type: HashMap<SiteType, Vec<PnrCellId>> = HashMap::new();
    for &cell in cells {
        let types = site_types_for(&netlist.cell(cell).cell_type);
        if let Some(&t) = types.first() {
            by_type.entry(t).or_default().push(cell);
        }
    }
    for (site_type, group) in by_type {
        let participating: HashSet<PnrCellId> = group.iter().copied().collect();
        let sites: Vec<SiteId> = arch
            .sites_of_type(site_type)
            .into_iter()
            .filter(|&s| occupant_of(netlist, s).map(|c| participating.contains(&c)).unwrap_or(true))
            .collect();
        bisect_assign(netlist, arch, &group, sites, targets, 0);
    }
}

fn occupant_of(netlist: &PnrNetlist, site: SiteId) -> Option<PnrCellId> {
    netlist.cells.iter().find(|c| c.placement == Some(site)).map(|c| c.id)
}

fn bisect_assign(
    netlist: &mut PnrNetlist,
    arch: &dyn Architecture,
    cells: &[PnrCellId],
    mut sites: Vec<SiteId>,
    targets: &HashMap<PnrCellId, (f64, f64)>,
    depth: usize,
) {
    if cells.is_empty() || sites.is_empty() {
        return;
    }
    if cells.len() == 1 {
        let target = targets.get(&cells[0]).copied().unwrap_or((0.0, 0.0));
        if let Some((idx, _)) = sites
            .iter()
            .enumerate()
            .min_by(|&(_, &a), &(_, &b)| {
                site_dist(arch, a, target)
                    .partial_cmp(&site_dist(arch, b, target))
                    .unwrap()
            })
        {
            let _ = bind_bel(netlist, cells[0], sites[idx], PlaceStrength::Weak);
        }
        return;
    }

    let use_x = depth % 2 == 0;
    let mut cells_sorted = cells.to_vec();
    cells_sorted.sort_by(|&a, &b| {
        target_coord(targets, a, use_x)
            .partial_cmp(&target_coord(targets, b, use_x))
            .unwrap()
    });
    sites.sort_by_key(|&s| {
        let site = arch.get_site(s);
        if use_x {
            site.map(|s| s.tile_col).unwrap_or(0)
        } else {
            site.map(|s| s.tile_row).unwrap_or(0)
        }
    });

    let cell_split = cells_sorted.len() / 2;
    let ratio = cell_split as f64 / cells_sorted.len() as f64;
    let site_split = ((sites.len() as f64) * ratio).round() as usize;
    let site_split = site_split.clamp(1, sites.len() - 1);

    let (cells_lo, cells_hi) = cells_sorted.split_at(cell_split);
    let sites_hi = sites.split_off(site_split);
    let sites_lo = sites;

    bisect_assign(netlist, arch, cells_lo, sites_lo, targets, depth + 1);
    bisect_assign(netlist, arch, cells_hi, sites_hi, targets, depth + 1);
}

fn target_coord(targets: &HashMap<PnrCellId, (f64, f64)>, cell: PnrCellId, use_x: bool) -> f64 {
    let (x, y) = targets.get(&cell).copied().unwrap_or((0.0, 0.0));
    if use_x {
        x
    } else {
        y
    }
}

fn site_dist(arch: &dyn Architecture, site: SiteId, target: (f64, f64)) -> f64 {
    let Some(s) = arch.get_site(site) else { return f64::MAX };
    let dx = s.tile_col as f64 - target.0;
    let dy = s.tile_row as f64 - target.1;
    (dx * dx + dy * dy).sqrt()
}
