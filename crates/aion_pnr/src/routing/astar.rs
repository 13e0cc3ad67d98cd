//! Bidirectional A* search for single-net arc routing.
//!
//! Finds the lowest-cost wire/pip path from a driver wire to a sink wire
//! through the device routing graph, following the §4.6 cost model: a
//! forward queue expands downhill from the source, a backward queue expands
//! uphill from the sink, and the arc is routed as soon as one queue dequeues
//! a wire the other has already visited.

use crate::ids::PnrNetId;
use crate::route_tree::{RouteNode, RouteResource, RouteTree};
use crate::routing::congestion::CongestionMap;
use aion_arch::ids::{PipId, WireId};
use aion_arch::Architecture;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Tunable weights for the arc cost formula (the `router2/*` settings).
#[derive(Debug, Clone)]
pub struct RouteCostParams {
    /// `router2/biasCostFactor` — weight of the bounding-box bias term.
    pub bias_cost_factor: f64,
    /// `router2/ipinCostAdder` — fixed adder on the togo estimate.
    pub ipin_cost_adder: f64,
}

impl Default for RouteCostParams {
    fn default() -> Self {
        Self {
            bias_cost_factor: 0.25,
            ipin_cost_adder: 0.15,
        }
    }
}

/// Net-level context shared by every arc of one net being routed this
/// iteration: criticality, bounding-box center/size for the bias term, this
/// net's own wire usage so far (the shared-route `self_use` discount), and
/// an optional search bounding box (cleared on retry).
#[derive(Debug, Clone)]
pub(crate) struct ArcContext<'a> {
    pub net: PnrNetId,
    pub crit: f64,
    pub users: usize,
    pub cx: f64,
    pub cy: f64,
    pub hpwl: f64,
    pub self_use: &'a HashMap<WireId, u32>,
    pub bbox: Option<(u32, u32, u32, u32)>,
}

/// A search state in the A* priority queue.
#[derive(Debug, Clone)]
struct AStarState {
    wire: WireId,
    cost: f64,
    estimated_total: f64,
}

impl PartialEq for AStarState {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_total == other.estimated_total
    }
}

impl Eq for AStarState {}

impl Ord for AStarState {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimated_total
            .partial_cmp(&self.estimated_total)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for AStarState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One direction's transient search state, cleared between arc routes.
struct Frontier {
    open: BinaryHeap<AStarState>,
    cost: HashMap<WireId, f64>,
    /// `wire -> (prev_wire, pip used to reach wire from prev_wire)`, read in
    /// the direction search proceeds (source->out for fwd, sink->in for bwd).
    pip_link: HashMap<WireId, (WireId, PipId)>,
    visited: std::collections::HashSet<WireId>,
}

impl Frontier {
    fn new(start: WireId, start_cost: f64, heuristic: f64) -> Self {
        let mut open = BinaryHeap::new();
        let mut cost = HashMap::new();
        cost.insert(start, start_cost);
        open.push(AStarState {
            wire: start,
            cost: start_cost,
            estimated_total: start_cost + heuristic,
        });
        Self {
            open,
            cost,
            pip_link: HashMap::new(),
            visited: std::collections::HashSet::new(),
        }
    }
}

const MAX_EXPANSIONS: usize = 20_000;

/// Finds a route from `source_wire` to `sink_wire`.
///
/// Tries the supplied bounding box first; if that fails and a bounding box
/// was given, retries once unrestricted (spec §4.6 "one retry is made
/// without the bounding box").
pub(crate) fn astar_route(
    arch: &dyn Architecture,
    congestion: &CongestionMap,
    params: &RouteCostParams,
    ctx: &ArcContext,
    source_wire: WireId,
    sink_wire: WireId,
) -> Option<(Vec<WireId>, Vec<PipId>)> {
    if let Some(path) = search(arch, congestion, params, ctx, source_wire, sink_wire, ctx.bbox) {
        return Some(path);
    }
    if ctx.bbox.is_some() {
        return search(arch, congestion, params, ctx, source_wire, sink_wire, None);
    }
    None
}

fn in_bbox(arch: &dyn Architecture, wire: WireId, bbox: Option<(u32, u32, u32, u32)>) -> bool {
    let Some((min_x, min_y, max_x, max_y)) = bbox else {
        return true;
    };
    match arch.routing_graph().wire(wire) {
        Some(w) => w.x >= min_x && w.x <= max_x && w.y >= min_y && w.y <= max_y,
        None => true,
    }
}

fn crit_weight(crit: f64) -> f64 {
    (1.0 - crit * crit).max(0.05)
}

/// The §4.6 `score` for stepping onto `wire` via a pip whose architectural
/// delay is `base`.
fn edge_score(
    congestion: &CongestionMap,
    params: &RouteCostParams,
    ctx: &ArcContext,
    wire: WireId,
    base: f64,
    wire_xy: (u32, u32),
) -> f64 {
    let cw = crit_weight(ctx.crit);
    let self_use = *ctx.self_use.get(&wire).unwrap_or(&0);
    let curr = congestion.curr_cong(wire);
    let present = 1.0 + curr.saturating_sub(self_use) as f64 * congestion.curr_cong_weight * cw;
    let hist = 1.0 + cw * (congestion.hist_cong_cost(wire) - 1.0);
    let denom = 1.0 + self_use as f64 * cw;
    let score = base * hist * present / denom;
    let bias = if ctx.hpwl > 0.0 {
        let (wx, wy) = wire_xy;
        let dist = (wx as f64 - ctx.cx).abs() + (wy as f64 - ctx.cy).abs();
        params.bias_cost_factor * (base / ctx.users.max(1) as f64) * (dist / ctx.hpwl)
    } else {
        0.0
    };
    score + bias
}

fn togo(arch: &dyn Architecture, params: &RouteCostParams, ctx: &ArcContext, wire: WireId, sink: WireId) -> f64 {
    let cw = crit_weight(ctx.crit);
    let self_use = *ctx.self_use.get(&wire).unwrap_or(&0);
    arch.estimate_delay(wire, sink).max_ns / (1.0 + self_use as f64 * cw) + params.ipin_cost_adder
}

#[allow(clippy::too_many_arguments)]
fn search(
    arch: &dyn Architecture,
    congestion: &CongestionMap,
    params: &RouteCostParams,
    ctx: &ArcContext,
    source_wire: WireId,
    sink_wire: WireId,
    bbox: Option<(u32, u32, u32, u32)>,
) -> Option<(Vec<WireId>, Vec<PipId>)> {
    if source_wire == sink_wire {
        return Some((vec![source_wire], Vec::new()));
    }
    if let Some(owner) = congestion.reserved_to(source_wire) {
        if owner != ctx.net {
            return None;
        }
    }

    let mut fwd = Frontier::new(source_wire, 0.0, togo(arch, params, ctx, source_wire, sink_wire));
    let mut bwd = Frontier::new(sink_wire, 0.0, togo(arch, params, ctx, sink_wire, source_wire));

    let mut expansions = 0;
    while (!fwd.open.is_empty() || !bwd.open.is_empty()) && expansions < MAX_EXPANSIONS {
        expansions += 1;

        // Expand whichever frontier has the lower best estimate this round.
        let expand_fwd = match (fwd.open.peek(), bwd.open.peek()) {
            (Some(f), Some(b)) => f.estimated_total <= b.estimated_total,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if expand_fwd {
            let current = fwd.open.pop().unwrap();
            if bwd.visited.contains(&current.wire) || current.wire == sink_wire {
                return Some(reconstruct(&fwd, &bwd, source_wire, sink_wire, current.wire));
            }
            if fwd.visited.contains(&current.wire) {
                continue;
            }
            fwd.visited.insert(current.wire);

            for pip in arch.pips_downhill(current.wire) {
                let Some(next) = arch.pip_dst_wire(pip) else { continue };
                if let Some(owner) = congestion.reserved_to(next) {
                    if owner != ctx.net {
                        continue;
                    }
                }
                if !in_bbox(arch, next, bbox) {
                    continue;
                }
                let wire_xy = arch
                    .routing_graph()
                    .wire(next)
                    .map(|w| (w.x, w.y))
                    .unwrap_or((0, 0));
                let base = arch.pip_delay(pip).max_ns + arch.wire_delay(next).max_ns + 1e-6;
                let edge_cost = edge_score(congestion, params, ctx, next, base, wire_xy);
                let tentative = current.cost + edge_cost;
                if tentative < *fwd.cost.get(&next).unwrap_or(&f64::INFINITY) {
                    fwd.cost.insert(next, tentative);
                    fwd.pip_link.insert(next, (current.wire, pip));
                    fwd.open.push(AStarState {
                        wire: next,
                        cost: tentative,
                        estimated_total: tentative + togo(arch, params, ctx, next, sink_wire),
                    });
                }
            }
        } else {
            let current = bwd.open.pop().unwrap();
            if fwd.visited.contains(&current.wire) || current.wire == source_wire {
                return Some(reconstruct(&fwd, &bwd, source_wire, sink_wire, current.wire));
            }
            if bwd.visited.contains(&current.wire) {
                continue;
            }
            bwd.visited.insert(current.wire);

            for pip in arch.pips_uphill(current.wire) {
                let Some(prev) = arch.pip_src_wire(pip) else { continue };
                if let Some(owner) = congestion.reserved_to(prev) {
                    if owner != ctx.net {
                        continue;
                    }
                }
                if !in_bbox(arch, prev, bbox) {
                    continue;
                }
                let wire_xy = arch
                    .routing_graph()
                    .wire(prev)
                    .map(|w| (w.x, w.y))
                    .unwrap_or((0, 0));
                let base = arch.pip_delay(pip).max_ns + arch.wire_delay(prev).max_ns + 1e-6;
                let edge_cost = edge_score(congestion, params, ctx, prev, base, wire_xy);
                let tentative = current.cost + edge_cost;
                if tentative < *bwd.cost.get(&prev).unwrap_or(&f64::INFINITY) {
                    bwd.cost.insert(prev, tentative);
                    bwd.pip_link.insert(prev, (current.wire, pip));
                    bwd.open.push(AStarState {
                        wire: prev,
                        cost: tentative,
                        estimated_total: tentative + togo(arch, params, ctx, prev, source_wire),
                    });
                }
            }
        }
    }

    None
}

/// Reconstructs the full source->sink wire/pip chain from both frontiers,
/// given the midpoint wire where they met.
fn reconstruct(
    fwd: &Frontier,
    bwd: &Frontier,
    source_wire: WireId,
    sink_wire: WireId,
    midpoint: WireId,
) -> (Vec<WireId>, Vec<PipId>) {
    let mut wires_rev = vec![midpoint];
    let mut pips_rev = Vec::new();
    let mut cur = midpoint;
    while cur != source_wire {
        match fwd.pip_link.get(&cur) {
            Some(&(prev, pip)) => {
                pips_rev.push(pip);
                wires_rev.push(prev);
                cur = prev;
            }
            None => break,
        }
    }
    wires_rev.reverse();
    pips_rev.reverse();
    let mut wires = wires_rev;
    let mut pips = pips_rev;

    let mut cur = midpoint;
    while cur != sink_wire {
        match bwd.pip_link.get(&cur) {
            Some(&(next, pip)) => {
                pips.push(pip);
                wires.push(next);
                cur = next;
            }
            None => break,
        }
    }

    (wires, pips)
}

/// Builds a [`RouteTree`] from a linear wire/pip chain (driver to one sink).
pub(crate) fn tree_from_chain(wires: &[WireId], pips: &[PipId]) -> RouteTree {
    assert_eq!(wires.len(), pips.len() + 1);
    let mut nodes: Vec<RouteNode> = wires
        .iter()
        .map(|&w| RouteNode {
            resource: RouteResource::Wire(w),
            children: Vec::new(),
        })
        .collect();
    for i in (0..pips.len()).rev() {
        let pip_node = RouteNode {
            resource: RouteResource::Pip(pips[i]),
            children: vec![nodes.pop().unwrap()],
        };
        nodes[i].children = vec![pip_node];
    }
    RouteTree::new(nodes.pop().unwrap())
}
