//! Per-wire congestion state for PathFinder negotiated-congestion routing.
//!
//! Tracks how many nets use each wire this iteration (`curr_cong`), an
//! accumulated history penalty for wires that have been overused across
//! past iterations (`hist_cong_cost`), and the reserved-wire table built by
//! the fixed-point reservation pass before each routing sweep.

use aion_arch::ids::WireId;
use crate::ids::PnrNetId;
use std::collections::HashMap;

/// Tracks per-wire congestion state across PathFinder iterations.
#[derive(Debug, Clone)]
pub struct CongestionMap {
    /// Present demand: number of nets currently using each wire.
    curr_cong: HashMap<WireId, u32>,
    /// History cost: accumulated penalty for each wire across iterations.
    /// Absent entries read as `1.0`, matching the spec's "initially 1".
    hist_cong_cost: HashMap<WireId, f64>,
    /// A wire reserved to a single net by the fixed-point reservation pass.
    reserved_net: HashMap<WireId, PnrNetId>,
    /// Capacity of each wire (always 1 — a wire may carry only one net's
    /// signal, though a net may use it for more than one of its own sinks).
    capacity: u32,
    /// `router2/currCongWeightMult` — multiplies the present-congestion term.
    pub curr_cong_weight: f64,
    /// `router2/histCongWeight` — multiplies the per-iteration history bump.
    pub hist_cong_weight: f64,
}

impl CongestionMap {
    /// Creates a new congestion map with default parameters.
    pub fn new() -> Self {
        Self {
            curr_cong: HashMap::new(),
            hist_cong_cost: HashMap::new(),
            reserved_net: HashMap::new(),
            capacity: 1,
            curr_cong_weight: 1.0,
            hist_cong_weight: 1.0,
        }
    }

    /// Records that a net is using the given wire.
    pub fn add_usage(&mut self, wire: WireId) {
        *self.curr_cong.entry(wire).or_insert(0) += 1;
    }

    /// Removes a net's usage of the given wire (used when ripping up a net's
    /// old route before rerouting it within the same iteration).
    pub fn remove_usage(&mut self, wire: WireId) {
        if let Some(d) = self.curr_cong.get_mut(&wire) {
            *d = d.saturating_sub(1);
        }
    }

    /// The number of nets currently using `wire` this iteration.
    pub fn curr_cong(&self, wire: WireId) -> u32 {
        *self.curr_cong.get(&wire).unwrap_or(&0)
    }

    /// The accumulated history penalty for `wire` (`1.0` if never overused).
    pub fn hist_cong_cost(&self, wire: WireId) -> f64 {
        *self.hist_cong_cost.get(&wire).unwrap_or(&1.0)
    }

    /// Reserves `wire` to `net`, so no other net's search may step onto it.
    pub fn reserve(&mut self, wire: WireId, net: PnrNetId) {
        self.reserved_net.insert(wire, net);
    }

    /// The net `wire` is reserved to, if any.
    pub fn reserved_to(&self, wire: WireId) -> Option<PnrNetId> {
        self.reserved_net.get(&wire).copied()
    }

    /// Clears the reservation table (rebuilt fresh each iteration).
    pub fn clear_reservations(&mut self) {
        self.reserved_net.clear();
    }

    /// Returns whether any wire is overused (demand > capacity).
    pub fn has_congestion(&self) -> bool {
        self.curr_cong.values().any(|&d| d > self.capacity)
    }

    /// Returns the number of overused wires.
    pub fn overused_count(&self) -> usize {
        self.curr_cong.values().filter(|&&d| d > self.capacity).count()
    }

    /// The legacy scalar congestion cost of a wire (present penalty plus
    /// history), with no crit/self-use weighting. Used by callers that just
    /// want a rough per-wire cost without the full arc formula in
    /// [`crate::routing::astar`].
    pub fn wire_cost(&self, wire: WireId) -> f64 {
        let demand = self.curr_cong(wire);
        let present_penalty = if demand > self.capacity {
            (demand - self.capacity) as f64
        } else {
            0.0
        };
        present_penalty + (self.hist_cong_cost(wire) - 1.0)
    }

    /// Updates history costs at the end of an iteration: every overused
    /// wire's `hist_cong_cost` increases by `(curr_cong - 1) * hist_cong_weight`.
    pub fn update_history(&mut self) {
        for (&wire, &demand) in &self.curr_cong {
            if demand > self.capacity {
                let bump = (demand as f64 - 1.0) * self.hist_cong_weight;
                let entry = self.hist_cong_cost.entry(wire).or_insert(1.0);
                *entry += bump;
            }
        }
    }

    /// Resets all demand counters (called at the start of each iteration).
    pub fn reset_demand(&mut self) {
        self.curr_cong.clear();
    }
}

impl Default for CongestionMap {
    fn default() -> Self {
        Self::new()
    }
}
