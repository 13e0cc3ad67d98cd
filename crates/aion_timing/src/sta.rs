//! Static timing analysis (STA) engine.
//!
//! Performs an explicit topological walk of a [`TimingGraph`], discovers the
//! clock domains that reach each port, then runs a forward pass (arrival
//! times) and a backward pass (required times) per domain to compute slack
//! and criticality at every endpoint. Extracts critical paths by
//! backtracking from the worst-slack endpoints.
//!
//! The STA algorithm handles:
//! - Multiple clock domains, each analyzed independently (intra-clock paths
//!   only; a path that launches in one clock domain and captures in another
//!   is not yet constrained)
//! - Setup and hold time checks at flip-flop data pins
//! - Combinational loops, reported as a hard failure unless the caller opts
//!   into forcing them open
//! - Per-arc criticality and budget, for use by the placer and router

use crate::constraints::TimingConstraints;
use crate::graph::{TimingEdgeType, TimingGraph, TimingNodeType};
use crate::ids::{TimingEdgeId, TimingNodeId};
use crate::report::{ClockDomainTiming, CriticalPath, PathElement, TimingEndpoint, TimingReport};
use aion_common::{AionResult, Ident, InternalError, Interner};
use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use aion_source::Span;
use std::collections::{HashMap, HashSet, VecDeque};

/// Maximum number of critical paths to report per clock domain.
const MAX_CRITICAL_PATHS: usize = 10;

/// A clock domain: either a specific clock net (launched or captured by a
/// `ClockToQ`/`SetupCheck` edge whose source resolves to a known clock
/// constraint) or the catch-all domain used for purely-combinational paths
/// and designs with no modeled clock net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Domain {
    /// A named clock domain, keyed by the clock's interned name.
    Clock(Ident),
    /// The default domain: unregistered I/O paths, or any graph with no
    /// explicit clock edges at all. Constrained against the first defined
    /// clock's period, if any.
    Default,
}

/// The full result of a static timing analysis run, including per-port
/// criticality and slack for use by the placer and router.
#[derive(Debug, Clone)]
pub struct TimingAnalysis {
    /// The summarized report (critical paths, per-domain slack, frequency).
    pub report: TimingReport,
    criticality: HashMap<TimingNodeId, f64>,
    slack: HashMap<TimingNodeId, f64>,
    budget: HashMap<TimingEdgeId, f64>,
}

impl TimingAnalysis {
    /// Returns the criticality of `node`, clamped to `[0, 1]`.
    ///
    /// Nodes that take part in no intra-clock domain pair (e.g. an
    /// unconstrained cross-clock path) report `0.0`.
    pub fn criticality(&self, node: TimingNodeId) -> f64 {
        self.criticality.get(&node).copied().unwrap_or(0.0)
    }

    /// Returns the worst setup slack observed at `node` across every domain
    /// pair it participates in, in nanoseconds.
    ///
    /// Nodes outside any intra-clock domain pair report `f64::INFINITY`
    /// (unconstrained).
    pub fn setup_slack(&self, node: TimingNodeId) -> f64 {
        self.slack.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    /// Returns the router guidance budget assigned to `edge`, in
    /// nanoseconds. Edges not on any analyzed path report `0.0`.
    pub fn budget(&self, edge: TimingEdgeId) -> f64 {
        self.budget.get(&edge).copied().unwrap_or(0.0)
    }
}

/// Performs static timing analysis on the given timing graph.
///
/// This is the full entry point: it runs topological ordering, combinational
/// loop detection, domain discovery, the per-domain forward/backward passes,
/// and budget assignment, returning everything a placer or router needs.
///
/// If `ignore_loops` is `false` (the default via [`analyze_timing`]), a
/// combinational loop is reported and analysis fails. If `true`, the loop is
/// forced open at one port, a warning is emitted to `sink`, and analysis
/// proceeds; every node's criticality still comes out in `[0, 1]`.
pub fn analyze(
    graph: &TimingGraph,
    constraints: &TimingConstraints,
    interner: &Interner,
    sink: &DiagnosticSink,
    ignore_loops: bool,
) -> AionResult<TimingAnalysis> {
    if graph.node_count() == 0 {
        return Ok(TimingAnalysis {
            report: TimingReport::empty(),
            criticality: HashMap::new(),
            slack: HashMap::new(),
            budget: HashMap::new(),
        });
    }

    let order = topo_order(graph, ignore_loops, sink)?;
    let (fwd_domains, bwd_domains) = discover_domains(graph, constraints, interner, &order);

    let mut all_domains: HashSet<Domain> = HashSet::new();
    for set in fwd_domains.values() {
        all_domains.extend(set.iter().copied());
    }
    for set in bwd_domains.values() {
        all_domains.extend(set.iter().copied());
    }
    if all_domains.is_empty() {
        all_domains.insert(Domain::Default);
    }

    let mut arrival_by_domain: HashMap<Domain, HashMap<TimingNodeId, f64>> = HashMap::new();
    let mut required_by_domain: HashMap<Domain, HashMap<TimingNodeId, f64>> = HashMap::new();
    for &domain in &all_domains {
        arrival_by_domain.insert(domain, forward_pass(graph, &order, domain, &fwd_domains));
        required_by_domain.insert(
            domain,
            backward_pass(graph, &order, domain, &bwd_domains, constraints, interner),
        );
    }

    let n = graph.node_count();
    let mut arrival = vec![0.0_f64; n];
    let mut required = vec![f64::INFINITY; n];
    for &node in &order {
        let idx = node.as_raw() as usize;
        if let Some(fset) = fwd_domains.get(&node) {
            let best = fset
                .iter()
                .filter_map(|d| arrival_by_domain[d].get(&node))
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            if best.is_finite() {
                arrival[idx] = best;
            }
        }
        if let Some(bset) = bwd_domains.get(&node) {
            let best = bset
                .iter()
                .filter_map(|d| required_by_domain[d].get(&node))
                .copied()
                .fold(f64::INFINITY, f64::min);
            required[idx] = best;
        }
    }

    let slack: Vec<f64> = arrival
        .iter()
        .zip(required.iter())
        .map(|(a, r)| r - a)
        .collect();

    let sink_nodes = graph.sink_nodes();
    let worst_slack = if sink_nodes.is_empty() {
        0.0
    } else {
        sink_nodes
            .iter()
            .map(|n| slack[n.as_raw() as usize])
            .fold(f64::INFINITY, f64::min)
    };

    let mut critical_paths = extract_critical_paths(graph, &arrival, &slack, &sink_nodes, interner);
    critical_paths.sort_by(|a, b| a.slack_ns.partial_cmp(&b.slack_ns).unwrap());
    critical_paths.truncate(MAX_CRITICAL_PATHS);

    let clock_domains = build_clock_domain_summaries(constraints, interner, &critical_paths);
    let (target_freq, achieved_freq) = compute_frequencies(constraints, interner, worst_slack);
    let met = worst_slack >= 0.0 || worst_slack == f64::INFINITY;

    if !met {
        sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Timing, 10),
            format!(
                "timing not met: worst negative slack = {:.3} ns",
                worst_slack
            ),
            Span::DUMMY,
        ));
    }

    let report = TimingReport {
        clock_domains,
        critical_paths,
        worst_slack_ns: if worst_slack == f64::INFINITY {
            0.0
        } else {
            worst_slack
        },
        achieved_frequency_mhz: achieved_freq,
        target_frequency_mhz: target_freq,
        met,
    };

    let (criticality, node_slack) = assign_criticality(
        &order,
        &all_domains,
        &fwd_domains,
        &bwd_domains,
        &arrival_by_domain,
        &required_by_domain,
        constraints,
    );
    let budget = assign_budget(
        graph,
        &order,
        &all_domains,
        &fwd_domains,
        &bwd_domains,
        &arrival_by_domain,
        &required_by_domain,
        constraints,
    );

    Ok(TimingAnalysis {
        report,
        criticality,
        slack: node_slack,
        budget,
    })
}

/// Performs static timing analysis and returns just the summary report.
///
/// Equivalent to `analyze(..., ignore_loops: false)?.report`. Callers that
/// need per-port criticality or setup slack (the placer and router) should
/// call [`analyze`] directly instead.
pub fn analyze_timing(
    graph: &TimingGraph,
    constraints: &TimingConstraints,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> AionResult<TimingReport> {
    analyze(graph, constraints, interner, sink, false).map(|a| a.report)
}

/// Returns a topological order over `graph`'s nodes, following every edge
/// except setup/hold checks (which constrain timing but don't order it).
///
/// Startpoints (nodes with no such incoming edge — primary inputs, clock
/// pins, and register outputs) seed the walk. If nodes remain unordered once
/// the walk stalls, they participate in a combinational loop: unless
/// `ignore_loops` is set, this is reported as a hard failure. Otherwise the
/// loop is forced open one port at a time, highest node index first, and a
/// warning is emitted to `sink`.
fn topo_order(
    graph: &TimingGraph,
    ignore_loops: bool,
    sink: &DiagnosticSink,
) -> AionResult<Vec<TimingNodeId>> {
    let n = graph.node_count();
    let mut indeg = vec![0u32; n];
    let mut succs: Vec<Vec<TimingNodeId>> = vec![Vec::new(); n];
    for edge in &graph.edges {
        if is_check_edge(edge.edge_type) {
            continue;
        }
        indeg[edge.to.as_raw() as usize] += 1;
        succs[edge.from.as_raw() as usize].push(edge.to);
    }

    let mut queue: VecDeque<TimingNodeId> = (0..n as u32)
        .map(TimingNodeId::from_raw)
        .filter(|id| indeg[id.as_raw() as usize] == 0)
        .collect();

    let mut order = Vec::with_capacity(n);
    let mut seen = vec![false; n];
    while let Some(node) = queue.pop_front() {
        let idx = node.as_raw() as usize;
        if seen[idx] {
            continue;
        }
        seen[idx] = true;
        order.push(node);
        for &succ in &succs[idx] {
            let sidx = succ.as_raw() as usize;
            if indeg[sidx] > 0 {
                indeg[sidx] -= 1;
            }
            if indeg[sidx] == 0 && !seen[sidx] {
                queue.push_back(succ);
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    let mut remaining: HashSet<TimingNodeId> = (0..n as u32)
        .map(TimingNodeId::from_raw)
        .filter(|id| !seen[id.as_raw() as usize])
        .collect();

    if !ignore_loops {
        let mut names: Vec<&str> = remaining
            .iter()
            .map(|&id| graph.node(id).name.as_str())
            .collect();
        names.sort_unstable();
        return Err(InternalError::new(format!(
            "combinational loop detected through port(s): {}",
            names.join(", ")
        )));
    }

    sink.emit(Diagnostic::warning(
        DiagnosticCode::new(Category::Timing, 11),
        format!(
            "combinational loop forced through {} port(s); timing through these ports is approximate",
            remaining.len()
        ),
        Span::DUMMY,
    ));

    while !remaining.is_empty() {
        let forced = *remaining.iter().max_by_key(|id| id.as_raw()).unwrap();
        remaining.remove(&forced);
        seen[forced.as_raw() as usize] = true;
        order.push(forced);
        queue.push_back(forced);
        while let Some(node) = queue.pop_front() {
            let idx = node.as_raw() as usize;
            for &succ in &succs[idx] {
                let sidx = succ.as_raw() as usize;
                if indeg[sidx] > 0 {
                    indeg[sidx] -= 1;
                }
                if indeg[sidx] == 0 && !seen[sidx] && remaining.contains(&succ) {
                    seen[sidx] = true;
                    remaining.remove(&succ);
                    order.push(succ);
                    queue.push_back(succ);
                }
            }
        }
    }

    Ok(order)
}

fn is_check_edge(edge_type: TimingEdgeType) -> bool {
    matches!(edge_type, TimingEdgeType::SetupCheck | TimingEdgeType::HoldCheck)
}

/// Resolves the clock constraint driving `clk_node`, by substring match of
/// the clock's port name against the node's display name (the graph has no
/// typed link from a timing node back to a net).
fn clock_for_node(
    graph: &TimingGraph,
    constraints: &TimingConstraints,
    interner: &Interner,
    clk_node: TimingNodeId,
) -> Domain {
    let name = &graph.node(clk_node).name;
    constraints
        .clocks
        .iter()
        .find(|c| name.contains(interner.resolve(c.port)))
        .map(|c| Domain::Clock(c.name))
        .unwrap_or(Domain::Default)
}

/// Discovers, for every node, the set of domains that reach it forward
/// (arrival domains, seeded at register outputs and other startpoints) and
/// backward (required domains, seeded at register inputs and other
/// endpoints).
fn discover_domains(
    graph: &TimingGraph,
    constraints: &TimingConstraints,
    interner: &Interner,
    order: &[TimingNodeId],
) -> (
    HashMap<TimingNodeId, HashSet<Domain>>,
    HashMap<TimingNodeId, HashSet<Domain>>,
) {
    let mut fwd: HashMap<TimingNodeId, HashSet<Domain>> = HashMap::new();
    let mut bwd: HashMap<TimingNodeId, HashSet<Domain>> = HashMap::new();

    for edge in &graph.edges {
        match edge.edge_type {
            TimingEdgeType::ClockToQ => {
                let domain = clock_for_node(graph, constraints, interner, edge.from);
                fwd.entry(edge.to).or_default().insert(domain);
            }
            TimingEdgeType::SetupCheck => {
                let domain = clock_for_node(graph, constraints, interner, edge.from);
                bwd.entry(edge.to).or_default().insert(domain);
            }
            _ => {}
        }
    }

    // STARTPOINT: every node with no incoming precedence edge at all
    // (primary inputs, clock pins) that wasn't already seeded above.
    let has_incoming_precedence: HashSet<TimingNodeId> = graph
        .edges
        .iter()
        .filter(|e| !is_check_edge(e.edge_type))
        .map(|e| e.to)
        .collect();
    for &node in order {
        if !has_incoming_precedence.contains(&node) {
            fwd.entry(node).or_default().insert(Domain::Default);
        }
    }

    for &node in order {
        let incoming: Vec<Domain> = graph
            .incoming_edges(node)
            .iter()
            .filter(|e| !is_check_edge(e.edge_type))
            .flat_map(|e| fwd.get(&e.from).into_iter().flatten().copied())
            .collect();
        if !incoming.is_empty() {
            fwd.entry(node).or_default().extend(incoming);
        }
    }

    // Every pure sink (no outgoing precedence edge) is an endpoint; seed the
    // default domain there unless a setup check already gave it one.
    for &node in order.iter().rev() {
        let is_pure_sink = graph
            .outgoing_edges(node)
            .iter()
            .all(|e| is_check_edge(e.edge_type));
        if is_pure_sink && !bwd.contains_key(&node) {
            bwd.entry(node).or_default().insert(Domain::Default);
        }
    }

    for &node in order.iter().rev() {
        let outgoing: Vec<Domain> = graph
            .outgoing_edges(node)
            .iter()
            .filter(|e| !is_check_edge(e.edge_type))
            .flat_map(|e| bwd.get(&e.to).into_iter().flatten().copied())
            .collect();
        if !outgoing.is_empty() {
            bwd.entry(node).or_default().extend(outgoing);
        }
    }

    (fwd, bwd)
}

fn period_for_domain(constraints: &TimingConstraints, domain: Domain) -> f64 {
    match domain {
        Domain::Clock(name) => constraints
            .clocks
            .iter()
            .find(|c| c.name == name)
            .map_or(f64::INFINITY, |c| c.period_ns),
        Domain::Default => constraints
            .clocks
            .first()
            .map_or(f64::INFINITY, |c| c.period_ns),
    }
}

/// Forward pass: `arrival[node] = max(arrival[pred] + delay)` over every
/// precedence edge, restricted to nodes that `domain` reaches.
fn forward_pass(
    graph: &TimingGraph,
    order: &[TimingNodeId],
    domain: Domain,
    fwd_domains: &HashMap<TimingNodeId, HashSet<Domain>>,
) -> HashMap<TimingNodeId, f64> {
    let mut arrival: HashMap<TimingNodeId, f64> = HashMap::new();
    for &node in order {
        if !fwd_domains.get(&node).is_some_and(|s| s.contains(&domain)) {
            continue;
        }
        let best = graph
            .incoming_edges(node)
            .iter()
            .filter(|e| !is_check_edge(e.edge_type))
            .filter_map(|e| arrival.get(&e.from).map(|a| a + e.delay.max_ns))
            .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))));
        arrival.insert(node, best.unwrap_or(0.0));
    }
    arrival
}

/// Backward pass: `required[node] = min(required[succ] - delay)` over every
/// precedence edge, restricted to nodes that `domain` reaches. Pure
/// endpoints (no relevant successor) get `period - output_delay - setup`.
fn backward_pass(
    graph: &TimingGraph,
    order: &[TimingNodeId],
    domain: Domain,
    bwd_domains: &HashMap<TimingNodeId, HashSet<Domain>>,
    constraints: &TimingConstraints,
    interner: &Interner,
) -> HashMap<TimingNodeId, f64> {
    let period = period_for_domain(constraints, domain);
    let mut required: HashMap<TimingNodeId, f64> = HashMap::new();
    for &node in order.iter().rev() {
        if !bwd_domains.get(&node).is_some_and(|s| s.contains(&domain)) {
            continue;
        }
        let from_succ = graph
            .outgoing_edges(node)
            .iter()
            .filter(|e| !is_check_edge(e.edge_type))
            .filter_map(|e| required.get(&e.to).map(|r| r - e.delay.max_ns))
            .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |r: f64| r.min(v))));

        let value = match from_succ {
            Some(r) => r,
            None => {
                let node_name = &graph.node(node).name;
                let output_delay = constraints
                    .output_delays
                    .iter()
                    .find(|d| node_name.contains(interner.resolve(d.port)))
                    .map_or(0.0, |d| d.delay_ns);
                let setup_delay = graph
                    .incoming_edges(node)
                    .iter()
                    .filter(|e| e.edge_type == TimingEdgeType::SetupCheck)
                    .map(|e| e.delay.max_ns)
                    .fold(0.0_f64, f64::max);
                period - output_delay - setup_delay
            }
        };
        required.insert(node, value);
    }
    required
}

/// Computes per-node criticality and worst setup slack from the per-domain
/// forward/backward passes, restricted to domain pairs sharing a clock
/// (here, simply the same [`Domain`], since only one edge per clock is
/// tracked): `slack = period + arrival - required`, `criticality = clamp(1 -
/// (slack - worst_slack) / period, 0, 1)`.
fn assign_criticality(
    order: &[TimingNodeId],
    domains: &HashSet<Domain>,
    fwd_domains: &HashMap<TimingNodeId, HashSet<Domain>>,
    bwd_domains: &HashMap<TimingNodeId, HashSet<Domain>>,
    arrival_by_domain: &HashMap<Domain, HashMap<TimingNodeId, f64>>,
    required_by_domain: &HashMap<Domain, HashMap<TimingNodeId, f64>>,
    constraints: &TimingConstraints,
) -> (HashMap<TimingNodeId, f64>, HashMap<TimingNodeId, f64>) {
    let mut criticality: HashMap<TimingNodeId, f64> = HashMap::new();
    let mut node_slack: HashMap<TimingNodeId, f64> = HashMap::new();

    for &domain in domains {
        let period = period_for_domain(constraints, domain);
        if !period.is_finite() || period <= 0.0 {
            continue;
        }
        let arrival = &arrival_by_domain[&domain];
        let required = &required_by_domain[&domain];

        let pair_nodes: Vec<(TimingNodeId, f64)> = order
            .iter()
            .filter(|&&n| {
                fwd_domains.get(&n).is_some_and(|s| s.contains(&domain))
                    && bwd_domains.get(&n).is_some_and(|s| s.contains(&domain))
            })
            .filter_map(|&n| {
                let a = arrival.get(&n)?;
                let r = required.get(&n)?;
                Some((n, period + a - r))
            })
            .collect();

        if pair_nodes.is_empty() {
            continue;
        }
        let worst = pair_nodes
            .iter()
            .map(|&(_, s)| s)
            .fold(f64::INFINITY, f64::min);

        for (node, s) in pair_nodes {
            let crit = (1.0 - (s - worst) / period).clamp(0.0, 1.0);
            criticality
                .entry(node)
                .and_modify(|c| *c = c.max(crit))
                .or_insert(crit);
            node_slack
                .entry(node)
                .and_modify(|v| *v = v.min(s))
                .or_insert(s);
        }
    }

    (criticality, node_slack)
}

/// Evenly distributes each intra-clock-domain endpoint's slack across the
/// arcs of its worst-case (highest-arrival) path back to a startpoint,
/// storing the per-arc budget for router guidance. An edge on more than one
/// path keeps the tightest (smallest) budget assigned to it.
fn assign_budget(
    graph: &TimingGraph,
    order: &[TimingNodeId],
    domains: &HashSet<Domain>,
    fwd_domains: &HashMap<TimingNodeId, HashSet<Domain>>,
    bwd_domains: &HashMap<TimingNodeId, HashSet<Domain>>,
    arrival_by_domain: &HashMap<Domain, HashMap<TimingNodeId, f64>>,
    required_by_domain: &HashMap<Domain, HashMap<TimingNodeId, f64>>,
    constraints: &TimingConstraints,
) -> HashMap<TimingEdgeId, f64> {
    let mut budget: HashMap<TimingEdgeId, f64> = HashMap::new();

    for &domain in domains {
        let period = period_for_domain(constraints, domain);
        if !period.is_finite() {
            continue;
        }
        let arrival = &arrival_by_domain[&domain];
        let required = &required_by_domain[&domain];

        for &node in order {
            if !(fwd_domains.get(&node).is_some_and(|s| s.contains(&domain))
                && bwd_domains.get(&node).is_some_and(|s| s.contains(&domain)))
            {
                continue;
            }
            let (Some(&a), Some(&r)) = (arrival.get(&node), required.get(&node)) else {
                continue;
            };
            let path_slack = period + a - r;

            let mut hops: Vec<TimingEdgeId> = Vec::new();
            let mut current = node;
            loop {
                let best = graph
                    .incoming_edges(current)
                    .iter()
                    .filter(|e| !is_check_edge(e.edge_type) && arrival.contains_key(&e.from))
                    .max_by(|a, b| {
                        let av = arrival[&a.from] + a.delay.max_ns;
                        let bv = arrival[&b.from] + b.delay.max_ns;
                        av.partial_cmp(&bv).unwrap()
                    })
                    .copied();
                let Some(best) = best else { break };
                hops.push(best.id);
                current = best.from;
            }

            if hops.is_empty() {
                continue;
            }
            let per_arc = path_slack / hops.len() as f64;
            for edge_id in hops {
                budget
                    .entry(edge_id)
                    .and_modify(|b| *b = b.min(per_arc))
                    .or_insert(per_arc);
            }
        }
    }

    budget
}

/// Extracts critical paths by backtracking from worst-slack endpoints.
fn extract_critical_paths(
    graph: &TimingGraph,
    arrival: &[f64],
    slack: &[f64],
    sink_nodes: &[TimingNodeId],
    interner: &Interner,
) -> Vec<CriticalPath> {
    let mut paths = Vec::new();

    // Sort sinks by slack (worst first)
    let mut sorted_sinks: Vec<TimingNodeId> = sink_nodes.to_vec();
    sorted_sinks.sort_by(|a, b| {
        let sa = slack[a.as_raw() as usize];
        let sb = slack[b.as_raw() as usize];
        sa.partial_cmp(&sb).unwrap()
    });

    for &sink in sorted_sinks.iter().take(MAX_CRITICAL_PATHS) {
        let sink_idx = sink.as_raw() as usize;
        let sink_node = graph.node(sink);

        // Backtrack from sink to source following maximum-arrival edges
        let mut elements = Vec::new();
        let mut current = sink;
        let total_delay = arrival[sink_idx];
        let mut cumulative = total_delay;

        elements.push(PathElement {
            node_name: sink_node.name.clone(),
            node_type: format!("{:?}", sink_node.node_type),
            delay_ns: 0.0,
            cumulative_ns: cumulative,
            location: None,
            source_span: None,
        });

        // Walk backwards
        loop {
            let incoming: Vec<_> = graph
                .incoming_edges(current)
                .into_iter()
                .filter(|e| !is_check_edge(e.edge_type))
                .collect();

            if incoming.is_empty() {
                break;
            }

            // Pick the edge that contributes the most to arrival time
            let best_edge = incoming
                .into_iter()
                .max_by(|a, b| {
                    let aa = arrival[a.from.as_raw() as usize] + a.delay.max_ns;
                    let ba = arrival[b.from.as_raw() as usize] + b.delay.max_ns;
                    aa.partial_cmp(&ba).unwrap()
                })
                .unwrap();

            let from_node = graph.node(best_edge.from);
            cumulative -= best_edge.delay.max_ns;

            elements.push(PathElement {
                node_name: from_node.name.clone(),
                node_type: format!("{:?}", from_node.node_type),
                delay_ns: best_edge.delay.max_ns,
                cumulative_ns: cumulative.max(0.0),
                location: None,
                source_span: None,
            });

            current = best_edge.from;
        }

        elements.reverse();

        // Fix cumulative delays (forward direction)
        let mut cum = 0.0;
        for elem in &mut elements {
            cum += elem.delay_ns;
            elem.cumulative_ns = cum;
        }

        let source_node = graph.node(current);

        paths.push(CriticalPath {
            from: TimingEndpoint {
                node: interner.get_or_intern(&source_node.name),
                pin: None,
            },
            to: TimingEndpoint {
                node: interner.get_or_intern(&sink_node.name),
                pin: None,
            },
            delay_ns: total_delay,
            slack_ns: slack[sink_idx],
            elements,
        });
    }

    paths
}

/// Builds per-clock-domain timing summaries from constraints and critical paths.
fn build_clock_domain_summaries(
    constraints: &TimingConstraints,
    interner: &Interner,
    critical_paths: &[CriticalPath],
) -> Vec<ClockDomainTiming> {
    constraints
        .clocks
        .iter()
        .map(|clk| {
            let clock_name_str = interner.resolve(clk.name);
            let domain_paths: Vec<&CriticalPath> = critical_paths
                .iter()
                .filter(|p| {
                    let from_name = interner.resolve(p.from.node);
                    let to_name = interner.resolve(p.to.node);
                    from_name.contains(clock_name_str) || to_name.contains(clock_name_str)
                })
                .collect();

            let worst_slack = domain_paths
                .iter()
                .map(|p| p.slack_ns)
                .fold(f64::INFINITY, f64::min);

            ClockDomainTiming {
                clock_name: clk.name,
                period_ns: clk.period_ns,
                worst_slack_ns: if worst_slack == f64::INFINITY {
                    clk.period_ns
                } else {
                    worst_slack
                },
                critical_path_count: domain_paths.len(),
                endpoint_count: domain_paths.len(),
                met: worst_slack >= 0.0 || worst_slack == f64::INFINITY,
            }
        })
        .collect()
}

/// Computes target and achieved frequencies from constraints.
fn compute_frequencies(
    constraints: &TimingConstraints,
    _interner: &Interner,
    worst_slack: f64,
) -> (f64, f64) {
    let primary_clock = constraints.clocks.first();

    match primary_clock {
        Some(clk) => {
            let target = clk.frequency_mhz();
            let critical_delay = clk.period_ns - worst_slack.min(clk.period_ns);
            let achieved = if critical_delay > 0.0 {
                1000.0 / critical_delay
            } else {
                f64::INFINITY
            };
            (target, achieved.min(10_000.0)) // cap at 10 GHz
        }
        None => (0.0, 0.0),
    }
}
