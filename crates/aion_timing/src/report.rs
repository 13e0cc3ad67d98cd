//! Timing report types produced by static timing analysis.
//!
//! A [`TimingReport`] summarizes the result of one STA run: whether the
//! design meets timing, the achieved/target frequency, per-clock-domain
//! slack, and the worst critical paths for inspection or reporting.

use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// The result of a static timing analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingReport {
    /// Per-clock-domain timing summaries.
    pub clock_domains: Vec<ClockDomainTiming>,
    /// The worst critical paths across all domains, worst slack first.
    pub critical_paths: Vec<CriticalPath>,
    /// The worst slack across every endpoint, in nanoseconds. Positive
    /// means timing is met with margin; negative means a violation.
    pub worst_slack_ns: f64,
    /// The achieved clock frequency implied by the worst critical path,
    /// in MHz.
    pub achieved_frequency_mhz: f64,
    /// The target clock frequency from the primary clock constraint, in
    /// MHz. Zero if no clock constraint was given.
    pub target_frequency_mhz: f64,
    /// `true` if every endpoint has non-negative slack.
    pub met: bool,
}

impl TimingReport {
    /// Returns an empty report for a graph with no timing nodes.
    ///
    /// An empty design trivially meets timing.
    pub fn empty() -> Self {
        Self {
            clock_domains: Vec::new(),
            critical_paths: Vec::new(),
            worst_slack_ns: 0.0,
            achieved_frequency_mhz: 0.0,
            target_frequency_mhz: 0.0,
            met: true,
        }
    }

    /// Returns the number of reported critical paths with negative slack.
    pub fn violation_count(&self) -> usize {
        self.critical_paths
            .iter()
            .filter(|p| p.slack_ns < 0.0)
            .count()
    }
}

/// A timing endpoint: a named node, optionally qualified by a pin name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEndpoint {
    /// The interned name of the node (cell instance, port, or net).
    pub node: Ident,
    /// The interned name of the specific pin, if the endpoint is a cell pin.
    pub pin: Option<Ident>,
}

/// One worst-case timing path from a startpoint to an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPath {
    /// The path's startpoint.
    pub from: TimingEndpoint,
    /// The path's endpoint.
    pub to: TimingEndpoint,
    /// Total propagation delay along the path, in nanoseconds.
    pub delay_ns: f64,
    /// Slack at the endpoint: required time minus arrival time.
    pub slack_ns: f64,
    /// The nodes and per-hop delays making up the path, in path order.
    pub elements: Vec<PathElement>,
}

/// One node along a [`CriticalPath`], with its contribution to the total
/// delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathElement {
    /// The node's display name.
    pub node_name: String,
    /// The node's type, rendered for display (e.g. `"CellPin"`).
    pub node_type: String,
    /// Delay contributed by the edge leading into this node, in
    /// nanoseconds. Zero for the path's first element.
    pub delay_ns: f64,
    /// Cumulative delay from the path's start through this node.
    pub cumulative_ns: f64,
    /// The node's device location (column, row, BEL index), if it has
    /// been placed.
    pub location: Option<(u32, u32, u32)>,
    /// The HDL source span this node originated from, if known.
    pub source_span: Option<Span>,
}

/// Per-clock-domain timing summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockDomainTiming {
    /// The interned clock name.
    pub clock_name: Ident,
    /// The clock's period, in nanoseconds.
    pub period_ns: f64,
    /// The worst slack observed among paths attributed to this domain.
    pub worst_slack_ns: f64,
    /// Number of critical paths attributed to this domain.
    pub critical_path_count: usize,
    /// Number of distinct endpoints attributed to this domain.
    pub endpoint_count: usize,
    /// `true` if this domain meets timing.
    pub met: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_meets_timing() {
        let report = TimingReport::empty();
        assert!(report.met);
        assert_eq!(report.worst_slack_ns, 0.0);
        assert!(report.critical_paths.is_empty());
        assert_eq!(report.violation_count(), 0);
    }

    #[test]
    fn violation_count_counts_negative_slack_paths() {
        let mut report = TimingReport::empty();
        report.critical_paths.push(CriticalPath {
            from: TimingEndpoint {
                node: Ident::from_raw(0),
                pin: None,
            },
            to: TimingEndpoint {
                node: Ident::from_raw(1),
                pin: None,
            },
            delay_ns: 12.0,
            slack_ns: -2.0,
            elements: Vec::new(),
        });
        report.critical_paths.push(CriticalPath {
            from: TimingEndpoint {
                node: Ident::from_raw(2),
                pin: None,
            },
            to: TimingEndpoint {
                node: Ident::from_raw(3),
                pin: None,
            },
            delay_ns: 3.0,
            slack_ns: 7.0,
            elements: Vec::new(),
        });
        assert_eq!(report.violation_count(), 1);
    }
}
