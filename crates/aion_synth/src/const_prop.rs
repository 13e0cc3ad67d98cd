//! Constant propagation optimization pass.
//!
//! Walks cells topologically: if all inputs to a cell are constants,
//! evaluates the output and replaces the cell with a [`CellKind::Const`].

use crate::netlist::Netlist;
use crate::optimize::OptPass;
use aion_common::LogicVec;
use aion_diagnostics::DiagnosticSink;
use aion_ir::{CellId, CellKind, PortDirection, SignalId, SignalRef};
use std::collections::HashMap;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Constant propagation optimization pass.
pub(crate) struct ConstPropPass;

impl OptPass for ConstPropPass {
    fn run(&self, netlist: &mut Netlist, _sink: &DiagnosticSink) -> bool {
        let mut changed = false;

        // Build a map of signal → constant value
        let mut const_signals: HashMap<SignalId, LogicVec> = HashMap::new();

        // First, find all Const cells and record their output signals
        for (cell_id, cell) in netlist.cells.iter() {
            if netlist.is_dead(cell_id) {
                continue;
            }
            if let CellKind::Const { ref value } = cell.kind {
                for conn in &cell.connections {
                    if conn.direction == PortDirection::Output {
                        if let SignalRef::Signal(sig_id) = conn.signal {
                            const_signals.insert(sig_id, value.clone());
                        }
                    }
                }
            }
        }

        // Now try to evaluate cells whose inputs are all constant
        let cell_ids: Vec<CellId> = netlist
            .cells
            .iter()
            .filter(|(id, _)| !netlist.is_dead(*id))
            .map(|(id, _)| id)
            .collect();

        for cell_id in cell_ids {
            if netlist.is_dead(cell_id) {
                continue;
            }
            let cell = netlist.cells.get(cell_id);

            // Skip cells that are already Const
            if matches!(&cell.kind, CellKind::Const { .. }) {
                continue;
            }

            // Collect input values
            let inputs: Vec<Option<LogicVec>> = cell
                .connections
                .iter()
                .filter(|c| c.direction == PortDirection::Input)
                .map(|c| get_const_value(&c.signal, &const_signals))
                .collect();

            // All inputs must be constant
            if inputs.iter().any(|v| v.is_none()) {
                continue;
            }

            let input_values: Vec<LogicVec> = inputs.into_iter().map(|v| v.unwrap()).collect();

            // Try to evaluate
            if let Some(result) = evaluate_cell(&cell.kind, &input_values) {
                // Record the output signal as constant
                for conn in &netlist.cells.get(cell_id).connections {
                    if conn.direction == PortDirection::Output {
                        if let SignalRef::Signal(sig_id) = conn.signal {
                            const_signals.insert(sig_id, result.clone());
                        }
                    }
                }

                // Replace cell with Const
                let output_conn: Vec<_> = netlist
                    .cells
                    .get(cell_id)
                    .connections
                    .iter()
                    .filter(|c| c.direction == PortDirection::Output)
                    .cloned()
                    .collect();

                let cell_mut = netlist.cells.get_mut(cell_id);
                cell_mut.kind = CellKind::Const { value: result };
                cell_mut.connections = output_conn;

                changed = true;
            }
        }

        changed
    }
}

/// Gets the constant value for a signal ref, if available.
fn get_const_value(
    sr: &SignalRef,
    const_signals: &HashMap<SignalId, LogicVec>,
) -> Option<LogicVec> {
    match sr {
        SignalRef::Signal(id) => const_signals.get(id).cloned(),
        SignalRef::Const(lv) => Some(lv.clone()),
        _ => None,
    }
}

/// Evaluates a cell with constant inputs, returning the output value if possible.
fn evaluate_cell(kind: &CellKind, inputs: &[LogicVec]) -> Option<LogicVec> {
    match kind {
        CellKind::Not { width } => {
            let a = inputs.first()?;
            let mut result = LogicVec::new(*width);
            for i in 0..*width {
                let bit = a.get(i);
                result.set(i, Not::not(bit));
            }
            Some(result)
        }

        CellKind::And { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a = &inputs[0];
            let b = &inputs[1];
            let mut result = LogicVec::new(*width);
            for i in 0..*width {
                result.set(i, BitAnd::bitand(a.get(i), b.get(i)));
            }
            Some(result)
        }

        CellKind::Or { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a = &inputs[0];
            let b = &inputs[1];
            let mut result = LogicVec::new(*width);
            for i in 0..*width {
                result.set(i, BitOr::bitor(a.get(i), b.get(i)));
            }
            Some(result)
        }

        CellKind::Xor { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a = &inputs[0];
            let b = &inputs[1];
            let mut result = LogicVec::new(*width);
            for i in 0..*width {
                result.set(i, BitXor::bitxor(a.get(i), b.get(i)));
            }
            Some(result)
        }

        CellKind::Add { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            let result = a_val.wrapping_add(b_val);
            Some(LogicVec::from_u64(result, *width))
        }

        CellKind::Sub { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            let result = a_val.wrapping_sub(b_val);
            Some(LogicVec::from_u64(result, *width))
        }

        CellKind::Mul { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            let result = a_val.wrapping_mul(b_val);
            Some(LogicVec::from_u64(result, *width))
        }

        CellKind::Eq { .. } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            Some(LogicVec::from_bool(a_val == b_val))
        }

        CellKind::Lt { .. } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            Some(LogicVec::from_bool(a_val < b_val))
        }

        CellKind::Shl { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            let result = if b_val >= 64 { 0 } else { a_val << b_val };
            Some(LogicVec::from_u64(result, *width))
        }

        CellKind::Shr { width } => {
            if inputs.len() < 2 {
                return None;
            }
            let a_val = inputs[0].to_u64()?;
            let b_val = inputs[1].to_u64()?;
            let result = if b_val >= 64 { 0 } else { a_val >> b_val };
            Some(LogicVec::from_u64(result, *width))
        }

        CellKind::Mux { .. } => {
            // Inputs: S, A (false), B (true)
            if inputs.len() < 3 {
                return None;
            }
            let sel = inputs[0].to_u64()?;
            if sel != 0 {
                Some(inputs[2].clone()) // B (true)
            } else {
                Some(inputs[1].clone()) // A (false)
            }
        }

        _ => None,
    }
}
