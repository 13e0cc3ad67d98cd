//! W107: Truncation — RHS is wider than LHS in assignment.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Expr, Module, SignalRef, Statement};

use crate::LintRule;

/// Detects assignments where the RHS is wider than the LHS, causing
/// implicit truncation of high bits.
///
/// Unlike W103 (width-mismatch) which fires on any width difference,
/// this rule specifically flags truncation where data loss occurs.
pub struct Truncation;

impl LintRule for Truncation {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 107)
    }

    fn name(&self) -> &str {
        "truncation"
    }

    fn description(&self) -> &str {
        "RHS wider than LHS in assignment causes truncation"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, design: &Design, sink: &DiagnosticSink) {
        // Check continuous assignments
        for assign in &module.assignments {
            check_truncation(
                &assign.target,
                &assign.value,
                assign.span,
                module,
                design,
                self.code(),
                sink,
            );
        }

        // Check process body assignments
        for (_pid, process) in module.processes.iter() {
            check_stmt_truncation(&process.body, module, design, self.code(), sink);
        }
    }
}

fn signal_ref_width(sref: &SignalRef, module: &Module, design: &Design) -> Option<u32> {
    match sref {
        SignalRef::Signal(id) => {
            let signal = module.signals.get(*id);
            design.types.bit_width(signal.ty)
        }
        SignalRef::Slice { high, low, .. } => Some(high - low + 1),
        SignalRef::Concat(refs) => {
            let mut total = 0u32;
            for r in refs {
                total += signal_ref_width(r, module, design)?;
            }
            Some(total)
        }
        SignalRef::Const(lv) => Some(lv.width()),
    }
}

fn expr_width(expr: &Expr, design: &Design) -> Option<u32> {
    match expr {
        Expr::Literal(lv) => Some(lv.width()),
        Expr::Unary { ty, .. }
        | Expr::Binary { ty, .. }
        | Expr::Ternary { ty, .. }
        | Expr::FuncCall { ty, .. } => design.types.bit_width(*ty),
        Expr::Concat(exprs) => {
            let mut total = 0u32;
            for e in exprs {
                total += expr_width(e, design)?;
            }
            Some(total)
        }
        Expr::Repeat { expr, count, .. } => expr_width(expr, design).map(|w| w * count),
        _ => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn check_truncation(
    target: &SignalRef,
    value: &Expr,
    span: aion_source::Span,
    module: &Module,
    design: &Design,
    code: DiagnosticCode,
    sink: &DiagnosticSink,
) {
    let lhs_width = signal_ref_width(target, module, design);
    let rhs_width = expr_width(value, design);
    if let (Some(lw), Some(rw)) = (lhs_width, rhs_width) {
        if rw > lw {
            sink.emit(
                Diagnostic::warning(
                    code,
                    format!(
                        "truncation: {rw}-bit value assigned to {lw}-bit target, losing {} bits",
                        rw - lw
                    ),
                    span,
                )
                .with_label(Label::primary(span, "high bits will be truncated")),
            );
        }
    }
}

fn check_stmt_truncation(
    stmt: &Statement,
    module: &Module,
    design: &Design,
    code: DiagnosticCode,
    sink: &DiagnosticSink,
) {
    match stmt {
        Statement::Assign {
            target,
            value,
            span,
            ..
        } => {
            check_truncation(target, value, *span, module, design, code, sink);
        }
        Statement::If {
            then_body,
            else_body,
            ..
        } => {
            check_stmt_truncation(then_body, module, design, code, sink);
            if let Some(else_b) = else_body {
                check_stmt_truncation(else_b, module, design, code, sink);
            }
        }
        Statement::Case { arms, default, .. } => {
            for arm in arms {
                check_stmt_truncation(&arm.body, module, design, code, sink);
            }
            if let Some(def) = default {
                check_stmt_truncation(def, module, design, code, sink);
            }
        }
        Statement::Block { stmts, .. } => {
            for s in stmts {
                check_stmt_truncation(s, module, design, code, sink);
            }
        }
        _ => {}
    }
}
