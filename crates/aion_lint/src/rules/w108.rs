//! W108: Dead logic — unreachable code after `Finish` or always-true/false conditions.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Expr, Module, Statement};

use crate::LintRule;

/// Detects dead logic: code after `$finish`, or `if`/`case` with
/// always-true or always-false literal conditions.
///
/// Dead logic wastes synthesis resources and may indicate bugs.
pub struct DeadLogic;

impl LintRule for DeadLogic {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 108)
    }

    fn name(&self) -> &str {
        "dead-logic"
    }

    fn description(&self) -> &str {
        "code after Finish or always-true/false conditions"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, _design: &Design, sink: &DiagnosticSink) {
        for (_pid, process) in module.processes.iter() {
            check_dead_logic(&process.body, self.code(), sink);
        }
    }
}

fn check_dead_logic(stmt: &Statement, code: DiagnosticCode, sink: &DiagnosticSink) {
    match stmt {
        Statement::Block { stmts, .. } => {
            let mut after_finish = false;
            for s in stmts {
                if after_finish {
                    if let Some(span) = stmt_span(s) {
                        sink.emit(
                            Diagnostic::warning(code, "dead logic after $finish", span)
                                .with_label(Label::primary(span, "unreachable code")),
                        );
                    }
                    break; // Only report once per block
                }
                if matches!(s, Statement::Finish { .. }) {
                    after_finish = true;
                }
                check_dead_logic(s, code, sink);
            }
        }
        Statement::If {
            condition,
            then_body,
            else_body,
            span,
            ..
        } => {
            if let Some(is_true) = is_literal_bool(condition) {
                sink.emit(
                    Diagnostic::warning(
                        code,
                        if is_true {
                            "condition is always true"
                        } else {
                            "condition is always false"
                        },
                        *span,
                    )
                    .with_label(Label::primary(*span, "constant condition")),
                );
            }
            check_dead_logic(then_body, code, sink);
            if let Some(else_b) = else_body {
                check_dead_logic(else_b, code, sink);
            }
        }
        Statement::Case { arms, default, .. } => {
            for arm in arms {
                check_dead_logic(&arm.body, code, sink);
            }
            if let Some(def) = default {
                check_dead_logic(def, code, sink);
            }
        }
        _ => {}
    }
}

/// Returns the span of a statement, if it has one.
fn stmt_span(stmt: &Statement) -> Option<aion_source::Span> {
    match stmt {
        Statement::Assign { span, .. }
        | Statement::If { span, .. }
        | Statement::Case { span, .. }
        | Statement::Block { span, .. }
        | Statement::Wait { span, .. }
        | Statement::Assertion { span, .. }
        | Statement::Display { span, .. }
        | Statement::Finish { span } => Some(*span),
        Statement::Nop => None,
    }
}

/// Checks if an expression is a literal boolean (all-zeros = false, all-ones = true).
fn is_literal_bool(expr: &Expr) -> Option<bool> {
    if let Expr::Literal(lv) = expr {
        if lv.is_all_zero() {
            return Some(false);
        }
        if lv.is_all_one() {
            return Some(true);
        }
    }
    None
}
