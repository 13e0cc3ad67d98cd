//! W104: Missing reset — sequential process has no reset logic.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Module, ProcessKind, Sensitivity, Statement};

use crate::LintRule;

/// Detects sequential processes (flip-flop style) that have no reset signal
/// in their sensitivity list or body.
///
/// A sequential process without reset can lead to unknown initial states
/// and unreliable behavior after power-on.
pub struct MissingReset;

impl LintRule for MissingReset {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 104)
    }

    fn name(&self) -> &str {
        "missing-reset"
    }

    fn description(&self) -> &str {
        "sequential process has no reset in sensitivity list or body"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, _design: &Design, sink: &DiagnosticSink) {
        for (_pid, process) in module.processes.iter() {
            if process.kind != ProcessKind::Sequential {
                continue;
            }

            // Check if sensitivity list has more than one edge (clock + reset)
            let has_reset_in_sensitivity = match &process.sensitivity {
                Sensitivity::EdgeList(edges) => edges.len() > 1,
                _ => false,
            };

            // Check if body contains an if/case that could be a reset check
            let has_reset_in_body = body_has_reset_pattern(&process.body);

            if !has_reset_in_sensitivity && !has_reset_in_body {
                sink.emit(
                    Diagnostic::warning(
                        self.code(),
                        "sequential process has no reset",
                        process.span,
                    )
                    .with_label(Label::primary(process.span, "no reset signal detected"))
                    .with_help(
                        "add an asynchronous or synchronous reset to ensure known initial state",
                    ),
                );
            }
        }
    }
}

/// Checks if the body has a pattern like `if (reset) ... else ...` at the top level,
/// which indicates synchronous reset.
fn body_has_reset_pattern(stmt: &Statement) -> bool {
    match stmt {
        Statement::If { else_body, .. } => {
            // An if at the top level with an else branch suggests reset logic
            else_body.is_some()
        }
        Statement::Block { stmts, .. } => {
            // Check first statement in block
            stmts.first().is_some_and(body_has_reset_pattern)
        }
        _ => false,
    }
}
