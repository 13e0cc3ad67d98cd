//! E102: Non-synthesizable — constructs that cannot be synthesized to hardware.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Module, ProcessKind, Statement};

use crate::LintRule;

/// Detects non-synthesizable constructs in the design.
///
/// This includes:
/// - `Initial` process kind (simulation only)
/// - `Wait`, `Display`, `Finish` statements in non-initial processes
pub struct NonSynthesizable;

impl LintRule for NonSynthesizable {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 102)
    }

    fn name(&self) -> &str {
        "non-synthesizable"
    }

    fn description(&self) -> &str {
        "constructs that cannot be synthesized to hardware"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, _design: &Design, sink: &DiagnosticSink) {
        for (_pid, process) in module.processes.iter() {
            // Initial processes are simulation-only
            if process.kind == ProcessKind::Initial {
                sink.emit(
                    Diagnostic::error(
                        self.code(),
                        "initial blocks are not synthesizable",
                        process.span,
                    )
                    .with_label(Label::primary(process.span, "simulation-only construct"))
                    .with_help("remove initial block or move to a testbench"),
                );
                continue;
            }

            // Check for non-synthesizable statements in non-initial processes
            check_non_synth_stmts(&process.body, self.code(), sink);
        }
    }
}

fn check_non_synth_stmts(stmt: &Statement, code: DiagnosticCode, sink: &DiagnosticSink) {
    match stmt {
        Statement::Wait { span, .. } => {
            sink.emit(
                Diagnostic::error(code, "wait statements are not synthesizable", *span)
                    .with_label(Label::primary(*span, "simulation-only construct")),
            );
        }
        Statement::Display { span, .. } => {
            sink.emit(
                Diagnostic::error(code, "$display is not synthesizable", *span)
                    .with_label(Label::primary(*span, "simulation-only construct")),
            );
        }
        Statement::Finish { span } => {
            sink.emit(
                Diagnostic::error(code, "$finish is not synthesizable", *span)
                    .with_label(Label::primary(*span, "simulation-only construct")),
            );
        }
        Statement::If {
            then_body,
            else_body,
            ..
        } => {
            check_non_synth_stmts(then_body, code, sink);
            if let Some(else_b) = else_body {
                check_non_synth_stmts(else_b, code, sink);
            }
        }
        Statement::Case { arms, default, .. } => {
            for arm in arms {
                check_non_synth_stmts(&arm.body, code, sink);
            }
            if let Some(def) = default {
                check_non_synth_stmts(def, code, sink);
            }
        }
        Statement::Block { stmts, .. } => {
            for s in stmts {
                check_non_synth_stmts(s, code, sink);
            }
        }
        Statement::Assign { .. } | Statement::Assertion { .. } | Statement::Nop => {}
    }
}
