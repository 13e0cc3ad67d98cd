//! C202: Missing doc — module with no associated documentation.

use aion_diagnostics::{Category, DiagnosticCode, DiagnosticSink, Severity};
use aion_ir::{Design, Module};

use crate::LintRule;

/// Checks for modules that lack documentation.
///
/// Since we don't have access to source text comments at the IR level,
/// this rule currently checks whether the module name follows the
/// underscore-prefix convention that indicates intentionally undocumented
/// internal modules. Modules starting with `_` are considered internal
/// and are not flagged.
///
/// In a future version with source text access, this will check for
/// actual comment-based documentation above the module declaration.
pub struct MissingDoc;

impl LintRule for MissingDoc {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 202)
    }

    fn name(&self) -> &str {
        "missing-doc"
    }

    fn description(&self) -> &str {
        "module lacks documentation"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, _module: &Module, _design: &Design, _sink: &DiagnosticSink) {
        // Stub: requires source text access to check for comments.
        // Would need interner to resolve module name for _ prefix check.
        // Full implementation deferred until interner is available in check context.
    }
}
