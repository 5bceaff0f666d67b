//! Library entry points: cost-tree source in, rendered routine out.

use crate::codegen::generate_program;
use crate::config::Project;
use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::eval::{self, EtaValues, ParamValues};
use crate::hash::{hash_output, hash_tree, ContentHash};
use crate::ir::{LoopLevel, Node, Param, Program};
use crate::lower::{create_lowering, is_valid_name};
use crate::span::Span;

#[cfg(test)]
mod tests;

/// Options controlling rendering: routine name and target language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    pub function_name: String,
    pub target: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            function_name: "eval".to_string(),
            target: "c".to_string(),
        }
    }
}

impl GenerateOptions {
    pub fn for_target(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by whatever the project file sets.
    pub fn from_project(project: &Project) -> Self {
        let defaults = Self::default();
        Self {
            function_name: project.function.clone().unwrap_or(defaults.function_name),
            target: project.target.clone().unwrap_or(defaults.target),
        }
    }
}

/// Compile cost-tree source to a C routine named `eval`.
pub fn compile(source: &str, filename: &str) -> Result<String, Vec<Diagnostic>> {
    compile_with_options(source, filename, &GenerateOptions::default())
}

/// Compile cost-tree source with options.
pub fn compile_with_options(
    source: &str,
    filename: &str,
    options: &GenerateOptions,
) -> Result<String, Vec<Diagnostic>> {
    let program = generate_source(source, filename)?;
    lower_program(&program, options).map_err(|diag| {
        let errors = vec![diag];
        render_diagnostics(&errors, filename, source);
        errors
    })
}

/// Parse and generate, rendering any diagnostics against `source`.
pub fn generate_source(source: &str, filename: &str) -> Result<Program, Vec<Diagnostic>> {
    let tree = crate::parse_source(source, filename)?;
    generate_tree(&tree).map_err(|errors| {
        render_diagnostics(&errors, filename, source);
        errors
    })
}

/// Generate the statement program for an already-built tree.
pub fn generate_tree(tree: &Node) -> Result<Program, Vec<Diagnostic>> {
    generate_program(tree).map_err(|err| vec![Diagnostic::from(err)])
}

/// Render a generated program for the target named in `options`.
pub fn lower_program(program: &Program, options: &GenerateOptions) -> Result<String, Diagnostic> {
    if !is_valid_name(&options.function_name) {
        return Err(Diagnostic::error(
            format!("invalid function name '{}'", options.function_name),
            Span::dummy(),
        )
        .with_help("use letters, digits and '_', not starting with a digit".to_string()));
    }
    let lowering = create_lowering(&options.target)?;
    Ok(lowering.lower(program, &options.function_name))
}

// ─── Statistics ────────────────────────────────────────────────────

/// Size of a tree and of the routine generated from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationStats {
    pub nodes: usize,
    pub params: Vec<Param>,
    pub declarations: usize,
    pub statements: usize,
    /// Deepest `if` nesting in the routine.
    pub max_depth: usize,
}

impl GenerationStats {
    pub fn new(tree: &Node, program: &Program) -> Self {
        Self {
            nodes: tree.size(),
            params: program.params.clone(),
            declarations: program.declarations.len(),
            statements: program.statement_count(),
            max_depth: crate::ir::stmt::max_depth(&program.statements),
        }
    }

    pub fn format_report(&self) -> String {
        let params = if self.params.is_empty() {
            "none".to_string()
        } else {
            self.params
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "  nodes:        {}\n  parameters:   {}\n  variables:    {}\n  statements:   {}\n  if nesting:   {}",
            self.nodes, params, self.declarations, self.statements, self.max_depth
        )
    }
}

// ─── Evaluation ────────────────────────────────────────────────────

/// One concrete evaluation of a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Value returned by the generated routine.
    pub result: i64,
    /// Every slot of the root, computed without generating code.
    pub reference: EtaValues,
    pub level: LoopLevel,
}

/// Run the generated routine for `params` and cross-check it against the
/// reference evaluator.
pub fn evaluate_tree(tree: &Node, params: &ParamValues) -> Result<Evaluation, Diagnostic> {
    let program = generate_program(tree)?;
    let reference = eval::evaluate(tree, params)?;
    let result = eval::machine::run(&program, params)?;
    let expected = reference.eta.slots()[0];
    if result != expected {
        return Err(Diagnostic::error(
            format!(
                "generated routine returned {} but the tree evaluates to {}",
                result, expected
            ),
            Span::dummy(),
        ));
    }
    Ok(Evaluation {
        result,
        reference: reference.eta,
        level: reference.level,
    })
}

// ─── Hashing ───────────────────────────────────────────────────────

/// Content hashes of a tree and of its rendered routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtifactHashes {
    pub tree: ContentHash,
    pub output: ContentHash,
}

pub fn hash_artifacts(tree: &Node, output: &str) -> ArtifactHashes {
    ArtifactHashes {
        tree: hash_tree(tree),
        output: hash_output(output),
    }
}
