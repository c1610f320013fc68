/*!
# Analysis Engine

Drives the rule families over a document: one tree walk per snapshot, and at
every node each enabled family triggered by that node kind gets a chance to
produce a candidate. Candidates become diagnostics with the severity and
message taken from [`RulesConfig`] and the fade-out spans of their plan.

Documents are independent, so [`AnalysisEngine::analyze_documents`] runs them
on a rayon pool; every worker has its own walker pool slots.
*/

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::context::{Candidate, RuleContext};
use super::families::RuleFamily;
use crate::core::{ConsolidationError, Result};
use crate::diagnostics::{render_message, Diagnostic, Location};
use crate::rewrite;
use crate::rules::{BuiltinRules, RulesConfig};
use crate::semantic::SemanticModel;
use crate::syntax::{walk, Document, NodeId, SyntaxTree, VisitControl, Visitor};

/// Shared cancellation flag; cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ConsolidationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Visitor, вызывающий семейства правил на каждом узле.
struct Dispatcher<'c, 'm> {
    ctx: RuleContext<'m>,
    families: &'c [RuleFamily],
    token: &'c CancellationToken,
    candidates: Vec<Candidate>,
    cancelled: bool,
}

impl Visitor for Dispatcher<'_, '_> {
    fn enter(&mut self, tree: &SyntaxTree, id: NodeId) -> VisitControl {
        if self.token.is_cancelled() {
            self.cancelled = true;
            return VisitControl::Stop;
        }
        let kind = tree.kind(id);
        for family in self.families.iter().filter(|f| f.is_triggered_by(kind)) {
            if let Some(candidate) = family.find(&self.ctx, id) {
                tracing::trace!(rule = family.rule_id(), span = ?candidate.span, "candidate");
                self.candidates.push(candidate);
            }
        }
        VisitControl::Continue
    }
}

pub struct AnalysisEngine {
    config: RulesConfig,
    families: Vec<RuleFamily>,
    pool: Option<rayon::ThreadPool>,
}

impl AnalysisEngine {
    pub fn new(config: RulesConfig) -> Self {
        let families = config.enabled_families();
        let threads = config.settings.effective_worker_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("consolidate-{i}"))
            .build()
            .map_err(|e| tracing::warn!("Falling back to the global rayon pool: {}", e))
            .ok();
        tracing::debug!(rules = families.len(), threads, "analysis engine ready");
        Self { config, families, pool }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn families(&self) -> &[RuleFamily] {
        &self.families
    }

    /// All candidates of the enabled families, in tree order.
    pub fn candidates(&self, model: &SemanticModel<'_>, token: &CancellationToken) -> Result<Vec<Candidate>> {
        self.candidates_for(model, &self.families, token)
    }

    pub(crate) fn candidates_for(
        &self,
        model: &SemanticModel<'_>,
        families: &[RuleFamily],
        token: &CancellationToken,
    ) -> Result<Vec<Candidate>> {
        token.check()?;
        let tree = model.tree();
        let mut dispatcher = Dispatcher {
            ctx: RuleContext::new(model),
            families,
            token,
            candidates: Vec::new(),
            cancelled: false,
        };
        walk(tree, tree.root(), &mut dispatcher);
        if dispatcher.cancelled {
            return Err(ConsolidationError::Cancelled);
        }
        Ok(dispatcher.candidates)
    }

    pub fn analyze(&self, document: &Document, token: &CancellationToken) -> Result<Vec<Diagnostic>> {
        let model = SemanticModel::build(document.tree());
        let candidates = self.candidates(&model, token)?;
        let file = document.display_name();
        let diagnostics: Vec<Diagnostic> = candidates
            .iter()
            .map(|candidate| self.to_diagnostic(document, &model, candidate, &file))
            .collect();
        tracing::debug!(file = %file, version = document.version(), count = diagnostics.len(), "analyzed");
        Ok(diagnostics)
    }

    fn to_diagnostic(
        &self,
        document: &Document,
        model: &SemanticModel<'_>,
        candidate: &Candidate,
        file: &str,
    ) -> Diagnostic {
        let tree = document.tree();
        let family = candidate.family;
        let ctx = RuleContext::new(model);
        let name = family.subject_name(&ctx, candidate).unwrap_or_default();
        let message = render_message(self.config.message_template(family), &[("name", name.as_str())]);
        let fade_out = match rewrite::plan(document, model, candidate) {
            Ok(plan) => plan.fade_out,
            Err(e) => {
                tracing::warn!(rule = family.rule_id(), "No fade-out for candidate: {}", e);
                Vec::new()
            }
        };
        let anchor = candidate.anchor;
        Diagnostic::new(
            BuiltinRules::descriptor(family),
            self.config.severity(family),
            Location::from_span(file, tree.line_index(), candidate.span),
            candidate.span,
            (tree.span(anchor), tree.kind(anchor)),
            candidate.version,
        )
        .with_message(message)
        .with_fade_out(fade_out)
    }

    /// Параллельный анализ; результат в порядке входных документов.
    pub fn analyze_documents(&self, documents: &[Document], token: &CancellationToken) -> Result<Vec<Vec<Diagnostic>>> {
        let run = || {
            documents
                .par_iter()
                .map(|document| self.analyze(document, token))
                .collect::<Result<Vec<_>>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "class C\n{\n\n    bool F(bool c)\n    {\n        if (c) return true;\n        return false;\n    }\n\n    int G()\n    {\n        var x = 1;\n        return x;\n    }\n}\n";

    #[test]
    fn reports_every_enabled_family_in_tree_order() {
        let engine = AnalysisEngine::default();
        let document = Document::parse(SAMPLE).unwrap();
        let diagnostics = engine.analyze(&document, &CancellationToken::new()).unwrap();
        let ids: Vec<_> = diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["MRG005", "MRG004", "MRG002"]);
        let local = &diagnostics[2];
        assert_eq!(local.message, "Local 'x' is returned immediately after declaration");
        assert_eq!(local.location.line, 11);
        assert_eq!(local.severity, Severity::Info);
        assert_eq!(local.fade_out.len(), 5);
    }

    #[test]
    fn disabled_rules_and_severity_overrides() {
        let config = RulesConfig::from_toml_str(
            "[rules.MRG005]\nenabled = false\n[rules.MRG004]\nseverity = \"error\"\n",
        )
        .unwrap();
        let engine = AnalysisEngine::new(config);
        let document = Document::parse(SAMPLE).unwrap();
        let diagnostics = engine.analyze(&document, &CancellationToken::new()).unwrap();
        assert!(diagnostics.iter().all(|d| d.rule_id != "MRG005"));
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn cancelled_token_stops_analysis() {
        let engine = AnalysisEngine::default();
        let token = CancellationToken::new();
        token.cancel();
        let document = Document::parse(SAMPLE).unwrap();
        assert!(matches!(engine.analyze(&document, &token), Err(ConsolidationError::Cancelled)));
    }

    #[test]
    fn parallel_results_keep_input_order() {
        let engine = AnalysisEngine::default();
        let documents = vec![
            Document::parse("void M() { if (a) { if (b) F(); } }").unwrap(),
            Document::parse("void M() { F(); }").unwrap(),
            Document::parse(SAMPLE).unwrap(),
        ];
        let results = engine.analyze_documents(&documents, &CancellationToken::new()).unwrap();
        let counts: Vec<_> = results.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![1, 0, 3]);
    }
}
