/*!
# Consolidation Analyzer

Classifier, triviality gate, rule families and the engine that drives them.

```text
Document ─► SemanticModel ─► AnalysisEngine (single walk)
                                 │  per node: RuleFamily::find
                                 ▼
                             Candidate ─► rewrite::plan ─► Plan (edit + fade-out)
```
*/

pub mod classifier;
pub mod context;
pub mod engine;
pub mod families;
pub mod pool;
pub mod trivia;
pub mod walkers;

pub use context::{Candidate, CandidateData, RuleContext};
pub use engine::{AnalysisEngine, CancellationToken};
pub use families::RuleFamily;
pub use pool::{Pooled, PooledWalker, PoolStats};
