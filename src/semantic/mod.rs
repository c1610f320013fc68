/*!
# Semantic model

Scope-aware name binding and minimal type inference over one syntax tree
snapshot. Symbol identity is stable within a model: the same declaration
always maps to the same [`SymbolId`].
*/

pub mod model;
pub mod symbols;
pub mod types;

pub use model::SemanticModel;
pub use symbols::{RefKind, Symbol, SymbolId, SymbolKind};
pub use types::TypeRef;
