// Deck build orchestration: the one-shot selection pipeline and its HTTP
// handlers. Rendering lives behind the render module's backend trait.

pub mod handlers;
pub mod pipeline;

pub use pipeline::{build_plan, DeckPlan};
