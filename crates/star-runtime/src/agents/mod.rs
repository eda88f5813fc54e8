//! Enhancers turn a rule-based draft into model output.
//!
//! An enhancer only produces text. Validation, caching and fallback belong
//! to `EnhancedRewriter`.

mod enhancer;
mod llm;

pub use enhancer::{AgentError, Enhancement, EnhancementRequest, Enhancer};
pub use llm::LlmEnhancer;
