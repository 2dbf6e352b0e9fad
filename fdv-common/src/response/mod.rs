//! Pipeline response envelope and structural classification
//!
//! Responses arrive as untyped JSON produced by the upstream forecasting
//! pipeline. Every response shares a common envelope (`summary`,
//! `reasoning_steps`, `recommendations`, ...) and a `results` object whose
//! key set identifies which result shape it carries.
//!
//! # Architecture
//!
//! - [`envelope`]: lenient typed view over the shared envelope fields
//! - [`variant`]: structural classifier and typed decode step
//! - [`response_type`]: the requested response type (dashboard selector)

pub mod envelope;
pub mod response_type;
pub mod variant;

pub use envelope::{summary_of, Envelope, ExternalSources, QueryMetadata, ReasoningStep, Recommendation};
pub use response_type::ResponseType;
pub use variant::{classify, ClassifiedResponse, ResponseVariant};
