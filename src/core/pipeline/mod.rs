//! Acquisition pipeline
//!
//! Turns a request key plus media kind into a local artifact by walking an
//! ordered ladder of format candidates against the injected provider,
//! enforcing size and time budgets along the way. The pipeline holds no
//! state between calls; each acquisition is a pure function of the request
//! and the provider's responses.

mod acquire;
mod ladder;
mod platform;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use acquire::AcquisitionPipeline;
pub use ladder::format_ladder;
pub use platform::PlatformHint;
pub use types::{AcquireError, Artifact, FormatCandidate, MediaKind, PostProcess};
pub use workspace::Workspace;
