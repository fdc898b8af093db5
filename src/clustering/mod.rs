// Batch topic modeling — the optional external collaborator.
//
// The heuristic in `tagging` never touches this module. When a TopicModel
// implementation is wired in, `regenerate` rebuilds the whole taxonomy and
// corpus from a CSV source; when none is, the API reports the operation as
// unavailable and leaves the store untouched.

pub mod regenerate;
pub mod traits;

pub use regenerate::{regenerate, RegenerationSummary};
pub use traits::{TopicModel, TopicSummary, NOISE_TOPIC};
