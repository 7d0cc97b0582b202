mod candidate;
pub mod track;

pub use candidate::{CandidateMatch, Resolution, ResolvedInfo};
pub use track::{FieldSelector, TrackRecord, UNKNOWN, UNKNOWN_YEAR};
