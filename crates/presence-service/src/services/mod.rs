//! Pipeline services
//!
//! Each service borrows the shared `ServiceContext` for the duration of one
//! operation; the long-running loops live in `crate::runtime`.

pub mod accumulator;
pub mod context;
pub mod detector;
pub mod error;
pub mod query;
pub mod rank;
pub mod recorder;
pub mod sampler;

pub use accumulator::VoiceDurationAccumulator;
pub use context::ServiceContext;
pub use detector::{ChangeDetector, DetectorCounters, PollOutcome, PollReport, PollWindow};
pub use error::{domain_status_code, ServiceError, ServiceResult};
pub use query::{AggregateQueryEngine, Headcount, VoiceCallStatus, VoiceRank};
pub use rank::{rank_entries, RankComputer};
pub use recorder::{voice_transitions, RecordReport, Transition, VoiceEventRecorder};
pub use sampler::{tally, GuildFailure, MemberPresence, PresenceSampler, PresenceTally, SweepReport};
