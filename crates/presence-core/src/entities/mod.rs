//! Domain entities - core business objects

mod guild;
mod member;
mod presence;
mod rank;
mod snapshot;
mod voice_event;

pub use guild::GuildRef;
pub use member::Member;
pub use presence::{PresenceStatus, VoiceState};
pub use rank::{decode_ranking, RankEntry, VoiceRankFact};
pub use snapshot::{MeasurementKind, PresenceAggregateSnapshot, EMPTY_ONCALL_SENTINEL};
pub use voice_event::{EventType, VoiceTransitionEvent};
