//! # presence-service
//!
//! Application layer: the presence sampler, voice event recorder, change
//! detector, aggregate query engine, and rank computer, plus the task
//! runtime that drives them on their schedules.

pub mod dto;
pub mod runtime;
pub mod services;
pub mod settings;

#[cfg(test)]
mod testing;

pub use runtime::{shutdown_channel, spawn_collector, spawn_dispatcher, Shutdown, ShutdownTrigger};
pub use services::{
    AggregateQueryEngine, ChangeDetector, PollOutcome, PresenceSampler, RankComputer,
    ServiceContext, ServiceError, ServiceResult, VoiceDurationAccumulator, VoiceEventRecorder,
};
pub use settings::{
    CollectorSettings, DetectorSettings, QuerySettings, RankSettings, RecorderSettings,
    SamplerSettings,
};
