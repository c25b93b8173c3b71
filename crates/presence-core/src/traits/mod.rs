//! Collaborator traits

mod collaborators;

pub use collaborators::{NotificationSink, RepoResult, RosterProvider, TimeSeriesStore};
