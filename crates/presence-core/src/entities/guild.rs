//! Guild reference - the id/name pair the roster hands out

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A guild as seen by the roster provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildRef {
    pub id: Snowflake,
    pub name: String,
}

impl GuildRef {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
