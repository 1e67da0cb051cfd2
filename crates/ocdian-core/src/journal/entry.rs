use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An intrusive thought and, once recorded, the response to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub obsession: String,
    #[serde(default)]
    pub compulsion: Option<String>,
}

impl LogEntry {
    pub fn new(obsession: impl Into<String>, compulsion: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            obsession: obsession.into(),
            compulsion,
        }
    }

    pub fn has_response(&self) -> bool {
        self.compulsion.as_deref().is_some_and(|c| !c.is_empty())
    }
}
