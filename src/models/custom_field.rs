use serde::{Deserialize, Serialize};

/// Custom field descriptor scoped to a project and issue type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: String,
    pub name: String,
}
