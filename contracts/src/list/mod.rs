pub use add_list::*;

use chrono::{DateTime, Utc};

mod add_list;

/// A single to-do list, as returned by the API.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ListRecord {
    pub id: String,
    pub modified: DateTime<Utc>,
    pub name: String,
    pub list: Vec<String>,
}

impl ListRecord {
    pub fn new(id: String, modified: DateTime<Utc>, name: String, list: Vec<String>) -> Self {
        Self {
            id,
            modified,
            name,
            list,
        }
    }
}

/// Short form of a [`ListRecord`], pointing at the full resource.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ListSummary {
    pub name: String,
    pub link: String,
}

impl ListSummary {
    pub fn new(name: String, link: String) -> Self {
        Self { name, link }
    }
}
