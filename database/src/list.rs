use crate::{Database, DatabaseResult, InsertionResult};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ListRecord {
    pub id: String,
    pub name: String,
    pub items: Vec<String>,
    pub modified: DateTime<Utc>,
}

impl ListRecord {
    fn new(id: String, name: String, items: Vec<String>, modified: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            items,
            modified,
        }
    }
}

impl Database<ListRecord> {
    /// Append a list, unless a list with the same id is already stored.
    ///
    /// The stored row is returned from under the same lock as the insert.
    pub fn insert_list(
        &self,
        id: &str,
        name: &str,
        items: &[String],
        modified: DateTime<Utc>,
    ) -> DatabaseResult<InsertionResult<ListRecord>> {
        let mut rows = self.write()?;

        if rows.iter().any(|row| row.id == id) {
            warn!("list with id '{}' already exists", id);
            return Ok(InsertionResult::AlreadyExists);
        }

        let list = ListRecord::new(id.to_owned(), name.to_owned(), items.to_vec(), modified);
        rows.push(list.clone());
        trace!("inserted list '{}', {} lists stored", id, rows.len());

        Ok(InsertionResult::Inserted(list))
    }

    pub fn get_list(&self, id: &str) -> DatabaseResult<Option<ListRecord>> {
        let rows = self.read()?;

        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    /// All lists, in insertion order
    pub fn get_lists(&self) -> DatabaseResult<Vec<ListRecord>> {
        Ok(self.read()?.clone())
    }
}
