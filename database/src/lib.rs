use std::{
    error::Error,
    fmt::Display,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[macro_use]
extern crate log;

mod list;

pub use list::*;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// In-memory, insertion ordered collection of rows.
///
/// Lives only as long as the process. Reads may run concurrently with each other,
/// writes are exclusive.
pub struct Database<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Database<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Remove every row
    pub fn clear(&self) -> DatabaseResult<()> {
        let mut rows = self.write()?;
        let removed = rows.len();
        rows.clear();
        debug!("cleared {} rows", removed);
        Ok(())
    }

    pub fn len(&self) -> DatabaseResult<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> DatabaseResult<RwLockReadGuard<'_, Vec<T>>> {
        trace!("acquiring read lock on '{}'", std::any::type_name::<T>());
        self.rows.read().map_err(DatabaseError::from)
    }

    fn write(&self) -> DatabaseResult<RwLockWriteGuard<'_, Vec<T>>> {
        trace!("acquiring write lock on '{}'", std::any::type_name::<T>());
        self.rows.write().map_err(DatabaseError::from)
    }
}

impl<T> Default for Database<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    /// A thread panicked while holding the lock, the rows may be inconsistent
    LockPoisoned,
}

impl<G> From<PoisonError<G>> for DatabaseError {
    fn from(_: PoisonError<G>) -> Self {
        error!("database lock is poisoned");
        DatabaseError::LockPoisoned
    }
}

impl Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            DatabaseError::LockPoisoned => "database lock poisoned",
        };

        write!(f, "{}", output)
    }
}

impl Error for DatabaseError {}

/// Result of an insert, carrying the stored row on success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertionResult<T> {
    Inserted(T),
    AlreadyExists,
}
