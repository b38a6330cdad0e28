use crate::{app::AppError, auth::CredentialVerifier, ids::IdGenerator};
use chrono::{DateTime, Utc};
use contracts::{AddListParams, Authorization, ListRecord, ListSummary, Outcome, Status};
use database::{Database, InsertionResult, ListRecord as DbListRecord};
use serde_json::Value as JsonValue;
use std::{convert::TryFrom, sync::Arc};

const LINK_SCHEME: &str = "http://";
const LISTS_PATH: &str = "/lists/";

/// Attempts at finding an unused id before giving up on an insert.
const MAX_ID_ATTEMPTS: usize = 3;

mod messages {
    pub const LIST_FOUND: &str = "list found";
    pub const LIST_NOT_FOUND: &str = "list not found";
    pub const NO_LISTS_FOUND: &str = "no lists found";
    pub const MISSING_BASIC_AUTH: &str = "missing basic auth";
    pub const INVALID_CREDENTIALS: &str = "invalid credentials";
    pub const JSON_DATA_MISSING: &str = "JSON data missing in request body";
    pub const NEW_LIST_ADDED: &str = "new list added";
}

pub struct ListController {
    db: Arc<Database<DbListRecord>>,
    credentials: Arc<dyn CredentialVerifier>,
    ids: Arc<dyn IdGenerator>,
}

impl ListController {
    pub fn new(
        list_db: Arc<Database<DbListRecord>>,
        credentials: Arc<dyn CredentialVerifier>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            db: list_db,
            credentials,
            ids,
        }
    }

    /// Drop every stored list.
    pub fn clear_all(&self) {
        if let Err(error) = self.db.clear() {
            error!("failed to clear lists: '{}'", error);
        }
    }

    pub fn get_by_id(&self, id: &str) -> Outcome<ListRecord> {
        self.try_get_by_id(id).unwrap_or_else(AppError::into_outcome)
    }

    /// Summaries of every stored list, each linking to its full resource on `host`.
    pub fn get_all(&self, host: &str) -> Outcome<Vec<ListSummary>> {
        self.try_get_all(host).unwrap_or_else(AppError::into_outcome)
    }

    /// Store a new list.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// presence of basic auth, the credentials themselves, then the shape of `body`.
    /// Nothing is stored unless all of them pass.
    pub fn add_new(&self, auth: &Authorization, body: Option<JsonValue>) -> Outcome<ListRecord> {
        self.try_add_new(auth, body).unwrap_or_else(AppError::into_outcome)
    }

    fn try_get_by_id(&self, id: &str) -> Result<Outcome<ListRecord>, AppError> {
        let outcome = match self.db.get_list(id)? {
            Some(list) => Outcome::new(Status::Ok, messages::LIST_FOUND)
                .with_data(ListRecordWrapper::from(list).0),
            None => {
                debug!("no list with id '{}'", id);
                Outcome::new(Status::NotFound, messages::LIST_NOT_FOUND)
            }
        };

        Ok(outcome)
    }

    fn try_get_all(&self, host: &str) -> Result<Outcome<Vec<ListSummary>>, AppError> {
        let lists = self.db.get_lists()?;

        if lists.is_empty() {
            return Ok(Outcome::new(Status::NotFound, messages::NO_LISTS_FOUND));
        }

        let summaries: Vec<ListSummary> = lists
            .into_iter()
            .map(|list| ListSummary::new(list.name, list_link(host, &list.id)))
            .collect();

        let message = format!("{} lists found", summaries.len());
        Ok(Outcome::new(Status::Ok, message).with_data(summaries))
    }

    fn try_add_new(
        &self,
        auth: &Authorization,
        body: Option<JsonValue>,
    ) -> Result<Outcome<ListRecord>, AppError> {
        let credentials = match &auth.basic {
            Some(credentials) => credentials,
            None => {
                info!("rejected new list, missing basic auth");
                return Ok(Outcome::new(
                    Status::Unauthorized,
                    messages::MISSING_BASIC_AUTH,
                ));
            }
        };

        if !self
            .credentials
            .verify(&credentials.username, &credentials.password)
        {
            info!(
                "rejected new list, invalid credentials for user '{}'",
                credentials.username
            );
            return Ok(Outcome::new(
                Status::Unauthorized,
                messages::INVALID_CREDENTIALS,
            ));
        }

        let params = match AddListParams::try_from(body) {
            Ok(params) => params,
            Err(invalid) => {
                info!("rejected new list, invalid body: {}", invalid);
                return Ok(Outcome::new(
                    Status::BadRequest,
                    messages::JSON_DATA_MISSING,
                ));
            }
        };

        let list = self.insert_with_new_id(&params, Utc::now())?;
        info!("added list '{}' with {} items", list.id, list.items.len());

        Ok(Outcome::new(Status::Created, messages::NEW_LIST_ADDED)
            .with_data(ListRecordWrapper::from(list).0))
    }

    /// Returns the row as stored, read under the insert's own lock.
    fn insert_with_new_id(
        &self,
        params: &AddListParams,
        modified: DateTime<Utc>,
    ) -> Result<DbListRecord, AppError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            match self
                .db
                .insert_list(&id, &params.name, &params.list, modified)?
            {
                InsertionResult::Inserted(list) => return Ok(list),
                InsertionResult::AlreadyExists => continue,
            }
        }

        Err(AppError::internal_error()
            .with_message("failed to generate a unique list id")
            .with_context(&MAX_ID_ATTEMPTS))
    }
}

fn list_link(host: &str, id: &str) -> String {
    format!("{}{}{}{}", LINK_SCHEME, host, LISTS_PATH, id)
}

struct ListRecordWrapper(ListRecord);

impl From<DbListRecord> for ListRecordWrapper {
    fn from(db_list: DbListRecord) -> Self {
        ListRecordWrapper(ListRecord::new(
            db_list.id,
            db_list.modified,
            db_list.name,
            db_list.items,
        ))
    }
}
