use crate::{
    auth::StaticCredentials, controller::ListController, ids::RandomIdGenerator, Settings,
};
use contracts::{Authorization, Outcome, Status};
use database::{Database, DatabaseError};
use hyper::{header::CONTENT_TYPE, Body, Response};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::{
    error::Error,
    fmt::{Debug, Display},
    sync::Arc,
};

pub type AppResult<T> = Result<T, AppError>;

/// A request the application knows how to handle.
#[derive(Debug)]
pub enum Route {
    /// Summaries of all lists, linking to resources on `host`
    GetLists { host: String },
    /// A single list
    GetList { id: String },
    /// Add a new list
    AddList {
        auth: Authorization,
        body: Option<JsonValue>,
    },
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            Route::GetLists { .. } => "get_lists",
            Route::GetList { .. } => "get_list",
            Route::AddList { .. } => "add_list",
        };
        write!(f, "{}", output)
    }
}

pub struct App {
    list_controller: ListController,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let list_db = Arc::new(Database::new());
        let credentials = Arc::new(StaticCredentials::new(
            settings.api_username.clone(),
            settings.api_password.clone(),
        ));

        let list_controller =
            ListController::new(list_db, credentials, Arc::new(RandomIdGenerator));

        Self { list_controller }
    }

    /// Handle a single routed request
    pub fn handle(&self, route: Route) -> Response<Body> {
        let timer = std::time::Instant::now();
        let name = route.to_string();
        trace!("handling route: {:?}", route);

        let response = match route {
            Route::GetLists { host } => json_response(&self.list_controller.get_all(&host)),
            Route::GetList { id } => json_response(&self.list_controller.get_by_id(&id)),
            Route::AddList { auth, body } => {
                json_response(&self.list_controller.add_new(&auth, body))
            }
        };

        debug!(
            "handled route '{}' with status {} in {:?}",
            name,
            response.status(),
            timer.elapsed()
        );

        response
    }
}

/// Serialize an outcome into a response carrying its status code and content type.
pub fn json_response<T>(outcome: &Outcome<T>) -> Response<Body>
where
    T: Serialize,
{
    match outcome.to_json_vec() {
        Ok(body) => Response::builder()
            .status(outcome.status.code())
            .header(CONTENT_TYPE, outcome.format.content_type())
            .body(Body::from(body))
            .expect("status codes and content types are static"),
        Err(serde_error) => {
            error!("failed to serialize outcome: '{}'", serde_error);
            let fallback: Outcome<()> =
                Outcome::new(Status::InternalServerError, "failed to serialize response");
            json_response(&fallback)
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: Status,
    pub message: String,
    pub context: Option<String>,
}

impl AppError {
    fn new(status: Status, message: &str) -> Self {
        Self {
            status,
            message: message.to_owned(),
            context: None,
        }
    }

    pub fn with_context<T>(mut self, value: &T) -> Self
    where
        T: Debug,
    {
        self.context = Some(format!("{:?}", value));
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_owned();
        self
    }

    pub fn invalid_request() -> Self {
        Self::new(Status::BadRequest, "invalid request")
    }

    pub fn internal_error() -> Self {
        Self::new(Status::InternalServerError, "internal error")
    }

    pub fn database_error() -> Self {
        Self::internal_error().with_message("database error")
    }

    /// Turn the error into the outcome sent to the client, logging the context first.
    pub fn into_outcome<T>(self) -> Outcome<T> {
        match &self.context {
            Some(context) => error!("{}, context: {}", self.message, context),
            None => error!("{}", self.message),
        }
        Outcome::new(self.status, self.message)
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for AppError {}

impl From<DatabaseError> for AppError {
    fn from(db_error: DatabaseError) -> Self {
        AppError::database_error().with_context(&db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_into_outcome() {
        let outcome: Outcome<()> = AppError::from(DatabaseError::LockPoisoned).into_outcome();

        assert_eq!(outcome.status, Status::InternalServerError);
        assert_eq!(outcome.message, "database error");
        assert_eq!(outcome.data, None);
    }

    #[test]
    fn json_response_test() {
        let outcome = Outcome::new(Status::Created, "new list added").with_data("abc");
        let response = json_response(&outcome);

        assert_eq!(response.status(), 201);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn route_names() {
        let route = Route::GetList {
            id: "abc".to_owned(),
        };
        assert_eq!(route.to_string(), "get_list");
    }
}
