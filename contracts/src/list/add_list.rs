use serde_json::Value;
use std::{convert::TryFrom, error::Error, fmt::Display};

/// Validated body of a request to add a new list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[non_exhaustive]
pub struct AddListParams {
    pub name: String,
    pub list: Vec<String>,
}

impl AddListParams {
    pub fn new(name: String, list: Vec<String>) -> Self {
        Self { name, list }
    }
}

/// Checks run in order, the first one failing decides the error.
impl TryFrom<Option<Value>> for AddListParams {
    type Error = AddListParamsInvalid;

    fn try_from(body: Option<Value>) -> Result<Self, Self::Error> {
        let mut body = match body {
            None | Some(Value::Null) => return Err(AddListParamsInvalid::BodyMissing),
            Some(body) => body,
        };

        let name = match body.get_mut("name").map(Value::take) {
            Some(Value::String(name)) => name,
            _ => return Err(AddListParamsInvalid::NameNotString),
        };

        let items = match body.get_mut("list").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(AddListParamsInvalid::ListNotArray),
        };

        let list = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(item) => Ok(item),
                _ => Err(AddListParamsInvalid::ListItemNotString { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(name, list))
    }
}

impl TryFrom<Value> for AddListParams {
    type Error = AddListParamsInvalid;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        Self::try_from(Some(body))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddListParamsInvalid {
    BodyMissing,
    NameNotString,
    ListNotArray,
    ListItemNotString { index: usize },
}

impl Error for AddListParamsInvalid {}

impl Display for AddListParamsInvalid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            AddListParamsInvalid::BodyMissing => "missing request body".to_owned(),
            AddListParamsInvalid::NameNotString => "'name' must be a string".to_owned(),
            AddListParamsInvalid::ListNotArray => "'list' must be an array".to_owned(),
            AddListParamsInvalid::ListItemNotString { index } => {
                format!("'list[{}]' must be a string", index)
            }
        };

        write!(f, "{}", output)
    }
}
