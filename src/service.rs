//! Request boundary: validates a JSON request, runs the check and shapes the
//! JSON response together with the status it should be sent with.

use crate::error::{Error, InputError};
use crate::{CheckReport, CheckStatistics, Config, SpellingError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    InternalError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::InternalError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success {
        success: bool,
        errors: Vec<SpellingError>,
        stats: CheckStatistics,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl Response {
    pub fn success(report: CheckReport) -> Self {
        Response::Success {
            success: true,
            errors: report.errors,
            stats: report.stats,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Response::Failure {
            success: false,
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }
}

/// Extract the text to check from a request body `{ "text": "..." }`.
pub fn validate(body: &Value, max_length: usize) -> Result<&str, InputError> {
    let text = match body.get("text") {
        Some(Value::String(text)) if !text.is_empty() => text.as_str(),
        _ => return Err(InputError::MissingText),
    };
    let length = text.chars().count();
    if length > max_length {
        return Err(InputError::TooLong {
            length,
            limit: max_length,
        });
    }
    Ok(text)
}

/// Validate `body`, run `check` on its text and build the response.
pub fn handle<F>(body: &Value, max_length: usize, check: F) -> (Status, Response)
where
    F: FnOnce(&str) -> crate::Result<CheckReport>,
{
    let text = match validate(body, max_length) {
        Ok(text) => text,
        Err(err) => {
            log::debug!("Rejected request: {}", err);
            return (Status::BadRequest, Response::failure(err.to_string()));
        }
    };

    match check(text) {
        Ok(report) => (Status::Ok, Response::success(report)),
        Err(err @ Error::InvalidInput(_)) => (Status::BadRequest, Response::failure(err.to_string())),
        Err(err) => {
            log::error!("Spell check failed: {}", err);
            (Status::InternalError, Response::failure(err.to_string()))
        }
    }
}

/// Handle a raw JSON request body with the process-wide lexicon.
pub fn respond(body: &str, config: &Config) -> (Status, Response) {
    let body: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            let err = InputError::MalformedBody(err.to_string());
            return (Status::BadRequest, Response::failure(err.to_string()));
        }
    };
    handle(&body, config.max_text_length, |text| {
        crate::check_spelling(text, config)
    })
}
