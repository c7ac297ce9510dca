//! Status classification and the `(payload, status)` reply projection
//! consumed by the routing layer.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    NotFound,
    Conflict,
    ServerError,
}

impl Status {
    /// HTTP status code equivalent.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::ServerError => 500,
        }
    }
}

/// Errors that carry their own status classification.
pub trait StatusError: Display {
    fn status(&self) -> Status;
}

/// A serialized payload paired with its status.
///
/// Success payloads are the record projection of the result; failures are
/// `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: Status,
    pub body: Value,
}

impl Reply {
    pub fn from_result<T, E>(result: Result<T, E>, success: Status) -> Self
    where
        T: Serialize,
        E: StatusError,
    {
        match result {
            Ok(payload) => match serde_json::to_value(payload) {
                Ok(body) => Self {
                    status: success,
                    body,
                },
                Err(err) => Self::failure(Status::ServerError, err),
            },
            Err(err) => Self::error(&err),
        }
    }

    pub fn error<E: StatusError>(err: &E) -> Self {
        Self::failure(err.status(), err)
    }

    fn failure(status: Status, message: impl Display) -> Self {
        Self {
            status,
            body: json!({ "error": message.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Reply, Status, StatusError};
    use serde_json::json;
    use std::fmt::{Display, Formatter};

    #[derive(Debug)]
    struct Missing;

    impl Display for Missing {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("missing")
        }
    }

    impl StatusError for Missing {
        fn status(&self) -> Status {
            Status::NotFound
        }
    }

    #[test]
    fn success_uses_caller_status() {
        let reply = Reply::from_result::<_, Missing>(Ok(json!({"id": 1})), Status::Created);
        assert_eq!(reply.status.code(), 201);
        assert_eq!(reply.body["id"], 1);
    }

    #[test]
    fn failure_body_carries_message() {
        let reply = Reply::from_result::<(), _>(Err(Missing), Status::Ok);
        assert_eq!(reply.status, Status::NotFound);
        assert_eq!(reply.body, json!({"error": "missing"}));
    }

    #[test]
    fn every_status_maps_to_its_http_code() {
        let codes: Vec<u16> = [
            Status::Ok,
            Status::Created,
            Status::BadRequest,
            Status::NotFound,
            Status::Conflict,
            Status::ServerError,
        ]
        .into_iter()
        .map(Status::code)
        .collect();
        assert_eq!(codes, vec![200, 201, 400, 404, 409, 500]);
    }
}
