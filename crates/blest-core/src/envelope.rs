//! Request and response envelopes.
//!
//! On the wire a batch is a JSON array of 2-4-element arrays
//! `[id, route, params?, selector?]`, answered by an array of
//! `[id, route, result, error]` items correlated by id.

use crate::error::{BlestError, ErrorObject};
use crate::selector::Selector;
use crate::value::Object;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

/// One validated unit of a batch request.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// Client-chosen correlation id, unique within the batch.
    pub id: String,
    /// The route name to dispatch to.
    pub route: String,
    /// Parameters passed to every stage of the route's pipeline.
    pub params: Option<Object>,
    /// Projection applied to a successful result.
    pub selector: Option<Selector>,
}

impl RequestEnvelope {
    /// Parses and validates one batch item.
    ///
    /// The returned [`BlestError::BadRequest`] reasons are part of the
    /// protocol contract and are surfaced to clients verbatim.
    pub fn from_value(item: &Value) -> Result<Self, BlestError> {
        let Value::Array(fields) = item else {
            return Err(BlestError::bad_request("Request item should be an array"));
        };

        let id = match fields.first() {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => return Err(BlestError::bad_request("Request item should have an ID")),
        };

        let route = match fields.get(1) {
            Some(Value::String(route)) if !route.is_empty() => route.clone(),
            _ => return Err(BlestError::bad_request("Request item should have a route")),
        };

        let params = match fields.get(2) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                return Err(BlestError::bad_request(
                    "Request item parameters should be a JSON object",
                ))
            }
        };

        let selector = match fields.get(3) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(Selector::from_array(items)),
            Some(_) => {
                return Err(BlestError::bad_request(
                    "Request item selector should be a JSON array",
                ))
            }
        };

        Ok(Self {
            id,
            route,
            params,
            selector,
        })
    }

    /// The envelope echo seeded into the request context under `request`.
    #[must_use]
    pub fn echo(&self) -> Value {
        let mut echo = Object::new();
        echo.insert("id".to_owned(), Value::String(self.id.clone()));
        echo.insert("route".to_owned(), Value::String(self.route.clone()));
        echo.insert(
            "parameters".to_owned(),
            self.params
                .as_ref()
                .map_or(Value::Null, |params| Value::Object(params.clone())),
        );
        echo.insert(
            "selector".to_owned(),
            self.selector
                .as_ref()
                .map_or(Value::Null, Selector::to_value),
        );
        Value::Object(echo)
    }
}

/// One correlated unit of a batch response.
///
/// Exactly one of `result`/`error` is non-nil. Serializes as the wire tuple
/// `[id, route, result, error]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// The request's correlation id.
    pub id: String,
    /// The route name the request addressed.
    pub route: String,
    /// The (possibly projected) handler result on success.
    pub result: Option<Object>,
    /// The uniform error envelope on failure.
    pub error: Option<ErrorObject>,
}

impl ResponseEnvelope {
    /// Builds a successful response item.
    #[must_use]
    pub fn success(id: String, route: String, result: Object) -> Self {
        Self {
            id,
            route,
            result: Some(result),
            error: None,
        }
    }

    /// Builds a failed response item.
    #[must_use]
    pub fn failure(id: String, route: String, error: ErrorObject) -> Self {
        Self {
            id,
            route,
            result: None,
            error: Some(error),
        }
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.id)?;
        seq.serialize_element(&self.route)?;
        seq.serialize_element(&self.result)?;
        seq.serialize_element(&self.error)?;
        seq.end()
    }
}
