//! Request descriptors
//!
//! A [`Request`] is the in-memory form of one API call before it is sent:
//! method, path template, path parameters, query parameters and an optional
//! JSON body. Placeholders in the template look like `{clusterId}`.

use reqwest::Method;
use serde::Serialize;

use crate::error::{Error, Result, ValidationError};

/// Description of a single API call
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    template: String,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            path_params: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(template: impl Into<String>) -> Self {
        Self::new(Method::GET, template)
    }

    pub fn post(template: impl Into<String>) -> Self {
        Self::new(Method::POST, template)
    }

    pub fn put(template: impl Into<String>) -> Self {
        Self::new(Method::PUT, template)
    }

    pub fn delete(template: impl Into<String>) -> Self {
        Self::new(Method::DELETE, template)
    }

    /// Bind a `{name}` placeholder
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a query parameter if `value` is set
    #[must_use]
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// True if a query parameter named `name` was set
    pub fn has_query(&self, name: &str) -> bool {
        self.query.iter().any(|(k, _)| k == name)
    }

    /// Substitute placeholders, percent-encoding each value
    ///
    /// Fails if a placeholder has no bound value.
    pub fn expand_path(&self) -> Result<String> {
        let mut path = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                ValidationError::new(
                    "path",
                    format!("unterminated placeholder in '{}'", self.template),
                )
            })?;
            let name = &after[..close];

            let value = self
                .path_params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v)
                .ok_or_else(|| {
                    ValidationError::new(
                        name,
                        format!("no value bound for path parameter in '{}'", self.template),
                    )
                })?;
            if value.is_empty() {
                return Err(ValidationError::new(name, "path parameter is empty").into());
            }

            path.push_str(&urlencoding::encode(value));
            rest = &after[close + 1..];
        }

        path.push_str(rest);
        Ok(path)
    }
}
