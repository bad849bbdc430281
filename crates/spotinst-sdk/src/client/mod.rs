//! Shared request pipeline
//!
//! Every service handler funnels its calls through [`Client::execute`], which
//! validates configuration, authenticates, sends the request bounded by the
//! caller's [`Context`] and decodes the response envelope.

mod curl;
mod request;
mod response;

pub use curl::format_curl;
pub use request::Request;
pub use response::Response;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use spotinst_config::{ConfigError, DEFAULT_CONTENT_TYPE, DEFAULT_USER_AGENT};
use tracing::{Span, debug, instrument, trace};
use url::Url;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::session::Session;

const ACCOUNT_ID_PARAM: &str = "accountId";

/// Executes requests against the API using a shared [`Session`]
#[derive(Debug, Clone)]
pub struct Client {
    session: Session,
}

impl Client {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send one request and decode the response envelope
    ///
    /// Nothing is sent if the configuration is incomplete, a path parameter
    /// is unbound, or `ctx` is already done. The request is dropped as soon
    /// as `ctx` is cancelled or its deadline passes.
    ///
    /// ## Errors
    ///
    /// - [`Error::Config`] if the endpoint or token is missing
    /// - [`Error::Validation`] if the path template cannot be expanded
    /// - [`Error::Context`] if `ctx` finishes before the response is read
    /// - [`Error::Transport`] on network failures
    /// - [`Error::Api`] for any non-2xx response
    /// - [`Error::Decode`] if a 2xx body is not a valid envelope
    #[instrument(
        name = "spotinst_request",
        skip(self, ctx, request),
        fields(
            http.method = %request.method(),
            http.path = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        )
    )]
    pub async fn execute(&self, ctx: &Context, request: Request) -> Result<Response> {
        let config = self.session.config();
        config.validate()?;

        if let Some(err) = ctx.err() {
            debug!("Context already done, request not sent: {}", err);
            return Err(err.into());
        }

        let path = request.expand_path()?;
        Span::current().record("http.path", path.as_str());

        let base_url = config.base_url().ok_or(ConfigError::MissingEndpoint)?;
        let token = config.token().ok_or(ConfigError::MissingCredentials)?;
        let url = build_url(base_url, &path, &request, config.account())?;

        let content_type = config
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        trace!(
            "{}",
            format_curl(
                request.method(),
                &url,
                content_type,
                user_agent,
                request.body()
            )
        );

        let mut builder = self
            .session
            .http()
            .request(request.method().clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, content_type)
            .header(CONTENT_TYPE, content_type)
            .header(USER_AGENT, user_agent);

        if let Some(body) = request.body() {
            builder = builder.body(serde_json::to_vec(body).map_err(Error::Encode)?);
        }

        let round_trip = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match ctx.run(round_trip).await {
            Ok(result) => result?,
            Err(err) => {
                debug!("Request abandoned: {}", err);
                return Err(err.into());
            }
        };

        Span::current().record("http.status_code", status.as_u16());
        debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        if !status.is_success() {
            let err = response::api_error(status.as_u16(), status.canonical_reason(), &body);
            debug!("API error: {}", err);
            return Err(err.into());
        }

        Response::from_body(status.as_u16(), &body)
    }
}

/// Join base URL and expanded path, then append query parameters
///
/// The session account is sent as `accountId` unless the request sets one.
fn build_url(base: &Url, path: &str, request: &Request, account: Option<&str>) -> Result<Url> {
    let raw = format!("{}{}", base.as_str().trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.clone(),
        source,
    })?;

    let account = account.filter(|_| !request.has_query(ACCOUNT_ID_PARAM));
    if !request.query_params().is_empty() || account.is_some() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in request.query_params() {
            pairs.append_pair(name, value);
        }
        if let Some(account) = account {
            pairs.append_pair(ACCOUNT_ID_PARAM, account);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.spotinst.io/").unwrap()
    }

    #[test]
    fn test_build_url_appends_account() {
        let request = Request::get("/setup/account");
        let url = build_url(&base(), "/setup/account", &request, Some("act-1")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.spotinst.io/setup/account?accountId=act-1"
        );
    }

    #[test]
    fn test_build_url_without_query() {
        let request = Request::get("/setup/account");
        let url = build_url(&base(), "/setup/account", &request, None).unwrap();
        assert_eq!(url.as_str(), "https://api.spotinst.io/setup/account");
    }

    #[test]
    fn test_explicit_account_id_wins() {
        let request = Request::get("/setup/credentials/aws").query(ACCOUNT_ID_PARAM, "act-other");
        let url = build_url(&base(), "/setup/credentials/aws", &request, Some("act-1")).unwrap();
        assert_eq!(url.query(), Some("accountId=act-other"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/proxy/").unwrap();
        let request = Request::get("/ocean/aws/k8s/cluster").query("limit", 10);
        let url = build_url(&base, "/ocean/aws/k8s/cluster", &request, None).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/proxy/ocean/aws/k8s/cluster?limit=10"
        );
    }
}
