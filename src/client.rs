use std::time::Duration;

use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE, COOKIE, PRAGMA};
use hyper::{Body, Client, Method, Request, Response, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::middleware::logger::{log_request, log_response};
use crate::structs::post::{EditPost, LikePost, NewPost};
use crate::structs::reply::{LikeReply, ServerReply};
use crate::utils::app_error::ClientError;

pub const NEW_POST_PATH: &str = "/new";
pub const EDIT_POST_PATH: &str = "/edit";
pub const LIKE_POST_PATH: &str = "/like";
pub const FOLLOW_PATH: &str = "/follow";

/// Client of the network json api.
///
/// Cheap to clone, clones share the same connection pool.
#[derive(Clone)]
pub struct NetworkClient {
    http: Client<HttpConnector>,
    base_url: String,
    session_cookie: Option<HeaderValue>,
    request_timeout: Option<Duration>,
    json_content_type: bool,
    check_post_status: bool,
}

impl NetworkClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        base_url
            .parse::<Uri>()
            .map_err(|_| ClientError::InvalidUri(base_url.clone()))?;

        let session_cookie = match &config.session_cookie {
            Some(cookie) => Some(
                HeaderValue::from_str(cookie)
                    .map_err(|_| ClientError::InvalidHeader(COOKIE.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            http: Client::new(),
            base_url,
            session_cookie,
            request_timeout: config.request_timeout,
            json_content_type: config.json_content_type,
            check_post_status: config.check_post_status,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Uri, ClientError> {
        let uri = format!("{}{}", self.base_url, path);
        uri.parse().map_err(|_| ClientError::InvalidUri(uri))
    }

    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, ClientError> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        log_request(&method, &uri);

        let response = match self.request_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.http.request(request))
                .await
                .map_err(|_| {
                    warn!("{method} {uri} timed out after {timeout:?}");
                    ClientError::Timeout
                })?,
            None => self.http.request(request).await,
        }
        .map_err(|e| {
            warn!("{method} {uri} failed : {e}");
            ClientError::Transport(e)
        })?;

        log_response(&method, &uri, response.status());
        Ok(response)
    }

    fn request_builder(&self, method: Method, uri: Uri) -> hyper::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie.clone());
        }
        builder
    }

    /// Send `body` as json and decode the json reply, whatever its status.
    ///
    /// The body is decoded before the status is looked at, so a reply that is not
    /// json fails with `InvalidJson` whatever its status.
    async fn exchange_json<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, serde_json::Value), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let uri = self.endpoint(path)?;
        let mut builder = self
            .request_builder(method, uri)
            .header(ACCEPT, "application/json");

        let body = match body {
            Some(body) => {
                if self.json_content_type {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                }
                Body::from(serde_json::to_vec(body).map_err(ClientError::Encode)?)
            }
            None => Body::empty(),
        };

        let response = self.send(builder.body(body)?).await?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await?;

        let reply = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Error decoding reply of {path} ({status}) : {e}");
            ClientError::InvalidJson(e)
        })?;
        Ok((status, reply))
    }

    /// Like `exchange_json`, but a non-2xx reply is `Rejected`
    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, reply) = self.exchange_json(method, path, body).await?;
        if !status.is_success() {
            return Err(rejection(status, reply));
        }

        serde_json::from_value(reply).map_err(|e| {
            warn!("Unexpected reply of {path} : {e}");
            ClientError::InvalidJson(e)
        })
    }

    /// Publish a new post for the logged user. The reply is returned as is.
    ///
    /// Any json reply counts as published unless the client was configured to
    /// check the status of new posts.
    pub async fn publish_post(&self, post: &NewPost) -> Result<serde_json::Value, ClientError> {
        let (status, reply) = self
            .exchange_json(Method::POST, NEW_POST_PATH, Some(post))
            .await?;

        if !status.is_success() {
            if self.check_post_status {
                return Err(rejection(status, reply));
            }
            warn!("{NEW_POST_PATH} answered {status} : {reply}");
        }

        Ok(reply)
    }

    pub async fn edit_post(&self, post_id: i64, content: impl Into<String>) -> Result<ServerReply, ClientError> {
        let edit = EditPost {
            post_id,
            content: content.into(),
        };
        self.send_json(Method::PUT, EDIT_POST_PATH, Some(&edit)).await
    }

    /// Toggle the like of the logged user on a post, returns whether it is now liked
    pub async fn like_post(&self, post_id: i64) -> Result<bool, ClientError> {
        let reply: LikeReply = self
            .send_json(Method::PUT, LIKE_POST_PATH, Some(&LikePost { post_id }))
            .await?;
        Ok(reply.liked)
    }

    /// Follow `username`, or unfollow if already followed
    pub async fn follow_user(&self, username: &str) -> Result<ServerReply, ClientError> {
        let path = format!("{FOLLOW_PATH}/{}", urlencoding::encode(username));
        self.send_json::<(), _>(Method::POST, &path, None).await
    }

    /// Fetch a page from the server, skipping every cache on the way
    pub async fn fetch_page(&self, path: &str) -> Result<Bytes, ClientError> {
        let uri = self.endpoint(path)?;
        let request = self
            .request_builder(Method::GET, uri)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .body(Body::empty())?;

        let response = self.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Rejected {
                status,
                message: None,
            });
        }

        Ok(hyper::body::to_bytes(response.into_body()).await?)
    }
}

fn rejection(status: StatusCode, reply: serde_json::Value) -> ClientError {
    let message = serde_json::from_value::<ServerReply>(reply)
        .ok()
        .and_then(|r| r.error);
    ClientError::Rejected { status, message }
}
