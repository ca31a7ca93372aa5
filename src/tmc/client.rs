//! TMC Client
//!
//! Main client for interacting with the TMC API, combining authentication,
//! HTTP functionality and URL construction. Typed per-kind accessors are
//! built on the generic [`Resources`] handle.

use super::auth::TmcCredentials;
use super::error::{Result, TmcError};
use super::http::TmcHttpClient;
use super::identity::FullName;
use super::meta::Metadata;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use url::Url;

/// API version prefix of every path
pub const API_VERSION: &str = "v1alpha1";

/// A TMC object addressable through the generic CRUD endpoints
pub trait ApiObject: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Key of the single wrapper object in request and response bodies
    const KIND: &'static str;

    /// Whether create requests carry the parent scope as query parameters
    const SCOPED_CREATE: bool = false;

    /// Path segments of the collection the object lives in
    fn collection_segments(name: &FullName) -> Vec<String>;

    /// Path segments of the object itself
    fn item_segments(name: &FullName) -> Vec<String> {
        let mut segments = Self::collection_segments(name);
        segments.push(name.name.clone());
        segments
    }

    fn full_name(&self) -> &FullName;

    fn meta(&self) -> &Metadata;

    fn meta_mut(&mut self) -> &mut Metadata;
}

/// Main TMC client
#[derive(Clone)]
pub struct TmcClient {
    pub credentials: TmcCredentials,
    pub http: TmcHttpClient,
    base_url: Url,
}

impl TmcClient {
    /// Create a client for the organization at `org_url`
    pub fn new(org_url: &str, credentials: TmcCredentials, http: TmcHttpClient) -> Result<Self> {
        let base_url = Url::parse(org_url)
            .map_err(|e| TmcError::validation(format!("invalid org URL '{}': {}", org_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TmcError::validation(format!(
                "org URL '{}' cannot be used as a base URL",
                org_url
            )));
        }

        Ok(Self {
            credentials,
            http,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an API URL from path segments and query parameters
    pub fn api_url(&self, segments: &[String], params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            // cannot_be_a_base was rejected in new()
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().push(API_VERSION);
                path.extend(segments.iter().map(String::as_str));
            }
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter().copied());
        }
        url
    }

    /// Make a GET request to the TMC API
    pub async fn get(&self, url: &Url) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        let result = self.http.get(url, &token).await;
        self.observe(result).await
    }

    /// Make a POST request to the TMC API
    pub async fn post(&self, url: &Url, body: &Value) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        let result = self.http.post(url, &token, body).await;
        self.observe(result).await
    }

    /// Make a PUT request to the TMC API
    pub async fn put(&self, url: &Url, body: &Value) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        let result = self.http.put(url, &token, body).await;
        self.observe(result).await
    }

    /// Make a DELETE request to the TMC API
    pub async fn delete(&self, url: &Url) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        let result = self.http.delete(url, &token).await;
        self.observe(result).await
    }

    /// Drop the cached access token when the server rejects it
    async fn observe(&self, result: Result<Value>) -> Result<Value> {
        if let Err(TmcError::Unauthorized { .. }) = &result {
            self.credentials.invalidate().await;
        }
        result
    }

    /// Generic CRUD handle for one object kind
    pub fn resources<T: ApiObject>(&self) -> Resources<'_, T> {
        Resources {
            client: self,
            _kind: PhantomData,
        }
    }
}

/// Wrap `object` as `{"<key>": object}`
pub fn wrap_object<T: Serialize>(key: &str, object: &T) -> Result<Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), serde_json::to_value(object)?);
    Ok(Value::Object(map))
}

/// Take the object stored under `key` out of a response body
pub fn unwrap_object<T: DeserializeOwned>(key: &str, mut body: Value) -> Result<T> {
    let inner = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| TmcError::decode(format!("response is missing the '{}' object", key)))?;

    serde_json::from_value(inner)
        .map_err(|e| TmcError::decode(format!("malformed '{}' object: {}", key, e)))
}

/// Typed CRUD accessor; every call is exactly one round trip
pub struct Resources<'a, T> {
    client: &'a TmcClient,
    _kind: PhantomData<T>,
}

impl<T: ApiObject> Resources<'_, T> {
    /// Fetch the object addressed by `name`
    pub async fn get(&self, name: &FullName) -> Result<T> {
        let url = self
            .client
            .api_url(&T::item_segments(name), &name.scope_params());
        let body = self.client.get(&url).await?;
        unwrap_object(T::KIND, body)
    }

    /// Create `object`; server-owned metadata is never sent
    pub async fn create(&self, object: &T) -> Result<T> {
        let mut outbound = object.clone();
        outbound.meta_mut().strip_server_fields();

        let name = outbound.full_name();
        let params = if T::SCOPED_CREATE {
            name.scope_params()
        } else {
            Vec::new()
        };
        let url = self
            .client
            .api_url(&T::collection_segments(name), &params);

        let body = wrap_object(T::KIND, &outbound)?;
        let response = self.client.post(&url, &body).await?;
        unwrap_object(T::KIND, response)
    }

    /// Replace `object`; it must carry the resource version it was read at
    pub async fn update(&self, object: &T) -> Result<T> {
        if object.meta().resource_version.is_none() {
            return Err(TmcError::validation(format!(
                "{} '{}' cannot be updated without a resource version",
                T::KIND,
                object.full_name().name
            )));
        }

        let name = object.full_name();
        let url = self
            .client
            .api_url(&T::item_segments(name), &name.scope_params());

        let body = wrap_object(T::KIND, object)?;
        let response = self.client.put(&url, &body).await?;
        unwrap_object(T::KIND, response)
    }

    /// Delete the object addressed by `name`
    pub async fn delete(&self, name: &FullName) -> Result<()> {
        let url = self
            .client
            .api_url(&T::item_segments(name), &name.scope_params());
        self.client.delete(&url).await?;
        Ok(())
    }
}
