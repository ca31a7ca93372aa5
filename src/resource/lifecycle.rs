//! Generic resource lifecycle
//!
//! One create/read/update/delete implementation shared by every resource
//! kind. A kind only describes how to address its remote object, how to
//! translate between the flat configuration and the wire record, and which
//! of its attributes can change in place.

use super::diagnostic::{Diagnostic, Operation};
use crate::tmc::client::{ApiObject, TmcClient};
use crate::tmc::error::{Result, TmcError};
use crate::tmc::identity::FullName;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Per-kind parameters of the lifecycle
pub trait ResourceKind {
    /// Flat configuration as held by the engine
    type Config: Clone + Default + Serialize + DeserializeOwned + Send + Sync;
    /// Wire record exchanged with TMC
    type Object: ApiObject;

    /// Engine-facing type name, e.g. `tmc_aws_cluster`
    const TYPE_NAME: &'static str;

    fn identity(config: &Self::Config) -> FullName;

    /// Outbound translation; validation failures surface here
    fn to_object(config: &Self::Config) -> Result<Self::Object>;

    /// Inbound translation of an authoritative record into `config`
    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()>;

    /// Local id of a remote object
    fn local_id(object: &Self::Object) -> Option<String> {
        object.meta().uid.clone()
    }

    /// Whether any in-place updatable attribute changed
    fn mutable_changed(_prior: &Self::Config, _proposed: &Self::Config) -> bool {
        false
    }

    /// Resource version recorded in state
    fn resource_version(_config: &Self::Config) -> Option<String> {
        None
    }

    /// Record the time of the last in-place update
    fn mark_updated(_config: &mut Self::Config, _timestamp: String) {}
}

/// State of one resource instance as exchanged with the engine
///
/// `id` is `None` when the remote object does not exist (never created,
/// deleted, or removed outside the engine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState<C> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub config: C,
}

impl<C> ResourceState<C> {
    pub fn new(id: Option<String>, config: C) -> Self {
        Self { id, config }
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }
}

/// Lifecycle of resource kind `K` against one configured client
pub struct Lifecycle<'a, K> {
    client: &'a TmcClient,
    _kind: std::marker::PhantomData<K>,
}

impl<'a, K: ResourceKind> Lifecycle<'a, K> {
    pub fn new(client: &'a TmcClient) -> Self {
        Self {
            client,
            _kind: std::marker::PhantomData,
        }
    }

    fn diagnostic(op: Operation, config: &K::Config, err: &TmcError) -> Diagnostic {
        let name = K::identity(config).to_string();
        Diagnostic::from_error(K::TYPE_NAME, op, &name, err)
    }

    /// Absent -> Created
    pub async fn create(
        &self,
        planned: &K::Config,
    ) -> std::result::Result<ResourceState<K::Config>, Diagnostic> {
        self.try_create(planned)
            .await
            .map_err(|e| Self::diagnostic(Operation::Create, planned, &e))
    }

    async fn try_create(&self, planned: &K::Config) -> Result<ResourceState<K::Config>> {
        let object = K::to_object(planned)?;
        let created = self.client.resources::<K::Object>().create(&object).await?;

        let id = K::local_id(&created).ok_or_else(|| {
            TmcError::decode(format!(
                "{} response carries no identifier",
                <K::Object as ApiObject>::KIND
            ))
        })?;

        let mut config = planned.clone();
        K::apply_object(&mut config, &created)?;

        tracing::info!("Created {} {} ({})", K::TYPE_NAME, K::identity(&config), id);
        Ok(ResourceState::new(Some(id), config))
    }

    /// Refresh state from the remote object; a vanished object clears the id
    pub async fn read(
        &self,
        state: &ResourceState<K::Config>,
    ) -> std::result::Result<ResourceState<K::Config>, Diagnostic> {
        let identity = K::identity(&state.config);

        match self.client.resources::<K::Object>().get(&identity).await {
            Ok(object) => {
                let mut config = state.config.clone();
                K::apply_object(&mut config, &object)
                    .map_err(|e| Self::diagnostic(Operation::Read, &state.config, &e))?;
                let id = K::local_id(&object).or_else(|| state.id.clone());
                tracing::debug!("Refreshed {} {}", K::TYPE_NAME, identity);
                Ok(ResourceState::new(id, config))
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "{} {} no longer exists, removing it from state",
                    K::TYPE_NAME,
                    identity
                );
                Ok(ResourceState::new(None, state.config.clone()))
            }
            Err(e) => Err(Self::diagnostic(Operation::Read, &state.config, &e)),
        }
    }

    /// Apply in-place changes; nothing is sent when no mutable attribute changed
    pub async fn update(
        &self,
        prior: &ResourceState<K::Config>,
        planned: &K::Config,
    ) -> std::result::Result<ResourceState<K::Config>, Diagnostic> {
        if !K::mutable_changed(&prior.config, planned) {
            tracing::debug!(
                "No in-place changes for {} {}",
                K::TYPE_NAME,
                K::identity(planned)
            );
            return Ok(prior.clone());
        }

        self.try_update(prior, planned)
            .await
            .map_err(|e| Self::diagnostic(Operation::Update, planned, &e))
    }

    async fn try_update(
        &self,
        prior: &ResourceState<K::Config>,
        planned: &K::Config,
    ) -> Result<ResourceState<K::Config>> {
        let resources = self.client.resources::<K::Object>();
        let identity = K::identity(planned);

        let recorded = K::resource_version(&prior.config).or_else(|| K::resource_version(planned));
        let version = match recorded {
            Some(version) => version,
            None => {
                tracing::debug!("No resource version in state, fetching {}", identity);
                resources
                    .get(&identity)
                    .await?
                    .meta()
                    .resource_version
                    .clone()
                    .ok_or_else(|| {
                        TmcError::decode(format!("{} carries no resource version", identity))
                    })?
            }
        };

        let mut object = K::to_object(planned)?;
        object.meta_mut().resource_version = Some(version);

        let updated = resources.update(&object).await?;

        let mut config = planned.clone();
        K::apply_object(&mut config, &updated)?;
        K::mark_updated(&mut config, chrono::Utc::now().to_rfc3339());

        tracing::info!("Updated {} {}", K::TYPE_NAME, identity);
        let id = K::local_id(&updated).or_else(|| prior.id.clone());
        Ok(ResourceState::new(id, config))
    }

    /// Created -> Deleted; deleting an absent object succeeds
    pub async fn delete(
        &self,
        state: &ResourceState<K::Config>,
    ) -> std::result::Result<ResourceState<K::Config>, Diagnostic> {
        let identity = K::identity(&state.config);

        match self.client.resources::<K::Object>().delete(&identity).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", K::TYPE_NAME, identity);
                Ok(ResourceState::new(None, state.config.clone()))
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("{} {} was already deleted", K::TYPE_NAME, identity);
                Ok(ResourceState::new(None, state.config.clone()))
            }
            Err(e) => Err(Self::diagnostic(Operation::Delete, &state.config, &e)),
        }
    }

    /// Look an existing object up by identity; absence is an error
    pub async fn lookup(
        &self,
        query: &K::Config,
    ) -> std::result::Result<ResourceState<K::Config>, Diagnostic> {
        let identity = K::identity(query);
        let result = async {
            let object = self.client.resources::<K::Object>().get(&identity).await?;
            let mut config = query.clone();
            K::apply_object(&mut config, &object)?;
            Ok::<_, TmcError>(ResourceState::new(K::local_id(&object), config))
        }
        .await;

        result.map_err(|e| Self::diagnostic(Operation::Read, query, &e))
    }
}
