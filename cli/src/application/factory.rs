//! Typed app factories: a handle bound to one compiled application definition.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use anyhow::{Context, Result};
use deploy_common::{AppSpec, Arc56Error, OnSchemaBreak, OnUpdate, TemplateValue};
use serde::Serialize;

use crate::application::ports::AlgorandNetwork;
use crate::application::services::app_deploy::{
    AppDeployResult, DEFAULT_APP_VERSION, DeployRequest, deploy_app,
};
use crate::domain::{Address, DeployControls};

/// A compiled on-chain application known at build time.
pub trait AppDefinition {
    /// Name recorded in deploy metadata and used to find earlier deployments.
    const NAME: &'static str;

    /// Parse the embedded ARC-56 specification.
    fn app_spec() -> Result<AppSpec, Arc56Error>;
}

/// Options for [`AppFactory::deploy`].
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub on_update: OnUpdate,
    pub on_schema_break: OnSchemaBreak,
    /// Defaults to [`DEFAULT_APP_VERSION`].
    pub version: Option<String>,
    pub updatable: Option<bool>,
    pub deletable: Option<bool>,
    pub template_params: BTreeMap<String, TemplateValue>,
}

/// Handle to a deployed instance of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppClient {
    pub app_id: u64,
    pub app_address: Address,
    pub app_name: String,
}

/// Factory for one application definition, sending from `default_sender`.
pub struct AppFactory<'n, D, N> {
    network: &'n N,
    default_sender: Address,
    spec: AppSpec,
    _definition: PhantomData<D>,
}

impl<'n, D: AppDefinition, N: AlgorandNetwork> AppFactory<'n, D, N> {
    /// Bind `D` to a network client.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded app spec does not parse.
    pub fn new(network: &'n N, default_sender: Address) -> Result<Self> {
        let spec = D::app_spec().with_context(|| format!("loading {} app spec", D::NAME))?;
        Ok(Self {
            network,
            default_sender,
            spec,
            _definition: PhantomData,
        })
    }

    /// Idempotently deploy the app, returning a client for the live instance.
    ///
    /// # Errors
    ///
    /// Propagates any compile, lookup, policy or transaction error unchanged.
    pub async fn deploy(&self, options: DeployOptions) -> Result<(AppClient, AppDeployResult)> {
        let request = DeployRequest {
            spec: &self.spec,
            creator: self.default_sender,
            version: options
                .version
                .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
            on_update: options.on_update,
            on_schema_break: options.on_schema_break,
            controls: DeployControls {
                updatable: options.updatable,
                deletable: options.deletable,
            },
            template_params: options.template_params,
        };
        let result = deploy_app(self.network, self.network, self.network, request).await?;
        let client = AppClient {
            app_id: result.app.app_id,
            app_address: result.app.app_address,
            app_name: result.app.name.clone(),
        };
        Ok((client, result))
    }
}

/// `network.get_typed_app_factory::<Bank>(sender)` on any network client.
pub trait TypedAppFactories: AlgorandNetwork + Sized {
    /// Create a factory for `D` that sends from `default_sender`.
    ///
    /// # Errors
    ///
    /// Returns an error if `D`'s embedded app spec does not parse.
    fn get_typed_app_factory<D: AppDefinition>(
        &self,
        default_sender: Address,
    ) -> Result<AppFactory<'_, D, Self>> {
        AppFactory::new(self, default_sender)
    }
}

impl<T: AlgorandNetwork> TypedAppFactories for T {}
