use std::collections::BTreeMap;

use aws_config::BehaviorVersion;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use aws_sdk_ssm::Client;
use log::debug;
use tokio::runtime::{Builder, Runtime};

use super::{ParameterStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct SsmOptions {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// AWS Systems Manager Parameter Store. SecureString parameters are always
/// decrypted.
pub struct SsmStore {
    client: Client,
    runtime: Runtime,
}

impl SsmStore {
    /// Loads the shared AWS configuration (credentials, region) from the
    /// environment, overridden by `opts`.
    pub fn new(opts: &SsmOptions) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &opts.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &opts.endpoint_url {
            debug!("Using SSM endpoint {}", endpoint_url);
            loader = loader.endpoint_url(endpoint_url);
        }

        let config = runtime.block_on(loader.load());
        Ok(Self {
            client: Client::new(&config),
            runtime,
        })
    }
}

impl ParameterStore for SsmStore {
    fn get_parameter(&self, name: &str) -> Result<Option<String>, StoreError> {
        let res = self.runtime.block_on(
            self.client
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send(),
        );

        match res {
            Ok(output) => Ok(output.parameter.and_then(|p| p.value)),
            Err(err)
                if err
                    .as_service_error()
                    .map_or(false, GetParameterError::is_parameter_not_found) =>
            {
                Ok(None)
            }
            Err(err) => Err(StoreError::Request {
                key: name.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            }),
        }
    }

    fn get_parameters_by_path(
        &self,
        path: &str,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        self.runtime.block_on(async {
            let mut pages = self
                .client
                .get_parameters_by_path()
                .path(path)
                .recursive(true)
                .with_decryption(true)
                .into_paginator()
                .send();

            let mut vars = BTreeMap::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|err| StoreError::Request {
                    key: path.to_string(),
                    message: DisplayErrorContext(&err).to_string(),
                })?;

                for param in page.parameters() {
                    if let (Some(name), Some(value)) = (param.name(), param.value()) {
                        vars.insert(name.to_string(), value.to_string());
                    }
                }
            }

            Ok::<_, StoreError>(vars)
        })
    }
}
