//! Eureka REST client
//!
//! Talks the Netflix Eureka v2 instance protocol: `POST /apps/{app}` to
//! register, `PUT /apps/{app}/{instance}` to renew the lease and
//! `DELETE /apps/{app}/{instance}` to deregister. A 404 on renewal means the
//! registry evicted the instance, in which case the client re-registers.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use pixa_core::Config;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const DEREGISTER_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for one registered service instance.
///
/// `start` registers and begins heartbeating; `stop` halts the heartbeat and
/// deregisters with a bounded timeout.
#[derive(Clone)]
pub struct EurekaClient {
    http_client: Client,
    server_url: String,
    app_name: String,
    instance_id: String,
    instance_host: String,
    server_port: u16,
    heartbeat_interval: Duration,
    heartbeat_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl EurekaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for service registry")?;

        let instance_id = format!(
            "{}:{}:{}",
            config.instance_host, config.app_name, config.server_port
        );

        Ok(Self {
            http_client,
            server_url: config.eureka_server.trim_end_matches('/').to_string(),
            app_name: config.app_name.clone(),
            instance_id,
            instance_host: config.instance_host.clone(),
            server_port: config.server_port,
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs),
            heartbeat_task: Arc::new(Mutex::new(None)),
        })
    }

    /// Register with the registry and begin renewing the lease.
    ///
    /// Returns an error if registration is not acknowledged so startup can
    /// fail fast. The heartbeat loop only starts after a successful
    /// registration.
    pub async fn start(&self) -> Result<()> {
        self.register().await?;

        let client = self.clone();
        let handle = tokio::spawn(async move {
            client.heartbeat_loop().await;
        });
        *self.heartbeat_task.lock().await = Some(handle);

        Ok(())
    }

    /// Stop heartbeating and deregister this instance.
    ///
    /// Shutdown is best-effort: failures are logged, never propagated, and
    /// the deregistration call is bounded so shutdown cannot hang on an
    /// unreachable registry.
    pub async fn stop(&self) {
        if let Some(handle) = self.heartbeat_task.lock().await.take() {
            handle.abort();
        }

        match tokio::time::timeout(DEREGISTER_TIMEOUT, self.deregister()).await {
            Ok(Ok(())) => tracing::info!(
                app = %self.app_name,
                instance_id = %self.instance_id,
                "Deregistered from service registry"
            ),
            Ok(Err(e)) => tracing::warn!(
                error = %e,
                "Failed to deregister from service registry"
            ),
            Err(_) => tracing::warn!("Deregistration from service registry timed out"),
        }
    }

    async fn register(&self) -> Result<()> {
        let url = format!("{}/apps/{}", self.server_url, self.app_name);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&self.instance_document())
            .send()
            .await
            .context("Failed to send registration request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Service registry returned status {} on registration", status);
        }

        tracing::info!(
            app = %self.app_name,
            instance_id = %self.instance_id,
            registry = %self.server_url,
            "Registered with service registry"
        );

        Ok(())
    }

    async fn deregister(&self) -> Result<()> {
        let url = format!(
            "{}/apps/{}/{}",
            self.server_url, self.app_name, self.instance_id
        );

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .context("Failed to send deregistration request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "Service registry returned status {} on deregistration",
                status
            );
        }

        Ok(())
    }

    /// Renew the lease once. `Ok(false)` means the registry no longer knows
    /// this instance and a fresh registration is needed.
    async fn send_heartbeat(&self) -> Result<bool> {
        let url = format!(
            "{}/apps/{}/{}",
            self.server_url, self.app_name, self.instance_id
        );

        let response = self
            .http_client
            .put(&url)
            .send()
            .await
            .context("Failed to send heartbeat request")?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(anyhow::anyhow!(
                "Service registry returned status {} on heartbeat",
                status
            )),
        }
    }

    async fn heartbeat_loop(&self) {
        let mut ticker = tokio::time::interval(self.heartbeat_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval fires immediately; the instance just registered
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match self.send_heartbeat().await {
                Ok(true) => {
                    tracing::debug!(instance_id = %self.instance_id, "Service registry lease renewed");
                }
                Ok(false) => {
                    tracing::warn!(
                        instance_id = %self.instance_id,
                        "Instance unknown to service registry, re-registering"
                    );
                    if let Err(e) = self.register().await {
                        tracing::warn!(error = %e, "Re-registration with service registry failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Service registry heartbeat failed");
                }
            }
        }
    }

    /// Instance document sent on registration.
    fn instance_document(&self) -> serde_json::Value {
        let base_url = format!("http://{}:{}", self.instance_host, self.server_port);
        let renewal_interval = self.heartbeat_interval.as_secs();

        serde_json::json!({
            "instance": {
                "instanceId": self.instance_id,
                "hostName": self.instance_host,
                "app": self.app_name,
                "ipAddr": self.instance_host,
                "status": "UP",
                "port": {"$": self.server_port, "@enabled": "true"},
                "securePort": {"$": 443, "@enabled": "false"},
                "homePageUrl": format!("{}/", base_url),
                "statusPageUrl": format!("{}/health", base_url),
                "healthCheckUrl": format!("{}/health", base_url),
                "vipAddress": self.app_name,
                "secureVipAddress": self.app_name,
                "dataCenterInfo": {
                    "@class": "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo",
                    "name": "MyOwn"
                },
                "leaseInfo": {
                    "renewalIntervalInSecs": renewal_interval,
                    "durationInSecs": renewal_interval * 3
                }
            }
        })
    }
}
