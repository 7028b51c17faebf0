//! Reference carrier agent. Prices `QUOTE` tasks from a linear tariff and
//! issues labels for `SHIP` tasks.

use std::time::Duration;

use a2a_agent::{AgentService, RequestContext};
use a2a_contract::{AgentMeta, CreateTask, ErrorPayload, TaskOutcome, task_types};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Tariff and identity of one carrier.
#[derive(Debug, Clone)]
pub struct CarrierConfig {
    pub name: String,
    /// Service level reported in quotes, e.g. `EXPRESS`.
    pub service: String,
    pub base_price: u64,
    pub per_kg: u64,
    /// Added when the request sets `options.priority`.
    pub priority_surcharge: u64,
    pub currency: String,
    pub eta_days: u32,
    /// Artificial delay before every answer.
    pub latency: Duration,
    pub tracking_prefix: String,
    pub label_base_url: String,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            name: "AgentA".to_string(),
            service: "EXPRESS".to_string(),
            base_price: 7000,
            per_kg: 1500,
            priority_surcharge: 3000,
            currency: "KRW".to_string(),
            eta_days: 2,
            latency: Duration::ZERO,
            tracking_prefix: "A".to_string(),
            label_base_url: "https://cdn.local/labels".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub carrier: String,
    pub service: String,
    pub price: u64,
    pub currency: String,
    pub eta_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub status: &'static str,
    pub tracking_id: String,
    pub label_url: String,
}

pub struct CarrierService {
    meta: AgentMeta,
    config: CarrierConfig,
}

impl CarrierService {
    pub fn new(agent_id: impl Into<String>, config: CarrierConfig) -> Self {
        let meta = AgentMeta::new(agent_id, &config.name, env!("CARGO_PKG_VERSION"))
            .with_capability(task_types::QUOTE, "QuoteRequest", "QuoteResult")
            .with_capability(task_types::SHIP, "ShipRequest", "ShipResult");
        Self { meta, config }
    }

    /// `base + per_kg * weight`, plus the surcharge for priority requests.
    pub fn quote(&self, input: &Value) -> Result<Quote, ErrorPayload> {
        let weight_kg = input
            .pointer("/parcel/weight_kg")
            .and_then(Value::as_f64)
            .filter(|w| w.is_finite() && *w > 0.0)
            .ok_or_else(|| ErrorPayload::validation("parcel.weight_kg must be a positive number"))?;
        let priority = input
            .pointer("/options/priority")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut price = self.config.base_price as f64 + self.config.per_kg as f64 * weight_kg;
        if priority {
            price += self.config.priority_surcharge as f64;
        }
        Ok(Quote {
            carrier: self.config.name.clone(),
            service: self.config.service.clone(),
            price: price.round() as u64,
            currency: self.config.currency.clone(),
            eta_days: self.config.eta_days,
        })
    }

    pub fn ship(&self) -> Shipment {
        let tracking_id = format!("{}-{}", self.config.tracking_prefix, ulid::Ulid::new());
        Shipment {
            status: "READY",
            label_url: format!(
                "{}/{tracking_id}.png",
                self.config.label_base_url.trim_end_matches('/')
            ),
            tracking_id,
        }
    }
}

#[async_trait]
impl AgentService for CarrierService {
    fn meta(&self) -> &AgentMeta {
        &self.meta
    }

    async fn execute(
        &self,
        ctx: RequestContext,
        request: CreateTask,
    ) -> Result<TaskOutcome, ErrorPayload> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let result = match request.task_type.as_str() {
            task_types::QUOTE => serde_json::to_value(self.quote(&request.input)?),
            task_types::SHIP => serde_json::to_value(self.ship()),
            other => {
                return Err(ErrorPayload::validation(format!(
                    "unsupported task_type: {other}"
                )));
            }
        }
        .map_err(|e| ErrorPayload::internal(format!("encode result: {e}")))?;

        tracing::info!(
            trace_id = %ctx.trace_id,
            task_type = %request.task_type,
            carrier = %self.config.name,
            "task served"
        );
        Ok(TaskOutcome::succeeded(result))
    }
}
