//! Cost and right-sizing insights for Ocean AWS clusters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Request};
use crate::context::Context;
use crate::error::Result;
use crate::service::required;

const AGGREGATED_COSTS_PATH: &str = "/ocean/aws/k8s/cluster/{oceanId}/aggregatedCosts";
const SUGGESTIONS_PATH: &str = "/ocean/aws/k8s/cluster/{oceanId}/rightSizing/suggestion";

/// Input for [`InsightsHandler::aggregated_cluster_costs`]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedCostsInput {
    /// Required; sent in the path
    #[serde(skip)]
    pub ocean_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// e.g. `namespace` or `namespace.label.<key>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<CostFilter>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<serde_json::Value>,
}

/// Cluster cost breakdown over a time range
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedCosts {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: Option<CostSummary>,
    /// Keyed by the `aggregate_by` value; shape varies by aggregation
    #[serde(default)]
    pub aggregations: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    #[serde(default)]
    pub total: Option<f64>,
}

/// Input for [`InsightsHandler::right_sizing_suggestions`]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RightSizingSuggestionsInput {
    /// Required; sent in the path
    #[serde(skip)]
    pub ocean_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<SuggestionFilter>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload_types: Option<Vec<String>>,
}

/// Recommended resources for one workload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightSizingSuggestion {
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    /// millicores
    #[serde(default)]
    pub requested_cpu: Option<f64>,
    #[serde(default)]
    pub suggested_cpu: Option<f64>,
    /// MiB
    #[serde(default)]
    pub requested_memory: Option<f64>,
    #[serde(default)]
    pub suggested_memory: Option<f64>,
    #[serde(default)]
    pub containers: Vec<ContainerSuggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSuggestion {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub requested_cpu: Option<f64>,
    #[serde(default)]
    pub suggested_cpu: Option<f64>,
    #[serde(default)]
    pub requested_memory: Option<f64>,
    #[serde(default)]
    pub suggested_memory: Option<f64>,
}

/// Handler for Ocean AWS cost and right-sizing insights
#[derive(Debug, Clone)]
pub struct InsightsHandler {
    client: Client,
}

impl InsightsHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn aggregated_cluster_costs(
        &self,
        ctx: &Context,
        input: &AggregatedCostsInput,
    ) -> Result<Option<AggregatedCosts>> {
        let ocean_id = required("oceanId", input.ocean_id.as_deref())?;
        let request = Request::post(AGGREGATED_COSTS_PATH)
            .path_param("oceanId", ocean_id)
            .json(input)?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn right_sizing_suggestions(
        &self,
        ctx: &Context,
        input: &RightSizingSuggestionsInput,
    ) -> Result<Vec<RightSizingSuggestion>> {
        let ocean_id = required("oceanId", input.ocean_id.as_deref())?;
        let request = Request::post(SUGGESTIONS_PATH)
            .path_param("oceanId", ocean_id)
            .json(input)?;
        self.client.execute(ctx, request).await?.decode_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_costs_input_omits_ocean_id() {
        let input = AggregatedCostsInput {
            ocean_id: Some("o-1".to_string()),
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single(),
            aggregate_by: Some("namespace".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"startTime": "2024-03-01T00:00:00Z", "aggregateBy": "namespace"})
        );
    }

    #[test]
    fn test_suggestion_decodes_partial_payload() {
        let suggestion: RightSizingSuggestion = serde_json::from_value(json!({
            "resourceName": "api",
            "resourceType": "Deployment",
            "namespace": "payments",
            "suggestedCpu": 250.0,
            "containers": [{"name": "api", "suggestedMemory": 512.0}]
        }))
        .unwrap();
        assert_eq!(suggestion.suggested_cpu, Some(250.0));
        assert!(suggestion.requested_cpu.is_none());
        assert_eq!(suggestion.containers.len(), 1);
        assert_eq!(suggestion.containers[0].suggested_memory, Some(512.0));
    }
}
