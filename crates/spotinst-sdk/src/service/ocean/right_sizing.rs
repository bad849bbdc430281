//! Ocean right-sizing rules
//!
//! A rule controls when and how workload resource recommendations are
//! applied. Rules belong to one Ocean cluster and are attached to namespaces
//! or individual workloads.

use serde::{Deserialize, Serialize};

use crate::client::{Client, Request};
use crate::context::Context;
use crate::error::{Result, ValidationError};
use crate::field::Nullable;
use crate::service::required;

const RULES_PATH: &str = "/ocean/{oceanId}/rightSizing/rule";
const RULE_PATH: &str = "/ocean/{oceanId}/rightSizing/rule/{ruleName}";
const ATTACHMENT_PATH: &str = "/ocean/{oceanId}/rightSizing/rule/{ruleName}/attachment";
const DETACHMENT_PATH: &str = "/ocean/{oceanId}/rightSizing/rule/{ruleName}/detachment";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightSizingRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    /// Read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocean_id: Option<String>,
    /// `MORE_THAN_ONE_REPLICA`, `ALL_MANIFEST` or `NO_RESTART`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_replicas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_preliminary_recommendations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_application_intervals: Option<Vec<ApplicationInterval>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub recommendation_application_min_threshold: Nullable<MinThreshold>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub recommendation_application_boundaries: Nullable<Boundaries>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub recommendation_application_overhead_values: Nullable<OverheadValues>,
}

/// Window in which recommendations may be applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInterval {
    /// `DAY`, `WEEK` or `MONTH`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_basis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_repetition_basis: Option<WeeklyRepetition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRepetition {
    /// Upper-case day names, e.g. `MONDAY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_hours: Option<HourRange>,
}

/// `HH:MM` range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Minimum change, in percent, before a recommendation is applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Bounds>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_percentage: Option<f64>,
}

/// Namespace, and optionally specific workloads in it, a rule applies to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub namespace_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workloads: Option<Vec<Workload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<WorkloadLabel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    /// `Deployment`, `StatefulSet`, `DaemonSet`, ...
    pub workload_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadLabel {
    pub key: String,
    pub value: String,
}

/// Input for [`RightSizingHandler::attach_rule`] and
/// [`RightSizingHandler::detach_rule`]
#[derive(Debug, Clone, Default)]
pub struct RuleAttachmentInput {
    /// Required
    pub ocean_id: Option<String>,
    /// Required
    pub rule_name: Option<String>,
    pub namespaces: Vec<Namespace>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleBody<'a> {
    right_sizing_rule: &'a RightSizingRule,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRulesBody<'a> {
    rule_names: &'a [String],
}

#[derive(Serialize)]
struct NamespacesBody<'a> {
    namespaces: &'a [Namespace],
}

/// Handler for `/ocean/{oceanId}/rightSizing/rule`
#[derive(Debug, Clone)]
pub struct RightSizingHandler {
    client: Client,
}

impl RightSizingHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_rules(&self, ctx: &Context, ocean_id: &str) -> Result<Vec<RightSizingRule>> {
        let ocean_id = required("oceanId", Some(ocean_id))?;
        let request = Request::get(RULES_PATH).path_param("oceanId", ocean_id);
        self.client.execute(ctx, request).await?.decode_items()
    }

    /// Create a rule; `rule.rule_name` is required
    pub async fn create_rule(
        &self,
        ctx: &Context,
        ocean_id: &str,
        rule: &RightSizingRule,
    ) -> Result<Option<RightSizingRule>> {
        let ocean_id = required("oceanId", Some(ocean_id))?;
        required("ruleName", rule.rule_name.as_deref())?;
        let request = Request::post(RULES_PATH)
            .path_param("oceanId", ocean_id)
            .json(&RuleBody {
                right_sizing_rule: rule,
            })?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn read_rule(
        &self,
        ctx: &Context,
        ocean_id: &str,
        rule_name: &str,
    ) -> Result<Option<RightSizingRule>> {
        let ocean_id = required("oceanId", Some(ocean_id))?;
        let rule_name = required("ruleName", Some(rule_name))?;
        let request = Request::get(RULE_PATH)
            .path_param("oceanId", ocean_id)
            .path_param("ruleName", rule_name);
        self.client.execute(ctx, request).await?.first_item()
    }

    /// Update the rule named by `rule.rule_name`
    ///
    /// The name goes in the path; the body carries the fields to change.
    pub async fn update_rule(
        &self,
        ctx: &Context,
        ocean_id: &str,
        rule: &RightSizingRule,
    ) -> Result<Option<RightSizingRule>> {
        let ocean_id = required("oceanId", Some(ocean_id))?;
        let rule_name = required("ruleName", rule.rule_name.as_deref())?;
        let body = RightSizingRule {
            rule_name: None,
            ocean_id: None,
            ..rule.clone()
        };
        let request = Request::put(RULE_PATH)
            .path_param("oceanId", ocean_id)
            .path_param("ruleName", rule_name)
            .json(&RuleBody {
                right_sizing_rule: &body,
            })?;
        self.client.execute(ctx, request).await?.first_item()
    }

    /// Delete several rules of one cluster at once
    pub async fn delete_rules(
        &self,
        ctx: &Context,
        ocean_id: &str,
        rule_names: &[String],
    ) -> Result<()> {
        let ocean_id = required("oceanId", Some(ocean_id))?;
        if rule_names.is_empty() || rule_names.iter().any(String::is_empty) {
            return Err(ValidationError::new(
                "ruleNames",
                "at least one non-empty rule name is required",
            )
            .into());
        }
        let request = Request::delete(RULES_PATH)
            .path_param("oceanId", ocean_id)
            .json(&DeleteRulesBody { rule_names })?;
        self.client.execute(ctx, request).await?;
        Ok(())
    }

    /// Apply a rule to the given namespaces or workloads
    pub async fn attach_rule(&self, ctx: &Context, input: &RuleAttachmentInput) -> Result<()> {
        self.change_attachment(ctx, ATTACHMENT_PATH, input).await
    }

    /// Stop applying a rule to the given namespaces or workloads
    pub async fn detach_rule(&self, ctx: &Context, input: &RuleAttachmentInput) -> Result<()> {
        self.change_attachment(ctx, DETACHMENT_PATH, input).await
    }

    async fn change_attachment(
        &self,
        ctx: &Context,
        template: &str,
        input: &RuleAttachmentInput,
    ) -> Result<()> {
        let ocean_id = required("oceanId", input.ocean_id.as_deref())?;
        let rule_name = required("ruleName", input.rule_name.as_deref())?;
        let request = Request::post(template)
            .path_param("oceanId", ocean_id)
            .path_param("ruleName", rule_name)
            .json(&NamespacesBody {
                namespaces: &input.namespaces,
            })?;
        self.client.execute(ctx, request).await?;
        Ok(())
    }
}
