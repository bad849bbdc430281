//! Ocean for AWS Kubernetes: clusters and launch specs
//!
//! Resource fields are optional throughout so the same types serve as create
//! payloads, partial updates and read results. Fields that an update must be
//! able to clear use [`Nullable`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Request};
use crate::context::Context;
use crate::error::Result;
use crate::field::Nullable;
use crate::service::required;

const CLUSTER_PATH: &str = "/ocean/aws/k8s/cluster";
const CLUSTER_ID_PATH: &str = "/ocean/aws/k8s/cluster/{clusterId}";
const LAUNCH_SPEC_PATH: &str = "/ocean/aws/k8s/launchSpec";
const LAUNCH_SPEC_ID_PATH: &str = "/ocean/aws/k8s/launchSpec/{launchSpecId}";

/// An Ocean cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifier the Ocean controller reports with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_cluster_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Capacity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<Compute>,
    /// Read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_percentage: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_to_od: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilize_reserved_instances: Option<bool>,
    /// Seconds to wait for pods to drain before terminating a node
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub draining_timeout: Nullable<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_types: Option<InstanceTypes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_specification: Option<LaunchSpecification>,
}

/// Instance type filter; at most one list is set at a time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceTypes {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub whitelist: Nullable<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub blacklist: Nullable<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub iam_instance_profile: Nullable<IamInstanceProfile>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub key_pair: Nullable<String>,
    /// Base64-encoded
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub user_data: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamInstanceProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_key: String,
    pub tag_value: String,
}

/// Node group template within an Ocean cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocean_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub user_data: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub iam_instance_profile: Nullable<IamInstanceProfile>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub instance_types: Nullable<Vec<String>>,
    /// GiB
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub root_volume_size: Nullable<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taints: Option<Vec<Taint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Kubernetes node label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

/// Kubernetes node taint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `NoSchedule`, `PreferNoSchedule` or `NoExecute`
    pub effect: String,
}

/// Input for [`AwsHandler::delete_launch_spec`]
#[derive(Debug, Clone, Default)]
pub struct DeleteLaunchSpecInput {
    /// Required
    pub launch_spec_id: Option<String>,
    /// Also terminate the nodes launched from this spec
    pub delete_nodes: Option<bool>,
    /// Delete even if it is the cluster's last launch spec
    pub force_delete: Option<bool>,
}

#[derive(Serialize)]
struct ClusterBody<'a> {
    cluster: &'a Cluster,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchSpecBody<'a> {
    launch_spec: &'a LaunchSpec,
}

/// Handler for Ocean AWS clusters and launch specs
#[derive(Debug, Clone)]
pub struct AwsHandler {
    client: Client,
}

impl AwsHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_clusters(&self, ctx: &Context) -> Result<Vec<Cluster>> {
        let request = Request::get(CLUSTER_PATH);
        self.client.execute(ctx, request).await?.decode_items()
    }

    pub async fn create_cluster(&self, ctx: &Context, cluster: &Cluster) -> Result<Option<Cluster>> {
        let request = Request::post(CLUSTER_PATH).json(&ClusterBody { cluster })?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn read_cluster(&self, ctx: &Context, cluster_id: &str) -> Result<Option<Cluster>> {
        let cluster_id = required("clusterId", Some(cluster_id))?;
        let request = Request::get(CLUSTER_ID_PATH).path_param("clusterId", cluster_id);
        self.client.execute(ctx, request).await?.first_item()
    }

    /// Update the cluster identified by `cluster.id`
    ///
    /// Only fields that are set are sent. The ID goes in the path, not the
    /// body.
    pub async fn update_cluster(&self, ctx: &Context, cluster: &Cluster) -> Result<Option<Cluster>> {
        let cluster_id = required("clusterId", cluster.id.as_deref())?;
        let body = Cluster {
            id: None,
            ..cluster.clone()
        };
        let request = Request::put(CLUSTER_ID_PATH)
            .path_param("clusterId", cluster_id)
            .json(&ClusterBody { cluster: &body })?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn delete_cluster(&self, ctx: &Context, cluster_id: &str) -> Result<()> {
        let cluster_id = required("clusterId", Some(cluster_id))?;
        let request = Request::delete(CLUSTER_ID_PATH).path_param("clusterId", cluster_id);
        self.client.execute(ctx, request).await?;
        Ok(())
    }

    /// List launch specs, optionally only those of one cluster
    pub async fn list_launch_specs(
        &self,
        ctx: &Context,
        ocean_id: Option<&str>,
    ) -> Result<Vec<LaunchSpec>> {
        let request = Request::get(LAUNCH_SPEC_PATH).query_opt("oceanId", ocean_id);
        self.client.execute(ctx, request).await?.decode_items()
    }

    /// Create a launch spec; `spec.ocean_id` is required
    pub async fn create_launch_spec(
        &self,
        ctx: &Context,
        spec: &LaunchSpec,
    ) -> Result<Option<LaunchSpec>> {
        required("oceanId", spec.ocean_id.as_deref())?;
        let request = Request::post(LAUNCH_SPEC_PATH).json(&LaunchSpecBody { launch_spec: spec })?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn read_launch_spec(
        &self,
        ctx: &Context,
        launch_spec_id: &str,
    ) -> Result<Option<LaunchSpec>> {
        let launch_spec_id = required("launchSpecId", Some(launch_spec_id))?;
        let request = Request::get(LAUNCH_SPEC_ID_PATH).path_param("launchSpecId", launch_spec_id);
        self.client.execute(ctx, request).await?.first_item()
    }

    /// Update the launch spec identified by `spec.id`
    pub async fn update_launch_spec(
        &self,
        ctx: &Context,
        spec: &LaunchSpec,
    ) -> Result<Option<LaunchSpec>> {
        let launch_spec_id = required("launchSpecId", spec.id.as_deref())?;
        let body = LaunchSpec {
            id: None,
            ..spec.clone()
        };
        let request = Request::put(LAUNCH_SPEC_ID_PATH)
            .path_param("launchSpecId", launch_spec_id)
            .json(&LaunchSpecBody { launch_spec: &body })?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn delete_launch_spec(
        &self,
        ctx: &Context,
        input: &DeleteLaunchSpecInput,
    ) -> Result<()> {
        let launch_spec_id = required("launchSpecId", input.launch_spec_id.as_deref())?;
        let request = Request::delete(LAUNCH_SPEC_ID_PATH)
            .path_param("launchSpecId", launch_spec_id)
            .query_opt("deleteNodes", input.delete_nodes)
            .query_opt("forceDelete", input.force_delete);
        self.client.execute(ctx, request).await?;
        Ok(())
    }
}
