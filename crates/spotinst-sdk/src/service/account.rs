//! Account setup: accounts, AWS credentials and external IDs

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Client, Request};
use crate::context::Context;
use crate::error::Result;
use crate::service::required;

/// A Spotinst account within an organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Cloud provider account this Spotinst account is connected to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_external_id: Option<String>,
}

/// Input for [`AccountHandler::create_account`]
#[derive(Debug, Clone, Default)]
pub struct CreateAccountInput {
    /// Required
    pub name: Option<String>,
}

/// Input for [`AccountHandler::set_aws_credentials`]
#[derive(Debug, Clone, Default)]
pub struct SetAwsCredentialsInput {
    /// Required; the account the role is attached to
    pub account_id: Option<String>,
    /// Required; ARN of the IAM role Spotinst assumes
    pub iam_role: Option<String>,
}

/// AWS credentials attached to an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_role: Option<String>,
}

/// External ID to put in the trust policy of the IAM role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsAccountExternalId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Handler for `/setup/account` and `/setup/credentials/aws`
#[derive(Debug, Clone)]
pub struct AccountHandler {
    client: Client,
}

impl AccountHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List all accounts of the organization
    pub async fn list_accounts(&self, ctx: &Context) -> Result<Vec<Account>> {
        let request = Request::get("/setup/account");
        self.client.execute(ctx, request).await?.decode_items()
    }

    /// Create an account; returns the created account
    pub async fn create_account(
        &self,
        ctx: &Context,
        input: &CreateAccountInput,
    ) -> Result<Option<Account>> {
        let name = required("name", input.name.as_deref())?;
        let request = Request::post("/setup/account").json(&json!({
            "account": { "name": name }
        }))?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn read_account(&self, ctx: &Context, account_id: &str) -> Result<Option<Account>> {
        let account_id = required("accountId", Some(account_id))?;
        let request = Request::get("/setup/account/{accountId}").path_param("accountId", account_id);
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn delete_account(&self, ctx: &Context, account_id: &str) -> Result<()> {
        let account_id = required("accountId", Some(account_id))?;
        let request =
            Request::delete("/setup/account/{accountId}").path_param("accountId", account_id);
        self.client.execute(ctx, request).await?;
        Ok(())
    }

    /// Attach an IAM role to an account
    pub async fn set_aws_credentials(
        &self,
        ctx: &Context,
        input: &SetAwsCredentialsInput,
    ) -> Result<Option<AwsCredentials>> {
        let account_id = required("accountId", input.account_id.as_deref())?;
        let iam_role = required("iamRole", input.iam_role.as_deref())?;
        let request = Request::post("/setup/credentials/aws")
            .query("accountId", account_id)
            .json(&json!({
                "credentials": { "iamRole": iam_role }
            }))?;
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn read_aws_credentials(
        &self,
        ctx: &Context,
        account_id: &str,
    ) -> Result<Option<AwsCredentials>> {
        let account_id = required("accountId", Some(account_id))?;
        let request = Request::get("/setup/credentials/aws").query("accountId", account_id);
        self.client.execute(ctx, request).await?.first_item()
    }

    /// Generate the external ID for the account's IAM role trust policy
    pub async fn create_aws_account_external_id(
        &self,
        ctx: &Context,
        account_id: &str,
    ) -> Result<Option<AwsAccountExternalId>> {
        let account_id = required("accountId", Some(account_id))?;
        let request =
            Request::post("/setup/credentials/aws/externalId").query("accountId", account_id);
        self.client.execute(ctx, request).await?.first_item()
    }

    pub async fn read_aws_account_external_id(
        &self,
        ctx: &Context,
        account_id: &str,
    ) -> Result<Option<AwsAccountExternalId>> {
        let account_id = required("accountId", Some(account_id))?;
        let request =
            Request::get("/setup/credentials/aws/externalId").query("accountId", account_id);
        self.client.execute(ctx, request).await?.first_item()
    }
}
