//! Ocean: container-driven infrastructure autoscaling

pub mod aws;
pub mod right_sizing;

pub use aws::AwsHandler;
pub use right_sizing::RightSizingHandler;

use crate::client::Client;

/// Ocean sub-services sharing one client
#[derive(Debug, Clone)]
pub struct OceanHandler {
    pub aws: AwsHandler,
    pub right_sizing: RightSizingHandler,
}

impl OceanHandler {
    pub fn new(client: Client) -> Self {
        Self {
            aws: AwsHandler::new(client.clone()),
            right_sizing: RightSizingHandler::new(client),
        }
    }
}
