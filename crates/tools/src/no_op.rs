//! The `no_op` sentinel — always succeeds with an empty payload.
//!
//! Selected when the policy decides no further evidence is needed but
//! the loop still records a thought for the iteration.

use async_trait::async_trait;
use marketscout_core::error::ToolError;
use marketscout_core::observation::Payload;
use marketscout_core::tool::{NO_OP, Tool};

pub struct NoOpTool;

#[async_trait]
impl Tool for NoOpTool {
    fn name(&self) -> &str {
        NO_OP
    }

    fn description(&self) -> &str {
        "Does nothing. Used when no further evidence is needed."
    }

    async fn invoke(
        &self,
        _arguments: serde_json::Value,
    ) -> std::result::Result<Payload, ToolError> {
        Ok(Payload::Empty)
    }
}
