use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::{required_str, ToolHandler};
use crate::errors::ToolResult;
use crate::models::tool::Tool;

/// Looks up the sales promotions available to an account. Canned data,
/// same shape a billing service would return.
pub struct PromotionsLookup;

#[async_trait]
impl ToolHandler for PromotionsLookup {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_promotions",
            "Get the sales promotions for the customer based on their account number",
            json!({
                "type": "object",
                "properties": {
                    "account_number": {
                        "type": "string",
                        "description": "Customer account number"
                    }
                },
                "required": ["account_number"]
            }),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        required_str(&arguments, "account_number")?;
        let promotions = json!({
            "free_hulu_service": true,
            "discount_for_additional_line": "$10",
            "internet_speed_upgrade": "50 Mbps",
        });
        Ok(Value::String(promotions.to_string()))
    }
}
