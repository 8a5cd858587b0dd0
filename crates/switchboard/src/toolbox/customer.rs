use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::{required_str, ToolHandler};
use crate::errors::ToolResult;
use crate::models::tool::Tool;

/// Looks up a customer record by phone number. Returns a canned record;
/// a real deployment would back this with a CRM call.
pub struct CustomerLookup;

#[async_trait]
impl ToolHandler for CustomerLookup {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_customer_information",
            "Get the customer information based on their phone number",
            json!({
                "type": "object",
                "properties": {
                    "phonenumber": {
                        "type": "string",
                        "description": "Customer phone number"
                    }
                },
                "required": ["phonenumber"]
            }),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let phonenumber = required_str(&arguments, "phonenumber")?;
        let customer_info = json!({
            "name": "John Doe",
            "address": "123 Main St",
            "account_number": "000099998888",
            "phone_number": phonenumber,
        });
        Ok(Value::String(customer_info.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolError;

    #[tokio::test]
    async fn test_returns_record_as_json_string() {
        let result = CustomerLookup
            .call(json!({"phonenumber": "123-456-7890"}))
            .await
            .unwrap();

        let Value::String(text) = result else {
            panic!("expected a string result");
        };
        let record: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(record["phone_number"], "123-456-7890");
        assert_eq!(record["name"], "John Doe");
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let result = CustomerLookup.call(json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidParameters(_))));
    }
}
