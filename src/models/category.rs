use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_color_is_optional() {
        let with_color: Category =
            serde_json::from_str(r##"{"id":1,"name":"Food","color":"#374151"}"##).unwrap();
        assert_eq!(with_color.color.as_deref(), Some("#374151"));

        let without: Category = serde_json::from_str(r#"{"id":2,"name":"Other"}"#).unwrap();
        assert_eq!(without.color, None);
    }

    #[test]
    fn test_payload_omits_unset_color() {
        let payload = CategoryPayload {
            name: "Food".to_string(),
            color: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Food"}));
    }
}
