use serde::Deserialize;

/// Generic reply of the json api, either a confirmation or an error
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeReply {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_fields_are_optional() {
        let reply: ServerReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply, ServerReply::default());

        let reply: ServerReply =
            serde_json::from_str(r#"{"error": "The post must have content"}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("The post must have content"));
        assert_eq!(reply.message, None);
    }
}
