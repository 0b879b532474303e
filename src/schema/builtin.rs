//! The schema shipped with the service.

use crate::sanitize::builtins;
use crate::schema::node::{ObjectNode, SchemaNode};

/// Base schema: a `general` and an `advanced` section.
pub fn plugin_schema() -> ObjectNode {
    ObjectNode::new()
        .property(
            "general",
            ObjectNode::new()
                .property(
                    "site_name",
                    SchemaNode::string("").description("The name of the site."),
                )
                .property(
                    "email_id",
                    SchemaNode::string("")
                        .description("Email ID of the site.")
                        .sanitizer(builtins::email()),
                )
                .property(
                    "enable_feature",
                    SchemaNode::boolean(false).description("Enable or disable the feature."),
                ),
        )
        .property(
            "advanced",
            ObjectNode::new()
                .property(
                    "api_key",
                    SchemaNode::string("").description("API key used for authentication."),
                )
                .property(
                    "cache_duration",
                    SchemaNode::integer(60).description("Cache duration in minutes."),
                ),
        )
}
