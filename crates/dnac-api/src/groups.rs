// Hierarchy-group lookup: resolves a site/area name to the group UUID that
// scopes settings and device assignments.

use serde_json::Value;
use tracing::debug;

use crate::client::DnacClient;
use crate::error::Error;

/// The root of the hierarchy.
pub const GLOBAL_GROUP_ID: &str = "-1";

/// `true` for the names that mean the hierarchy root.
pub fn is_global(name: &str) -> bool {
    name == GLOBAL_GROUP_ID || name.eq_ignore_ascii_case("global")
}

impl DnacClient {
    /// Resolve a group name to its id.
    ///
    /// `-1` and `global` resolve without a request. Otherwise exactly one
    /// group must carry the name.
    pub async fn group_id(&self, name: &str) -> Result<String, Error> {
        if is_global(name) {
            return Ok(GLOBAL_GROUP_ID.to_owned());
        }

        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        let groups = self
            .fetch(&format!("api/v1/group?groupName={encoded}"))
            .await?;

        let ids: Vec<&str> = groups
            .get("response")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|g| g.get("name").and_then(Value::as_str) == Some(name))
            .filter_map(|g| g.get("id").and_then(Value::as_str))
            .collect();

        match ids.as_slice() {
            [id] => {
                debug!(name, id, "resolved group");
                Ok((*id).to_owned())
            }
            _ => Err(Error::GroupNotFound {
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_aliases() {
        assert!(is_global("-1"));
        assert!(is_global("Global"));
        assert!(is_global("GLOBAL"));
        assert!(!is_global("Global/Campus"));
    }
}
