use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::types::{ResourceId, RESOURCES_PATH};

/// The managed entity as returned to callers.
///
/// `href` is derived from `id` on construction and never read back from
/// storage, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    id: ResourceId,
    href: String,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        let href = resource_href(&id);
        Self { id, href }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

/// `<RESOURCES_PATH>/<id>`
pub fn resource_href(id: &ResourceId) -> String {
    format!("{}/{}", RESOURCES_PATH, id)
}

/// Columns of the `resources` table that reach callers. Ownership and
/// timestamps stay in the database.
#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    pub id: String,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Resource::new(ResourceId::new(row.id))
    }
}

/// Request body for create and full update.
///
/// Any JSON object is accepted. Client-supplied `id` and `href` are never
/// trusted: the service assigns or forces the id and derives `href` itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ResourcePayload(Map<String, Value>);

impl ResourcePayload {
    pub fn client_id(&self) -> Option<&Value> {
        self.0.get("id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn href_follows_id() {
        let res = Resource::new(ResourceId::new("abc-123"));
        assert_eq!(res.href(), "/resources/abc-123");
        assert_eq!(res.id().as_str(), "abc-123");
    }

    #[test]
    fn serializes_id_and_href_only() {
        let res = Resource::new(ResourceId::new("r1"));
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({ "id": "r1", "href": "/resources/r1" })
        );
    }

    #[test]
    fn payload_accepts_any_object_and_rejects_non_objects() {
        let p: ResourcePayload = serde_json::from_str(r#"{"id": 7, "name": "x"}"#).unwrap();
        assert_eq!(p.client_id(), Some(&json!(7)));

        let empty: ResourcePayload = serde_json::from_str("{}").unwrap();
        assert!(empty.client_id().is_none());

        assert!(serde_json::from_str::<ResourcePayload>("[]").is_err());
        assert!(serde_json::from_str::<ResourcePayload>("null").is_err());
    }
}
