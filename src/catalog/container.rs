use serde::{Deserialize, Deserializer};

/// A dataverse, as far as the traversal is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Container {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub alias: String,
    pub name: String,
}

/// The kind of an entry in a dataverse's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ChildKind {
    /// A dataset.
    #[serde(rename = "dataset")]
    Member,

    /// A nested dataverse.
    #[serde(rename = "dataverse")]
    Container,

    /// Any other kind of object; ignored by the traversal.
    #[serde(other)]
    Other,
}

/// One entry of a dataverse's contents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildRef {
    #[serde(rename = "type")]
    pub kind: ChildKind,

    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

impl ChildRef {
    #[must_use]
    pub fn member(id: impl Into<String>) -> Self {
        Self {
            kind: ChildKind::Member,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn container(id: impl Into<String>) -> Self {
        Self {
            kind: ChildKind::Container,
            id: id.into(),
        }
    }
}

/// Dataverse returns numeric database ids; aliases are strings. Both are kept as text.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_deserialize() {
        let container = Container::deserialize(&json!({
            "id": 12,
            "alias": "tamu",
            "name": "Texas A&M University",
            "dataverseType": "ORGANIZATIONS_INSTITUTIONS"
        }))
        .unwrap();

        assert_eq!(container.id, "12");
        assert_eq!(container.alias, "tamu");
        assert_eq!(container.name, "Texas A&M University");
    }

    #[test]
    fn test_contents_deserialize() {
        let children: Vec<ChildRef> = serde_json::from_value(json!([
            {"type": "dataverse", "id": 3, "title": "Physics"},
            {"type": "dataset", "id": 7, "identifier": "FK2/ABC", "protocol": "doi"},
            {"type": "datafile", "id": 9}
        ]))
        .unwrap();

        assert_eq!(
            children,
            [
                ChildRef::container("3"),
                ChildRef::member("7"),
                ChildRef {
                    kind: ChildKind::Other,
                    id: "9".into()
                }
            ]
        );
    }

    #[test]
    fn test_string_ids_are_kept() {
        let child = ChildRef::deserialize(&json!({"type": "dataverse", "id": "physics"})).unwrap();
        assert_eq!(child, ChildRef::container("physics"));
    }
}
