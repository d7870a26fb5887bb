use serde::{Deserialize, Serialize};

use crate::detection::domain::face_service_error::FaceServiceError;

/// Clusters returned by the grouping service.
///
/// `groups` holds identities judged to be the same person, largest first as
/// ordered by the service. `messy_group` holds the leftovers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceGrouping {
    #[serde(default)]
    pub groups: Vec<Vec<String>>,
    #[serde(default)]
    pub messy_group: Vec<String>,
}

impl FaceGrouping {
    /// Identities of the most common person.
    ///
    /// The first group wins, in service order. With no groups at all, a
    /// single leftover identity stands in so a batch of strangers still
    /// yields a face.
    pub fn most_common(&self) -> Vec<String> {
        if let Some(first) = self.groups.first() {
            return first.clone();
        }
        self.messy_group.first().cloned().into_iter().collect()
    }
}

/// Domain interface for grouping face identities by person.
pub trait FaceGrouper: Send + Sync {
    fn group(&self, face_ids: &[String]) -> Result<FaceGrouping, FaceServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_group_wins() {
        let grouping = FaceGrouping {
            groups: vec![ids(&["a", "c"]), ids(&["b", "d", "e"])],
            messy_group: ids(&["f"]),
        };
        assert_eq!(grouping.most_common(), ids(&["a", "c"]));
    }

    #[test]
    fn test_falls_back_to_first_messy_face() {
        let grouping = FaceGrouping {
            groups: vec![],
            messy_group: ids(&["x", "y"]),
        };
        assert_eq!(grouping.most_common(), ids(&["x"]));
    }

    #[test]
    fn test_empty_grouping_yields_nothing() {
        assert!(FaceGrouping::default().most_common().is_empty());
    }

    #[test]
    fn test_parses_service_payload() {
        let json = r#"{"groups": [["a", "b"]], "messyGroup": ["c"]}"#;
        let grouping: FaceGrouping = serde_json::from_str(json).unwrap();
        assert_eq!(grouping.groups, vec![ids(&["a", "b"])]);
        assert_eq!(grouping.messy_group, ids(&["c"]));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let grouping: FaceGrouping = serde_json::from_str("{}").unwrap();
        assert_eq!(grouping, FaceGrouping::default());
    }
}
