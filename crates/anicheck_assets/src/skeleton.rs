use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonMeta {
    pub spine: Option<String>,
    pub hash: Option<String>,
}

/// The subset of a Spine JSON skeleton export read by the inspector.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SpineSkeletonFile {
    #[serde(default)]
    pub skeleton: SkeletonMeta,
    #[serde(default)]
    pub animations: Map<String, Value>,
}

impl SpineSkeletonFile {
    pub fn decode(json: &str) -> Result<SpineSkeletonFile> {
        serde_json::from_str(json).context("malformed Spine skeleton json")
    }

    /// Animation names in the order they are declared in the file.
    pub fn animation_names(&self) -> Vec<String> {
        self.animations.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_names_keep_declaration_order() {
        let json = r#"{
            "skeleton": { "hash": "abc", "spine": "4.1.24" },
            "bones": [{ "name": "root" }],
            "animations": { "walk": {}, "idle": {}, "attack": {} }
        }"#;

        let file = SpineSkeletonFile::decode(json).unwrap();
        assert_eq!(file.skeleton.spine.as_deref(), Some("4.1.24"));
        assert_eq!(file.animation_names(), vec!["walk", "idle", "attack"]);
    }

    #[test]
    fn test_skeleton_without_animations() {
        let file = SpineSkeletonFile::decode(r#"{ "bones": [] }"#).unwrap();
        assert!(file.animation_names().is_empty());
    }

    #[test]
    fn test_malformed_skeleton() {
        assert!(SpineSkeletonFile::decode("{ nope").is_err());
    }
}
