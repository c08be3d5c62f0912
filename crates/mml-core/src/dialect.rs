use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dialect {
    pub section: Option<Format>,
    pub paragraph: Option<Format>,
    pub quotations: Option<Format>,
    #[serde(default)]
    pub smartquotes: bool,
    #[serde(default)]
    pub softhyphens: bool,
    /// Index + 1 is the indentation level.
    pub codeblocks: Option<Vec<Format>>,
    /// Index + 1 is the heading level.
    pub headings: Option<Vec<HeadingFormat>>,
    pub dividers: Option<Vec<TagFormat>>,
    pub charformats: Option<Vec<TagFormat>>,
    pub paraformats: Option<Vec<PairedFormat>>,
    pub milestones: Option<Vec<PairedFormat>>,
}

/// A feature that only carries a class name.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Format {
    pub prop: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeadingFormat {
    pub tag: char,
    pub prop: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TagFormat {
    pub tag: String,
    pub prop: Option<String>,
}

impl TagFormat {
    /// Class name for the tag; falls back to the tag itself.
    pub fn class(&self) -> &str {
        self.prop.as_deref().unwrap_or(&self.tag)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PairedFormat {
    pub left_tag: String,
    pub right_tag: String,
    pub prop: Option<String>,
}

pub const DEFAULT_SECTION_CLASS: &str = "section";
pub const PAGE_PROP: &str = "page";

impl Dialect {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let dialect: Dialect = serde_json::from_str(text)?;
        dialect.validate()?;
        Ok(dialect)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let dialect: Dialect = serde_json::from_value(value)?;
        dialect.validate()?;
        Ok(dialect)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks the rules serde cannot express through types alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(headings) = &self.headings {
            for (index, heading) in headings.iter().enumerate() {
                if heading.tag.is_whitespace() {
                    return Err(ConfigError::WhitespaceHeadingTag { index });
                }
            }
        }
        check_tags("dividers", self.dividers.as_deref())?;
        check_tags("charformats", self.charformats.as_deref())?;
        check_pairs("paraformats", self.paraformats.as_deref())?;
        check_pairs("milestones", self.milestones.as_deref())?;
        Ok(())
    }

    pub fn section_class(&self) -> &str {
        self.section
            .as_ref()
            .and_then(|format| format.prop.as_deref())
            .unwrap_or(DEFAULT_SECTION_CLASS)
    }

    /// The first heading whose tag is `marker`, with its 1-based level.
    pub fn heading_for(&self, marker: char) -> Option<(usize, &HeadingFormat)> {
        self.headings
            .as_ref()?
            .iter()
            .enumerate()
            .find(|(_, heading)| heading.tag == marker)
            .map(|(index, heading)| (index + 1, heading))
    }

    pub fn milestone_list(&self) -> &[PairedFormat] {
        self.milestones.as_deref().unwrap_or(&[])
    }
}

fn check_tags(feature: &'static str, formats: Option<&[TagFormat]>) -> Result<(), ConfigError> {
    for (index, format) in formats.unwrap_or(&[]).iter().enumerate() {
        if format.tag.is_empty() {
            return Err(ConfigError::EmptyTag { feature, index });
        }
    }
    Ok(())
}

fn check_pairs(
    feature: &'static str,
    formats: Option<&[PairedFormat]>,
) -> Result<(), ConfigError> {
    for (index, format) in formats.unwrap_or(&[]).iter().enumerate() {
        if format.left_tag.is_empty() || format.right_tag.is_empty() {
            return Err(ConfigError::EmptyTag { feature, index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Dialect;
    use crate::error::ConfigError;

    #[test]
    fn loads_a_full_dialect() {
        let dialect = Dialect::from_json(
            r#"{
                "description": "novel markup",
                "section": {"prop": "chapter"},
                "paragraph": {"prop": "para"},
                "quotations": {"prop": "quote"},
                "smartquotes": true,
                "softhyphens": true,
                "codeblocks": [{"prop": "pre1"}, {"prop": "pre2"}],
                "headings": [{"tag": "=", "prop": "h1"}, {"tag": "-", "prop": "h2"}],
                "dividers": [{"tag": "***", "prop": "hr"}],
                "charformats": [{"tag": "*", "prop": "italics"}],
                "paraformats": [{"leftTag": "->", "rightTag": "<-", "prop": "centered"}],
                "milestones": [{"leftTag": "[", "rightTag": "]", "prop": "page"}]
            }"#,
        )
        .expect("valid dialect");

        assert_eq!(dialect.section_class(), "chapter");
        assert!(dialect.smartquotes);
        assert_eq!(dialect.heading_for('-').map(|(level, _)| level), Some(2));
        assert_eq!(dialect.heading_for('~'), None);
        assert_eq!(dialect.milestone_list()[0].left_tag, "[");
    }

    #[test]
    fn absent_features_stay_disabled() {
        let dialect = Dialect::from_json("{}").expect("empty dialect");
        assert_eq!(dialect, Dialect::default());
        assert_eq!(dialect.section_class(), "section");
        assert!(dialect.milestone_list().is_empty());
    }

    #[test]
    fn first_heading_wins_on_duplicate_tags() {
        let dialect = Dialect::from_json(
            r#"{"headings": [{"tag": "=", "prop": "a"}, {"tag": "=", "prop": "b"}]}"#,
        )
        .expect("valid dialect");
        let (level, heading) = dialect.heading_for('=').expect("heading");
        assert_eq!(level, 1);
        assert_eq!(heading.prop.as_deref(), Some("a"));
    }

    #[test]
    fn wrong_types_fail_fast() {
        let err = Dialect::from_json(r#"{"smartquotes": "yes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "got {err:?}");

        let err = Dialect::from_json(r#"{"headings": [{"tag": "==", "prop": "h1"}]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "got {err:?}");
    }

    #[test]
    fn empty_tags_are_rejected() {
        let err = Dialect::from_json(r#"{"charformats": [{"tag": "*"}, {"tag": ""}]}"#).unwrap_err();
        assert!(
            matches!(
                err,
                ConfigError::EmptyTag {
                    feature: "charformats",
                    index: 1
                }
            ),
            "got {err:?}"
        );

        let err = Dialect::from_json(r#"{"milestones": [{"leftTag": "[", "rightTag": ""}]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTag { .. }), "got {err:?}");
    }

    #[test]
    fn whitespace_heading_tag_is_rejected() {
        let err = Dialect::from_json(r#"{"headings": [{"tag": " "}]}"#).unwrap_err();
        assert!(
            matches!(err, ConfigError::WhitespaceHeadingTag { index: 0 }),
            "got {err:?}"
        );
    }

    #[test]
    fn tag_class_falls_back_to_tag() {
        let dialect = Dialect::from_json(r#"{"dividers": [{"tag": "---"}]}"#).expect("valid");
        let dividers = dialect.dividers.as_deref().unwrap_or(&[]);
        assert_eq!(dividers[0].class(), "---");
    }
}
