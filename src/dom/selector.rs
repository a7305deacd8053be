use crate::error::{PageError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Compound selector of the form `tag.class-a.class-b`
///
/// Only an optional tag name followed by one or more class names is
/// supported; that is all the binder needs to recognise qualifying elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSelector {
    tag_name: Option<String>,
    classes: Vec<String>,
}

impl ClassSelector {
    /// Build a selector from class names, without a tag constraint
    pub fn from_classes<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return Err(PageError::InvalidSelector(
                "selector needs at least one class".to_string(),
            ));
        }
        for class in &classes {
            if !is_valid_ident(class) {
                return Err(PageError::InvalidSelector(format!(
                    "invalid class name '{}'",
                    class
                )));
            }
        }
        Ok(Self {
            tag_name: None,
            classes,
        })
    }

    /// The `.tooltip.clickable` selector
    pub fn tooltip_clickable() -> Self {
        Self {
            tag_name: None,
            classes: vec!["tooltip".to_string(), "clickable".to_string()],
        }
    }

    /// Tag constraint, if any
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    /// Required class names
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check a tag name and class attribute value against this selector
    pub fn matches(&self, tag_name: &str, class_attr: Option<&str>) -> bool {
        if let Some(tag) = &self.tag_name {
            if !tag.eq_ignore_ascii_case(tag_name) {
                return false;
            }
        }

        self.classes.iter().all(|required| {
            super::element::class_list(class_attr).any(|token| token == required)
        })
    }
}

impl FromStr for ClassSelector {
    type Err = PageError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let Some(first_dot) = trimmed.find('.') else {
            return Err(PageError::InvalidSelector(format!(
                "'{}' has no class component",
                input
            )));
        };

        let (tag, rest) = trimmed.split_at(first_dot);
        let tag_name = if tag.is_empty() {
            None
        } else if is_valid_ident(tag) {
            Some(tag.to_ascii_lowercase())
        } else {
            return Err(PageError::InvalidSelector(format!(
                "unsupported selector '{}'",
                input
            )));
        };

        // rest starts with '.', so the first split piece is always empty
        let classes: Vec<&str> = rest[1..].split('.').collect();
        let mut selector = Self::from_classes(classes.iter().copied()).map_err(|_| {
            PageError::InvalidSelector(format!("unsupported selector '{}'", input))
        })?;
        selector.tag_name = tag_name;
        Ok(selector)
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag_name {
            write!(f, "{}", tag)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

impl Serialize for ClassSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClassSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn is_valid_ident(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
