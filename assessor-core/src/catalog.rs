//! The explicit list of assessments a run can choose from.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::assessment::AssessmentData;
use crate::error::CatalogError;

/// Which assessments to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Named(String),
}

impl Selection {
    /// `all` selects everything; anything else is a name.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == "all" {
            Self::All
        } else {
            Self::Named(text.to_string())
        }
    }
}

/// Assessments keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentCatalog {
    assessments: BTreeMap<String, AssessmentData>,
}

impl AssessmentCatalog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assessments: BTreeMap::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidName`] unless the name is a plain file
    /// name, and [`CatalogError::DuplicateAssessment`] if it is taken.
    pub fn add(&mut self, assessment: AssessmentData) -> Result<(), CatalogError> {
        let name = assessment.name().to_string();
        if !is_plain_name(&name) {
            return Err(CatalogError::InvalidName(name));
        }
        if self.assessments.contains_key(&name) {
            return Err(CatalogError::DuplicateAssessment(name));
        }
        self.assessments.insert(name, assessment);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails on the first duplicate name.
    pub fn from_assessments<I>(assessments: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = AssessmentData>,
    {
        let mut catalog = Self::new();
        for assessment in assessments {
            catalog.add(assessment)?;
        }
        Ok(catalog)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assessments.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }

    /// Assessments matching `selection`, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownAssessment`] listing the known names.
    pub fn select(&self, selection: &Selection) -> Result<Vec<&AssessmentData>, CatalogError> {
        match selection {
            Selection::All => Ok(self.assessments.values().collect()),
            Selection::Named(name) => self
                .assessments
                .get(name)
                .map(|assessment| vec![assessment])
                .ok_or_else(|| CatalogError::UnknownAssessment {
                    name: name.clone(),
                    known: self.names().collect::<Vec<_>>().join(", "),
                }),
        }
    }
}

/// Reports are written to `<name>.<ext>`, so a name must not leave its
/// directory.
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(component)), None) if component == name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_assessment;

    fn assessment(name: &str) -> AssessmentData {
        parse_assessment(&format!(
            r#"{{ "name": "{name}", "quorum": 1, "strengths": {{ "default": 1 }} }}"#
        ))
        .unwrap()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = AssessmentCatalog::from_assessments([assessment("a"), assessment("a")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateAssessment("a".to_string()));
    }

    #[test]
    fn names_that_leave_the_directory_are_rejected() {
        for name in ["../escaped", "nested/report", "/abs", ".", "..", "trailing/", ""] {
            let err = AssessmentCatalog::from_assessments([assessment(name)]).unwrap_err();
            assert_eq!(err, CatalogError::InvalidName(name.to_string()), "{name}");
        }
        assert!(AssessmentCatalog::from_assessments([assessment("8600-8602")]).is_ok());
    }

    #[test]
    fn unknown_name_lists_known_names() {
        let catalog = AssessmentCatalog::from_assessments([assessment("b"), assessment("a")]).unwrap();
        let err = catalog.select(&Selection::parse("zzz")).unwrap_err();
        assert_eq!(err.to_string(), "no assessment named zzz; known assessments: a, b");
    }

    #[test]
    fn all_selects_in_name_order() {
        let catalog = AssessmentCatalog::from_assessments([assessment("b"), assessment("a")]).unwrap();
        let names: Vec<&str> = catalog
            .select(&Selection::All)
            .unwrap()
            .into_iter()
            .map(AssessmentData::name)
            .collect();
        assert_eq!(names, ["a", "b"]);
    }
}
