use thiserror::Error;

/// Alert text shown for every incomplete selection.
pub const INCOMPLETE_SELECTION_MESSAGE: &str =
    "Please select a category, context, and at least one dataset.";

/// What the user has chosen on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub category_id: String,
    pub context_id: String,
    /// Checked dataset IDs, in document order.
    pub dataset_ids: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no category selected")]
    MissingCategory,
    #[error("no context selected")]
    MissingContext,
    #[error("no datasets selected")]
    NoDatasets,
}

impl SelectionError {
    /// The message the user sees. All three cases share it.
    pub fn user_message(&self) -> &'static str {
        INCOMPLETE_SELECTION_MESSAGE
    }
}

/// A selection that passed [`Selection::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSelection {
    category_id: String,
    context_id: String,
    dataset_ids: Vec<String>,
}

impl ValidSelection {
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Never empty.
    pub fn dataset_ids(&self) -> &[String] {
        &self.dataset_ids
    }
}

impl Selection {
    pub fn new(
        category_id: impl Into<String>,
        context_id: impl Into<String>,
        dataset_ids: Vec<String>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            context_id: context_id.into(),
            dataset_ids,
        }
    }

    pub fn validate(&self) -> Result<ValidSelection, SelectionError> {
        if self.category_id.is_empty() {
            return Err(SelectionError::MissingCategory);
        }
        if self.context_id.is_empty() {
            return Err(SelectionError::MissingContext);
        }
        if self.dataset_ids.is_empty() {
            return Err(SelectionError::NoDatasets);
        }
        Ok(ValidSelection {
            category_id: self.category_id.clone(),
            context_id: self.context_id.clone(),
            dataset_ids: self.dataset_ids.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn complete_selection_is_valid() {
        let valid = Selection::new("1", "4", ids(&["7", "3"])).validate().unwrap();
        assert_eq!(valid.category_id(), "1");
        assert_eq!(valid.context_id(), "4");
        assert_eq!(valid.dataset_ids(), &ids(&["7", "3"])[..]);
    }

    #[test]
    fn every_incomplete_combination_is_rejected() {
        for category in ["", "1"] {
            for context in ["", "2"] {
                for datasets in [vec![], ids(&["5"])] {
                    let complete = !category.is_empty() && !context.is_empty() && !datasets.is_empty();
                    let result = Selection::new(category, context, datasets).validate();
                    assert_eq!(result.is_ok(), complete, "{category:?}/{context:?}");
                    if let Err(e) = result {
                        assert_eq!(e.user_message(), INCOMPLETE_SELECTION_MESSAGE);
                    }
                }
            }
        }
    }

    #[test]
    fn category_is_checked_first() {
        let err = Selection::default().validate().unwrap_err();
        assert_eq!(err, SelectionError::MissingCategory);
        let err = Selection::new("1", "", vec![]).validate().unwrap_err();
        assert_eq!(err, SelectionError::MissingContext);
        let err = Selection::new("1", "2", vec![]).validate().unwrap_err();
        assert_eq!(err, SelectionError::NoDatasets);
    }
}
