//! Category → context → dataset selector cascade.
//!
//! Changing a selector never touches the page directly here; the handlers
//! return the list of container updates and the adapter applies them in order.

use crate::client::paths;
use crate::ids;

/// Context selector content when no category is chosen.
pub const CONTEXT_PLACEHOLDER: &str = r#"<option value="">Select context...</option>"#;

/// Dataset selector content when no context is chosen.
pub const DATASET_PLACEHOLDER: &str = r#"
                    <div class="checkbox-group">
                        <input type="checkbox" id="default-dataset" value="" disabled>
                        <label for="default-dataset">Select a context to view available datasets...</label>
                    </div>"#;

/// A container the cascade rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeTarget {
    ContextSelect,
    DatasetsSelect,
}

impl CascadeTarget {
    pub fn element_id(self) -> &'static str {
        match self {
            CascadeTarget::ContextSelect => ids::CONTEXT_SELECT,
            CascadeTarget::DatasetsSelect => ids::DATASETS_SELECT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeAction {
    /// GET `path` and replace the target's content with the returned fragment.
    Load { target: CascadeTarget, path: String },
    /// Replace the target's content with fixed markup.
    Reset {
        target: CascadeTarget,
        html: &'static str,
    },
}

impl CascadeAction {
    pub fn target(&self) -> CascadeTarget {
        match self {
            CascadeAction::Load { target, .. } | CascadeAction::Reset { target, .. } => *target,
        }
    }
}

pub fn on_category_change(category_id: &str) -> Vec<CascadeAction> {
    let reset_datasets = CascadeAction::Reset {
        target: CascadeTarget::DatasetsSelect,
        html: DATASET_PLACEHOLDER,
    };
    if category_id.is_empty() {
        vec![
            CascadeAction::Reset {
                target: CascadeTarget::ContextSelect,
                html: CONTEXT_PLACEHOLDER,
            },
            reset_datasets,
        ]
    } else {
        vec![
            CascadeAction::Load {
                target: CascadeTarget::ContextSelect,
                path: paths::contexts(category_id),
            },
            reset_datasets,
        ]
    }
}

pub fn on_context_change(category_id: &str, context_id: &str) -> Vec<CascadeAction> {
    if context_id.is_empty() {
        vec![CascadeAction::Reset {
            target: CascadeTarget::DatasetsSelect,
            html: DATASET_PLACEHOLDER,
        }]
    } else {
        vec![CascadeAction::Load {
            target: CascadeTarget::DatasetsSelect,
            path: paths::datasets(category_id, context_id),
        }]
    }
}
