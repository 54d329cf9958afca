//! Error types for the foundry-actions crate.
//!
//! Every variant here is a configuration defect. They are raised while an
//! action library or partition layout is being loaded, before any planning
//! starts, and never from inside a search.

/// Errors raised while building or validating an action library.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A movement action was declared without a target coordinate.
    #[error("movement action {action:?} has no target coordinate")]
    MissingTarget {
        /// The offending action.
        action: String,
    },

    /// A state-change action was given a target coordinate.
    #[error("state-change action {action:?} declares a target; only movement actions may")]
    UnexpectedTarget {
        /// The offending action.
        action: String,
    },

    /// The configured base cost is zero or negative.
    #[error("action {action:?} has non-positive base cost {cost}")]
    NonPositiveCost {
        /// The offending action.
        action: String,
        /// The configured base cost.
        cost: i64,
    },

    /// Two actions in one library share a name.
    #[error("duplicate action name: {0:?}")]
    DuplicateName(String),

    /// An effect writes a key that belongs to the other partition (or to
    /// neither).
    #[error("action {action:?} writes {key:?} outside the {partition} partition")]
    EffectOutsidePartition {
        /// The offending action.
        action: String,
        /// The key written.
        key: String,
        /// The partition the effect was declared for.
        partition: &'static str,
    },

    /// A movement action is used where the position key is not private.
    #[error("movement action {action:?} requires a private {key:?} attribute")]
    PositionNotPrivate {
        /// The offending action.
        action: String,
        /// The position key.
        key: &'static str,
    },

    /// A cost modifier reads a shared key. Costs are computed against the
    /// acting agent's private partition only, so such a modifier could
    /// never fire.
    #[error("cost modifier of action {action:?} reads shared key {key:?}")]
    ModifierReadsShared {
        /// The offending action.
        action: String,
        /// The shared key read by the modifier.
        key: String,
    },

    /// A key appears in both the initial shared and private state.
    #[error("attribute {0:?} is present in both the shared and private partitions")]
    PartitionOverlap(String),

    /// Failed to read an action library file.
    #[error("failed to read action library: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse an action library document.
    #[error("failed to parse action library YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ActionError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
