use thiserror::Error;

/// Developer hint shown next to a data failure.
pub const GENERATE_HINT: &str =
    "chain data is missing or malformed; was the data collector run to produce data.json?";

/// Failures that can cross a module boundary inside the portal.
///
/// Everything here is absorbed before it reaches the page: a data failure
/// renders an empty portal, a storage failure only loses the remembered
/// network.
#[derive(Debug, Error)]
pub enum PortalError {
    /// `data.json` could not be fetched or parsed.
    #[error("chain data unavailable from {source_desc}: {reason}")]
    DataUnavailable { source_desc: String, reason: String },

    /// The persisted choice store rejected a read or write.
    #[error("choice store error: {0}")]
    Storage(String),
}

impl PortalError {
    pub fn data(source_desc: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PortalError::DataUnavailable {
            source_desc: source_desc.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, PortalError::DataUnavailable { .. })
    }

    /// What a developer should check, if the failure has an obvious cause.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            PortalError::DataUnavailable { .. } => Some(GENERATE_HINT),
            PortalError::Storage(_) => None,
        }
    }
}

#[cfg(feature = "native")]
impl From<rusqlite::Error> for PortalError {
    fn from(e: rusqlite::Error) -> Self {
        PortalError::Storage(e.to_string())
    }
}

pub type Result<T, E = PortalError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_data_failures_carry_the_hint() {
        assert_eq!(PortalError::data("data.json", "404").hint(), Some(GENERATE_HINT));
        assert_eq!(PortalError::Storage("locked".into()).hint(), None);
    }
}
