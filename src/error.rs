use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to load {collection}: {source}")]
    RemoteFetch {
        collection: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write {collection}: {source}")]
    RemoteWrite {
        collection: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A launch was attempted with required fields left empty
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("No user is signed in")]
    NotSignedIn,
}

impl DashboardError {
    pub fn fetch(collection: &'static str, source: anyhow::Error) -> Self {
        Self::RemoteFetch { collection, source }
    }

    pub fn write(collection: &'static str, source: anyhow::Error) -> Self {
        Self::RemoteWrite { collection, source }
    }
}
