use serde::{Deserialize, Serialize};

pub use inventory_core::{AssetFilter, AssetId, AssetRow, Window};

/// An asset to be inserted, with its IPs and ports in retrieval order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    pub host: String,
    pub comment: String,
    pub owner: String,
    pub ips: Vec<String>,
    pub ports: Vec<i64>,
}

/// One line of an import CSV. `ips` and `ports` are `;`-separated so they
/// don't clash with the CSV delimiter.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRecord {
    pub host: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub ips: String,
    #[serde(default)]
    pub ports: String,
}
