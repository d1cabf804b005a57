use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::signature::Signable;

pub type AssetId = i64;

/// One flat row as produced by the data-access layer: asset columns plus
/// comma-joined IP addresses and port numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRow {
    pub id: AssetId,
    pub host: String,
    pub comment: String,
    pub owner: String,
    pub ip_csv: String,
    pub port_csv: String,
}

/// An assembled, not yet signed asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub host: String,
    pub comment: String,
    pub owner: String,
    pub ips: Vec<Ip>,
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ip {
    pub address: String,
}

/// Port number as stored. The 0..=65535 range is not enforced here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub port: i64,
}

/// A sub-entity with its content signature attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed<T> {
    #[serde(flatten)]
    pub inner: T,
    pub signature: String,
}

impl<T: Signable> Signed<T> {
    pub fn new(inner: T) -> Self {
        let signature = inner.signature();
        Signed { inner, signature }
    }

    pub fn is_valid(&self) -> bool {
        self.inner.signature() == self.signature
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Deref for Signed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

/// The response entity: every level carries a signature derived from its
/// own content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAsset {
    pub id: AssetId,
    pub host: String,
    pub comment: String,
    pub owner: String,
    pub ips: Vec<Signed<Ip>>,
    pub ports: Vec<Signed<Port>>,
    pub signature: String,
}

impl SignedAsset {
    /// Drop all signatures, keeping content.
    pub fn unsigned(&self) -> Asset {
        Asset {
            id: self.id,
            host: self.host.clone(),
            comment: self.comment.clone(),
            owner: self.owner.clone(),
            ips: self.ips.iter().cloned().map(Signed::into_inner).collect(),
            ports: self.ports.iter().cloned().map(Signed::into_inner).collect(),
        }
    }

    /// Recompute every signature from content and compare.
    pub fn verify(&self) -> bool {
        self.unsigned().signature() == self.signature
            && self.ips.iter().all(Signed::is_valid)
            && self.ports.iter().all(Signed::is_valid)
    }
}
