//! Content signatures.
//!
//! SHA-256 over a fixed byte encoding of each entity, rendered as lowercase
//! hex. The digest and encoding are a compatibility contract with other
//! readers of the same inventory, so changing either is a breaking change.
//!
//! The asset encoding is `host ‖ comment ‖ owner` with no separator, which
//! means `("ab", "c", "")` and `("a", "bc", "")` collide. This is kept as-is
//! for compatibility with existing signatures.

use sha2::{Digest, Sha256};
use std::borrow::Cow;

use crate::model::{Asset, Ip, Port, Signed, SignedAsset};

pub trait Signable {
    /// Bytes fed to the digest. Never includes a signature field.
    fn signature_input(&self) -> Cow<'_, [u8]>;

    fn signature(&self) -> String {
        digest_hex(&self.signature_input())
    }
}

pub fn digest_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

impl Signable for Asset {
    fn signature_input(&self) -> Cow<'_, [u8]> {
        let mut buf = Vec::with_capacity(self.host.len() + self.comment.len() + self.owner.len());
        buf.extend_from_slice(self.host.as_bytes());
        buf.extend_from_slice(self.comment.as_bytes());
        buf.extend_from_slice(self.owner.as_bytes());
        Cow::Owned(buf)
    }
}

impl Signable for Ip {
    fn signature_input(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.address.as_bytes())
    }
}

impl Signable for Port {
    fn signature_input(&self) -> Cow<'_, [u8]> {
        Cow::Owned(self.port.to_string().into_bytes())
    }
}

/// Sign an asset and each of its IPs and ports.
pub fn sign(asset: Asset) -> SignedAsset {
    let signature = asset.signature();
    let Asset { id, host, comment, owner, ips, ports } = asset;
    SignedAsset {
        id,
        host,
        comment,
        owner,
        ips: ips.into_iter().map(Signed::new).collect(),
        ports: ports.into_iter().map(Signed::new).collect(),
        signature,
    }
}
