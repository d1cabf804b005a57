//! Core types and pure transformations for the asset inventory.
//!
//! Rows come in flat from the data-access layer, get assembled into
//! [`Asset`]s and leave signed as [`SignedAsset`]s. Nothing in here does I/O.

pub mod assemble;
pub mod model;
pub mod page;
pub mod signature;

pub use assemble::{assemble, parse_port_lenient, ListPolicy};
pub use model::*;
pub use page::{
    build_page, total_pages, AssetFilter, AssetPage, PageError, PageRequest, Window, DEFAULT_LIMIT,
    DEFAULT_MAX_LIMIT,
};
pub use signature::{digest_hex, sign, Signable};

pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }

    #[test]
    fn row_to_signed_asset() {
        let row = AssetRow {
            id: 7,
            host: "host1".into(),
            comment: "note".into(),
            owner: "alice".into(),
            ip_csv: "10.0.0.1,10.0.0.2".into(),
            port_csv: "80".into(),
        };
        let signed = sign(assemble(row, ListPolicy::Legacy));
        assert_eq!(signed.id, 7);
        assert_eq!(signed.ips.len(), 2);
        assert_eq!(signed.ports[0].port, 80);
        assert!(signed.verify());
    }
}
