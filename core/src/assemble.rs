//! Row assembly: flat `AssetRow` into a structured `Asset`.

use serde::{Deserialize, Serialize};

use crate::model::{Asset, AssetRow, Ip, Port};

const LIST_SEP: char = ',';

/// How a zero-length list column is treated.
///
/// Splitting `""` on a delimiter yields one empty token. `Legacy` keeps that
/// token (one `Ip { address: "" }` / one `Port { port: 0 }`). `SkipEmpty`
/// maps a zero-length column to an empty list instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListPolicy {
    #[default]
    Legacy,
    SkipEmpty,
}

impl ListPolicy {
    fn tokens(self, csv: &str) -> impl Iterator<Item = &str> {
        let skip = self == ListPolicy::SkipEmpty && csv.is_empty();
        csv.split(LIST_SEP).filter(move |_| !skip)
    }
}

/// Build an asset from one flat row. Never fails and never drops the asset:
/// IP tokens are taken verbatim and bad port tokens become 0.
pub fn assemble(row: AssetRow, policy: ListPolicy) -> Asset {
    let ips = policy
        .tokens(&row.ip_csv)
        .map(|t| Ip { address: t.to_string() })
        .collect();
    let ports = policy
        .tokens(&row.port_csv)
        .map(|t| Port { port: parse_port_lenient(t) })
        .collect();
    Asset {
        id: row.id,
        host: row.host,
        comment: row.comment,
        owner: row.owner,
        ips,
        ports,
    }
}

/// Lenient decimal parse: anything that is not a valid signed integer is 0.
/// This is a lossy soft-failure, not a correction of the stored value.
pub fn parse_port_lenient(token: &str) -> i64 {
    match token.parse::<i64>() {
        Ok(p) => p,
        Err(e) => {
            if !token.is_empty() {
                tracing::debug!(token, error = %e, "unparseable port token, using 0");
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ip_csv: &str, port_csv: &str) -> AssetRow {
        AssetRow {
            id: 3,
            host: "db01".into(),
            comment: "primary".into(),
            owner: "dba".into(),
            ip_csv: ip_csv.into(),
            port_csv: port_csv.into(),
        }
    }

    #[test]
    fn ips_keep_order_and_raw_text() {
        let a = assemble(row("10.0.0.1,10.0.0.2", "22"), ListPolicy::Legacy);
        let addrs: Vec<_> = a.ips.iter().map(|i| i.address.as_str()).collect();
        assert_eq!(addrs, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(a.id, 3);
        assert_eq!(a.host, "db01");
        assert_eq!(a.comment, "primary");
        assert_eq!(a.owner, "dba");
    }

    #[test]
    fn tokens_are_not_trimmed() {
        let a = assemble(row(" 10.0.0.1, host.local", "80, 443"), ListPolicy::Legacy);
        assert_eq!(a.ips[0].address, " 10.0.0.1");
        assert_eq!(a.ips[1].address, " host.local");
        assert_eq!(a.ports, vec![Port { port: 80 }, Port { port: 0 }]);
    }

    #[test]
    fn empty_columns_legacy_yield_single_default_entity() {
        let a = assemble(row("", ""), ListPolicy::Legacy);
        assert_eq!(a.ips, vec![Ip { address: String::new() }]);
        assert_eq!(a.ports, vec![Port { port: 0 }]);
    }

    #[test]
    fn empty_columns_skip_empty_yield_empty_lists() {
        let a = assemble(row("", ""), ListPolicy::SkipEmpty);
        assert_eq!(a.host, "db01");
        assert!(a.ips.is_empty());
        assert!(a.ports.is_empty());
    }

    #[test]
    fn skip_empty_keeps_inner_empty_tokens() {
        let a = assemble(row("1.1.1.1,,2.2.2.2", "22,"), ListPolicy::SkipEmpty);
        assert_eq!(a.ips.len(), 3);
        assert_eq!(a.ips[1].address, "");
        assert_eq!(a.ports, vec![Port { port: 22 }, Port { port: 0 }]);
    }

    #[test]
    fn lenient_port_parse() {
        assert_eq!(parse_port_lenient("8080"), 8080);
        assert_eq!(parse_port_lenient("+25"), 25);
        assert_eq!(parse_port_lenient("-1"), -1);
        assert_eq!(parse_port_lenient("70000"), 70000);
        assert_eq!(parse_port_lenient("http"), 0);
        assert_eq!(parse_port_lenient(""), 0);
        assert_eq!(parse_port_lenient("99999999999999999999"), 0);
    }
}
