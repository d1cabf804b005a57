use crate::{AssetFilter, AssetRow, Db, Window};
use anyhow::Result;
use rusqlite::{params_from_iter, types::Value, Row};

const ROWS_SQL: &str = "
SELECT a.id, a.host, a.comment, a.owner,
       COALESCE((SELECT group_concat(ip.address, ',' ORDER BY ip.ip_id) FROM ips ip WHERE ip.asset_id = a.id), '') AS ip_csv,
       COALESCE((SELECT group_concat(p.port, ',' ORDER BY p.port_id) FROM ports p WHERE p.asset_id = a.id), '') AS port_csv
FROM assets a
WHERE 1=1";

impl Db {
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let cnt: i64 = self.conn.query_row(
            "SELECT COUNT(1) FROM sqlite_master WHERE type='table' AND name=?",
            [name],
            |r| r.get(0),
        )?;
        Ok(cnt > 0)
    }

    /// Number of assets matching `filter`, ignoring pagination.
    pub fn count_assets(&self, filter: &AssetFilter) -> Result<u64> {
        let (pred, args) = predicate(filter);
        let sql = format!("SELECT COUNT(*) FROM assets a WHERE 1=1{pred}");
        let n: i64 = self.conn.query_row(&sql, params_from_iter(args), |r| r.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// One flat row per matching asset, ordered by id, limited to `window`.
    /// Any scan error fails the whole call.
    pub fn fetch_rows(&self, filter: &AssetFilter, window: Window) -> Result<Vec<AssetRow>> {
        let (pred, mut args) = predicate(filter);
        let sql = format!("{ROWS_SQL}{pred} ORDER BY a.id LIMIT ? OFFSET ?");
        args.push(Value::Integer(to_i64(window.limit)));
        args.push(Value::Integer(to_i64(window.offset)));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args), asset_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Count and page rows read from the same snapshot.
    pub fn load_page(&self, filter: &AssetFilter, window: Window) -> Result<(Vec<AssetRow>, u64)> {
        let tx = self.conn.unchecked_transaction()?;
        let total = self.count_assets(filter)?;
        let rows = self.fetch_rows(filter, window)?;
        tx.finish()?;
        Ok((rows, total))
    }
}

fn asset_row(r: &Row) -> rusqlite::Result<AssetRow> {
    Ok(AssetRow {
        id: r.get(0)?,
        host: r.get(1)?,
        comment: r.get(2)?,
        owner: r.get(3)?,
        ip_csv: r.get(4)?,
        port_csv: r.get(5)?,
    })
}

fn predicate(filter: &AssetFilter) -> (String, Vec<Value>) {
    let mut sql = String::new();
    let mut args = Vec::new();
    if let Some(id) = filter.id {
        sql.push_str(" AND a.id = ?");
        args.push(Value::Integer(id));
    }
    if let Some(host) = filter.host.as_deref().filter(|h| !h.is_empty()) {
        sql.push_str(" AND a.host LIKE '%' || ? || '%' ESCAPE '\\'");
        args.push(Value::Text(escape_like(host)));
    }
    (sql, args)
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
