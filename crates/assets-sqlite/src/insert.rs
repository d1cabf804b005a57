use crate::{AssetId, Db, ImportRecord, NewAsset};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::io::Read;

impl Db {
    pub fn insert_asset(&mut self, asset: &NewAsset) -> Result<AssetId> {
        let tx = self.conn.transaction()?;
        let id = insert_into(&tx, asset)?;
        tx.commit()?;
        Ok(id)
    }

    /// Load assets from CSV with a `host,comment,owner,ips,ports` header.
    /// Returns the number of assets inserted. All records go in one
    /// transaction: a bad record rolls back the whole import.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut rdr = csv::Reader::from_reader(reader);
        let tx = self.conn.transaction()?;
        let mut count = 0;
        for (i, rec) in rdr.deserialize::<ImportRecord>().enumerate() {
            let rec = rec.with_context(|| format!("csv record {}", i + 1))?;
            let asset = new_asset_from_record(rec).with_context(|| format!("csv record {}", i + 1))?;
            insert_into(&tx, &asset)?;
            count += 1;
        }
        tx.commit()?;
        tracing::info!(count, "imported assets");
        Ok(count)
    }
}

fn insert_into(conn: &Connection, asset: &NewAsset) -> Result<AssetId> {
    conn.execute(
        "INSERT INTO assets(host, comment, owner) VALUES (?,?,?)",
        params![asset.host, asset.comment, asset.owner],
    )?;
    let id = conn.last_insert_rowid();
    let mut ip_stmt = conn.prepare_cached("INSERT INTO ips(asset_id, address) VALUES (?,?)")?;
    for addr in &asset.ips {
        ip_stmt.execute(params![id, addr])?;
    }
    let mut port_stmt = conn.prepare_cached("INSERT INTO ports(asset_id, port) VALUES (?,?)")?;
    for port in &asset.ports {
        port_stmt.execute(params![id, port])?;
    }
    Ok(id)
}

fn new_asset_from_record(rec: ImportRecord) -> Result<NewAsset> {
    let list = |s: &str| -> Vec<String> {
        s.split(';').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect()
    };
    let ports = list(&rec.ports)
        .iter()
        .map(|p| p.parse::<i64>().with_context(|| format!("invalid port: {p}")))
        .collect::<Result<Vec<_>>>()?;
    Ok(NewAsset { ips: list(&rec.ips), ports, host: rec.host, comment: rec.comment, owner: rec.owner })
}

#[cfg(test)]
mod tests {
    use crate::testutil::{new_asset, temp_db};

    #[test]
    fn insert_assigns_sequential_ids() {
        let (_dir, _path, mut db) = temp_db();
        let a = db.insert_asset(&new_asset("a", &["10.0.0.1"], &[22])).unwrap();
        let b = db.insert_asset(&new_asset("b", &[], &[])).unwrap();
        assert_eq!(b, a + 1);
        let ips: i64 = db.conn.query_row("SELECT COUNT(*) FROM ips", [], |r| r.get(0)).unwrap();
        assert_eq!(ips, 1);
    }

    #[test]
    fn import_csv_splits_lists() {
        let (_dir, _path, mut db) = temp_db();
        let data = "host,comment,owner,ips,ports\n\
                    web01,frontend,alice,10.0.0.1;10.0.0.2,80;443\n\
                    bare,,bob,,\n";
        assert_eq!(db.import_csv(data.as_bytes()).unwrap(), 2);
        let ports: Vec<i64> = db
            .conn
            .prepare("SELECT port FROM ports ORDER BY port_id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(ports, vec![80, 443]);
    }

    #[test]
    fn import_csv_rejects_bad_port() {
        let (_dir, _path, mut db) = temp_db();
        let data = "host,comment,owner,ips,ports\nweb01,,,,http\n";
        let err = db.import_csv(data.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid port"));
    }

    #[test]
    fn import_csv_is_all_or_nothing() {
        let (_dir, _path, mut db) = temp_db();
        let data = "host,comment,owner,ips,ports\n\
                    web01,,alice,10.0.0.1,80\n\
                    web02,,bob,10.0.0.2,http\n";
        assert!(db.import_csv(data.as_bytes()).is_err());
        for table in ["assets", "ips", "ports"] {
            let n: i64 = db.conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0)).unwrap();
            assert_eq!(n, 0, "{table}");
        }
    }
}
