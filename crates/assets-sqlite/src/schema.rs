pub const MIG_0001_INIT: &str = r#"
BEGIN;

CREATE TABLE assets (
  id              INTEGER PRIMARY KEY,
  host            TEXT NOT NULL,
  comment         TEXT NOT NULL DEFAULT '',
  owner           TEXT NOT NULL DEFAULT ''
);

CREATE TABLE ips (
  ip_id           INTEGER PRIMARY KEY AUTOINCREMENT,
  asset_id        INTEGER NOT NULL REFERENCES assets(id) ON DELETE CASCADE,
  address         TEXT NOT NULL
);

CREATE TABLE ports (
  port_id         INTEGER PRIMARY KEY AUTOINCREMENT,
  asset_id        INTEGER NOT NULL REFERENCES assets(id) ON DELETE CASCADE,
  port            INTEGER NOT NULL
);

CREATE INDEX idx_assets_host ON assets(host);
CREATE INDEX idx_ips_asset ON ips(asset_id);
CREATE INDEX idx_ports_asset ON ports(asset_id);

COMMIT;
"#
;
