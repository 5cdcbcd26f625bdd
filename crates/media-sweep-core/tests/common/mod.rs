#![allow(dead_code)]

use std::fs;
use std::path::Path;

use media_sweep_core::storage::SqliteStore;
use rusqlite::Connection;

/// Cut-down e-commerce schema: EAV attributes, catalog value tables,
/// CMS pages/blocks and store configuration.
pub const SCHEMA: &str = "
CREATE TABLE eav_entity_type (
    entity_type_id INTEGER PRIMARY KEY,
    entity_type_code VARCHAR(50) NOT NULL
);
INSERT INTO eav_entity_type VALUES (3, 'catalog_category'), (4, 'catalog_product');

CREATE TABLE eav_attribute (
    attribute_id INTEGER PRIMARY KEY,
    entity_type_id INTEGER NOT NULL,
    attribute_code VARCHAR(255) NOT NULL,
    backend_type VARCHAR(8) NOT NULL
);
INSERT INTO eav_attribute VALUES
    (1, 4, 'image', 'varchar'),
    (2, 4, 'small_image', 'varchar'),
    (3, 4, 'thumbnail', 'varchar'),
    (4, 4, 'description', 'text'),
    (5, 4, 'short_description', 'text'),
    (6, 3, 'image', 'varchar'),
    (7, 3, 'description', 'text'),
    (8, 3, 'mega_menu_icon', 'varchar'),
    (9, 4, 'name', 'varchar');

CREATE TABLE catalog_product_entity_varchar (
    value_id INTEGER PRIMARY KEY,
    attribute_id INTEGER NOT NULL,
    entity_id INTEGER NOT NULL,
    value VARCHAR(255)
);
CREATE TABLE catalog_product_entity_text (
    value_id INTEGER PRIMARY KEY,
    attribute_id INTEGER NOT NULL,
    entity_id INTEGER NOT NULL,
    value MEDIUMTEXT
);
CREATE TABLE catalog_product_entity_media_gallery (
    value_id INTEGER PRIMARY KEY,
    attribute_id INTEGER NOT NULL,
    value VARCHAR(255)
);
CREATE TABLE catalog_category_entity_varchar (
    value_id INTEGER PRIMARY KEY,
    attribute_id INTEGER NOT NULL,
    entity_id INTEGER NOT NULL,
    value VARCHAR(255)
);
CREATE TABLE catalog_category_entity_text (
    value_id INTEGER PRIMARY KEY,
    attribute_id INTEGER NOT NULL,
    entity_id INTEGER NOT NULL,
    value TEXT
);
CREATE TABLE cms_page (
    page_id INTEGER PRIMARY KEY,
    title VARCHAR(255),
    content MEDIUMTEXT
);
CREATE TABLE cms_block (
    block_id INTEGER PRIMARY KEY,
    title VARCHAR(255),
    content MEDIUMTEXT
);
CREATE TABLE core_config_data (
    config_id INTEGER PRIMARY KEY,
    scope VARCHAR(8) NOT NULL DEFAULT 'default',
    path VARCHAR(255) NOT NULL,
    value TEXT
);
";

/// Populates `conn` with the schema plus `rows`.
pub fn populate(conn: &Connection, rows: &str) {
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(rows).unwrap();
}

pub fn memory_store(rows: &str) -> SqliteStore {
    let conn = Connection::open_in_memory().unwrap();
    populate(&conn, rows);
    SqliteStore::from_connection(conn).unwrap()
}

/// Writes the schema plus `rows` to a database file at `path`.
pub fn file_store(path: &Path, rows: &str) {
    let conn = Connection::open(path).unwrap();
    populate(&conn, rows);
}

/// Creates each file (and its parents) under `root`.
pub fn create_files(root: &Path, relatives: &[&str]) {
    for relative in relatives {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, relative.as_bytes()).unwrap();
    }
}
