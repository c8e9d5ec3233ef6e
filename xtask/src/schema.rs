// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema parity between the `SQLite` and `MySQL` migration trees.
//!
//! Both trees are applied to empty databases and reduced to a
//! backend-neutral shape: per table, each column's type family and
//! nullability, plus the column lists of every unique index.

use std::collections::{BTreeMap, BTreeSet};

use color_eyre::{Result, eyre::Context, eyre::eyre};
use diesel::sql_types::{BigInt, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::mariadb::MariaDbContainer;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

const MIGRATIONS_TABLE: &str = "__diesel_schema_migrations";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    family: TypeFamily,
    nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TypeFamily {
    Integer,
    Text,
    Other,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    unique: BTreeSet<Vec<String>>,
}

type Schema = BTreeMap<String, Table>;

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    column_type: String,
    #[diesel(sql_type = BigInt)]
    nullable: i64,
}

#[derive(QueryableByName)]
struct UniqueRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    index_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
}

/// Applies both migration trees and fails on any structural difference.
pub fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");

    let mut sqlite_conn: SqliteConnection = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;
    let sqlite_schema: Schema = build_schema(
        diesel::sql_query(SQLITE_COLUMNS).load(&mut sqlite_conn)?,
        diesel::sql_query(SQLITE_UNIQUE).load(&mut sqlite_conn)?,
    );

    let container: MariaDbContainer = MariaDbContainer::start("fulfillment-verify-migrations", 3308)?;
    let mut mysql_conn: MysqlConnection = MysqlConnection::establish(&container.database_url())
        .wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;
    let mysql_schema: Schema = build_schema(
        diesel::sql_query(MYSQL_COLUMNS).load(&mut mysql_conn)?,
        diesel::sql_query(MYSQL_UNIQUE).load(&mut mysql_conn)?,
    );
    drop(container);

    let differences: Vec<String> = compare(&sqlite_schema, &mysql_schema);
    if differences.is_empty() {
        tracing::info!(tables = sqlite_schema.len(), "Schema parity verification passed");
        return Ok(());
    }
    for difference in &differences {
        tracing::error!("{difference}");
    }
    Err(eyre!("{} schema difference(s) found", differences.len()))
}

// Primary keys report nullable in SQLite, so they are forced NOT NULL here.
const SQLITE_COLUMNS: &str = "\
    SELECT m.name AS table_name, c.name AS column_name, c.type AS column_type, \
           CASE WHEN c.\"notnull\" = 0 AND c.pk = 0 THEN 1 ELSE 0 END AS nullable \
    FROM sqlite_master m JOIN pragma_table_info(m.name) c \
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%'";

const SQLITE_UNIQUE: &str = "\
    SELECT m.name AS table_name, il.name AS index_name, ii.name AS column_name \
    FROM sqlite_master m \
    JOIN pragma_index_list(m.name) il \
    JOIN pragma_index_info(il.name) ii \
    WHERE m.type = 'table' AND il.\"unique\" = 1 AND il.origin <> 'pk' \
    ORDER BY m.name, il.name, ii.seqno";

const MYSQL_COLUMNS: &str = "\
    SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, DATA_TYPE AS column_type, \
           CAST(IS_NULLABLE = 'YES' AS SIGNED) AS nullable \
    FROM information_schema.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE()";

const MYSQL_UNIQUE: &str = "\
    SELECT TABLE_NAME AS table_name, INDEX_NAME AS index_name, COLUMN_NAME AS column_name \
    FROM information_schema.STATISTICS \
    WHERE TABLE_SCHEMA = DATABASE() AND NON_UNIQUE = 0 AND INDEX_NAME <> 'PRIMARY' \
    ORDER BY TABLE_NAME, INDEX_NAME, SEQ_IN_INDEX";

fn type_family(raw: &str) -> TypeFamily {
    let lower: String = raw.to_lowercase();
    if lower.contains("int") {
        TypeFamily::Integer
    } else if lower.contains("text") || lower.contains("char") {
        TypeFamily::Text
    } else {
        TypeFamily::Other
    }
}

fn build_schema(columns: Vec<ColumnRow>, unique: Vec<UniqueRow>) -> Schema {
    let mut schema: Schema = Schema::new();
    for row in columns {
        if row.table_name == MIGRATIONS_TABLE {
            continue;
        }
        schema.entry(row.table_name).or_default().columns.insert(
            row.column_name,
            Column {
                family: type_family(&row.column_type),
                nullable: row.nullable != 0,
            },
        );
    }

    // Rows arrive ordered by index, then position within the index.
    let mut indexes: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();
    for row in unique {
        if row.table_name == MIGRATIONS_TABLE {
            continue;
        }
        indexes
            .entry((row.table_name, row.index_name))
            .or_default()
            .push(row.column_name);
    }
    for ((table_name, _), index_columns) in indexes {
        schema
            .entry(table_name)
            .or_default()
            .unique
            .insert(index_columns);
    }
    schema
}

fn compare(sqlite: &Schema, mysql: &Schema) -> Vec<String> {
    let mut differences: Vec<String> = Vec::new();
    let table_names: BTreeSet<&String> = sqlite.keys().chain(mysql.keys()).collect();

    for name in table_names {
        let (Some(left), Some(right)) = (sqlite.get(name), mysql.get(name)) else {
            differences.push(format!("table '{name}' exists on only one backend"));
            continue;
        };

        let column_names: BTreeSet<&String> =
            left.columns.keys().chain(right.columns.keys()).collect();
        for column in column_names {
            match (left.columns.get(column), right.columns.get(column)) {
                (Some(l), Some(r)) if l == r => {}
                (Some(l), Some(r)) => differences.push(format!(
                    "{name}.{column}: sqlite {l:?} vs mysql {r:?}"
                )),
                _ => differences.push(format!("{name}.{column} exists on only one backend")),
            }
        }

        for columns in left.unique.symmetric_difference(&right.unique) {
            differences.push(format!(
                "{name}: unique index on ({}) exists on only one backend",
                columns.join(", ")
            ));
        }
    }
    differences
}
