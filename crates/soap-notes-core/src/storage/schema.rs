//! SQLite schema definition.

/// Schema for the durable key-value slots.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-value slots
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- whole JSON document
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
