//! SQL schema for the Astra SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- trimmed, lower-cased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Only a SHA-256 digest of each bearer token is stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash  TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

-- At most one profile per user; the role column is never updated.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY REFERENCES users(user_id),
    email       TEXT NOT NULL,
    role        TEXT NOT NULL,   -- 'child' | 'parent'
    name        TEXT,
    age         INTEGER,
    interests   TEXT,            -- JSON array of strings or NULL
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS progress (
    user_id       TEXT PRIMARY KEY REFERENCES users(user_id),
    progress_json TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS sessions_user_idx ON sessions(user_id);

PRAGMA user_version = 1;
";
