//! SQL schema for the CollegeSpace SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS universities (
    university_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    description   TEXT NOT NULL DEFAULT '',
    location      TEXT NOT NULL DEFAULT '',
    website       TEXT,
    image_url     TEXT,
    established   INTEGER,
    created_at    TEXT NOT NULL     -- RFC 3339 UTC, fixed microsecond width
);

CREATE TABLE IF NOT EXISTS branches (
    branch_id     TEXT PRIMARY KEY,
    university_id TEXT NOT NULL REFERENCES universities(university_id),
    name          TEXT NOT NULL,
    code          TEXT,
    description   TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS subjects (
    subject_id  TEXT PRIMARY KEY,
    branch_id   TEXT REFERENCES branches(branch_id),
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    semester    INTEGER NOT NULL CHECK (semester BETWEEN 1 AND 8),
    credits     INTEGER NOT NULL DEFAULT 3
);

-- `type` keeps the raw storage vocabulary ('pdf', 'question_paper', ...);
-- it is canonicalised on read.
CREATE TABLE IF NOT EXISTS resources (
    resource_id TEXT PRIMARY KEY,
    subject_id  TEXT NOT NULL REFERENCES subjects(subject_id),
    title       TEXT NOT NULL,
    description TEXT,
    type        TEXT NOT NULL DEFAULT 'pdf',
    file_url    TEXT,
    view_count  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS branches_university_idx ON branches(university_id);
CREATE INDEX IF NOT EXISTS subjects_semester_idx   ON subjects(semester);
CREATE INDEX IF NOT EXISTS resources_subject_idx   ON resources(subject_id);
CREATE INDEX IF NOT EXISTS resources_created_idx   ON resources(created_at);

PRAGMA user_version = 1;
";
