pub const SCHEMA: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    name TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'active',
    admin INTEGER NOT NULL DEFAULT 0,
    projects_limit INTEGER NOT NULL DEFAULT 10 CHECK (projects_limit >= 0),
    can_create_group INTEGER NOT NULL DEFAULT 1,
    theme_id INTEGER NOT NULL DEFAULT 1,

    -- Who provisioned the account (informational, not ownership)
    created_by_id INTEGER REFERENCES users(id) ON DELETE SET NULL,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Namespaces: one personal ('user') namespace per account, plus one per group.
-- Paths share the username space, so both are kept unique case-insensitively.
CREATE TABLE IF NOT EXISTS namespaces (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('user', 'group')),

    -- Personal namespaces die with their owner; group namespaces are orphaned.
    owner_id INTEGER REFERENCES users(id) ON DELETE SET NULL,

    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS groups (
    id INTEGER PRIMARY KEY,
    namespace_id INTEGER NOT NULL UNIQUE REFERENCES namespaces(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    created_by_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    namespace_id INTEGER NOT NULL REFERENCES namespaces(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    creator_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(namespace_id, name)
);

-- Membership join records carry the access level that decides whether the
-- block cascade may remove them.
CREATE TABLE IF NOT EXISTS group_memberships (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_id INTEGER NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    access_level INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(user_id, group_id)
);

CREATE TABLE IF NOT EXISTS project_memberships (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    access_level INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(user_id, project_id)
);

-- Create indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(LOWER(username));
CREATE UNIQUE INDEX IF NOT EXISTS idx_namespaces_path ON namespaces(LOWER(path));
CREATE INDEX IF NOT EXISTS idx_users_email ON users(LOWER(email));
CREATE INDEX IF NOT EXISTS idx_namespaces_owner ON namespaces(owner_id);
CREATE INDEX IF NOT EXISTS idx_projects_namespace ON projects(namespace_id);
CREATE INDEX IF NOT EXISTS idx_group_memberships_user ON group_memberships(user_id);
CREATE INDEX IF NOT EXISTS idx_group_memberships_group ON group_memberships(group_id);
CREATE INDEX IF NOT EXISTS idx_project_memberships_user ON project_memberships(user_id);
CREATE INDEX IF NOT EXISTS idx_project_memberships_project ON project_memberships(project_id);
"#;
