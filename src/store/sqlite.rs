use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory store; used by tests and embedded callers.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_state(s: &str) -> UserState {
    UserState::parse(s).unwrap_or_else(|| {
        tracing::error!("Invalid user state in database: '{}'", s);
        UserState::Active
    })
}

fn parse_access_level(v: i64) -> AccessLevel {
    AccessLevel::from_i64(v).unwrap_or_else(|| {
        tracing::error!("Invalid access level in database: {}", v);
        AccessLevel::Guest
    })
}

fn kind_to_str(kind: NamespaceKind) -> &'static str {
    match kind {
        NamespaceKind::User => "user",
        NamespaceKind::Group => "group",
    }
}

fn parse_kind(s: &str) -> NamespaceKind {
    match s {
        "group" => NamespaceKind::Group,
        "user" => NamespaceKind::User,
        other => {
            tracing::error!("Invalid namespace kind in database: '{}'", other);
            NamespaceKind::User
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, name, state, admin, projects_limit, \
     can_create_group, theme_id, created_by_id, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        state: parse_state(&row.get::<_, String>(4)?),
        admin: row.get(5)?,
        projects_limit: row.get(6)?,
        can_create_group: row.get(7)?,
        theme_id: row.get(8)?,
        created_by_id: row.get(9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?),
        updated_at: parse_datetime(&row.get::<_, String>(11)?),
    })
}

fn namespace_from_row(row: &Row<'_>) -> rusqlite::Result<Namespace> {
    Ok(Namespace {
        id: row.get(0)?,
        name: row.get(1)?,
        path: row.get(2)?,
        kind: parse_kind(&row.get::<_, String>(3)?),
        owner_id: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        namespace_id: row.get(1)?,
        name: row.get(2)?,
        path: row.get(3)?,
        created_by_id: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        namespace_id: row.get(1)?,
        name: row.get(2)?,
        creator_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

/// Builds "?1, ?2, ..." for a dynamic IN clause.
fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user_with_namespace(&self, user: &User, ns: &Namespace) -> Result<UserId> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO users (username, email, name, state, admin, projects_limit,
                                can_create_group, theme_id, created_by_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                user.username,
                user.email,
                user.name,
                user.state.as_str(),
                user.admin,
                user.projects_limit,
                user.can_create_group,
                user.theme_id,
                user.created_by_id,
                format_datetime(&user.created_at),
                format_datetime(&user.updated_at),
            ],
        )?;
        let user_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO namespaces (name, path, kind, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                ns.name,
                ns.path,
                kind_to_str(ns.kind),
                user_id,
                format_datetime(&ns.created_at),
            ],
        )?;

        tx.commit()?;
        Ok(user_id)
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(username) = LOWER(?1)"),
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE LOWER(email) = LOWER(?1) OR LOWER(username) = LOWER(?1)
                 ORDER BY id LIMIT 1"
            ),
            params![login],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET username = ?1, email = ?2, name = ?3, state = ?4, admin = ?5,
                              projects_limit = ?6, can_create_group = ?7, theme_id = ?8,
                              updated_at = ?9
             WHERE id = ?10",
            params![
                user.username,
                user.email,
                user.name,
                user.state.as_str(),
                user.admin,
                user.projects_limit,
                user.can_create_group,
                user.theme_id,
                format_datetime(&Utc::now()),
                user.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_user_state(&self, id: UserId, state: UserState) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET state = ?1, updated_at = ?2 WHERE id = ?3",
            params![state.as_str(), format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Namespace operations

    fn create_namespace(&self, ns: &Namespace) -> Result<NamespaceId> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO namespaces (name, path, kind, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                ns.name,
                ns.path,
                kind_to_str(ns.kind),
                ns.owner_id,
                format_datetime(&ns.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_namespace(&self, id: NamespaceId) -> Result<Option<Namespace>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, path, kind, owner_id, created_at FROM namespaces WHERE id = ?1",
            params![id],
            namespace_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_namespace_by_path(&self, path: &str) -> Result<Option<Namespace>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, path, kind, owner_id, created_at
             FROM namespaces WHERE LOWER(path) = LOWER(?1)",
            params![path],
            namespace_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_personal_namespace(&self, owner_id: UserId) -> Result<Option<Namespace>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, path, kind, owner_id, created_at
             FROM namespaces WHERE owner_id = ?1 AND kind = 'user'",
            params![owner_id],
            namespace_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_owned_namespaces(&self, owner_id: UserId) -> Result<Vec<Namespace>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, path, kind, owner_id, created_at
             FROM namespaces WHERE owner_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![owner_id], namespace_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_namespace(&self, ns: &Namespace) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE namespaces SET name = ?1, path = ?2, owner_id = ?3 WHERE id = ?4",
            params![ns.name, ns.path, ns.owner_id, ns.id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_namespace(&self, id: NamespaceId) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM namespaces WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Group operations

    fn create_group(&self, group: &Group) -> Result<GroupId> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO groups (namespace_id, name, path, created_by_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                group.namespace_id,
                group.name,
                group.path,
                group.created_by_id,
                format_datetime(&group.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_group(&self, id: GroupId) -> Result<Option<Group>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, namespace_id, name, path, created_by_id, created_at
             FROM groups WHERE id = ?1",
            params![id],
            group_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_group_by_namespace(&self, namespace_id: NamespaceId) -> Result<Option<Group>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, namespace_id, name, path, created_by_id, created_at
             FROM groups WHERE namespace_id = ?1",
            params![namespace_id],
            group_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_groups_owned_by(&self, owner_id: UserId) -> Result<Vec<Group>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT g.id, g.namespace_id, g.name, g.path, g.created_by_id, g.created_at
             FROM groups g
             JOIN namespaces n ON n.id = g.namespace_id
             WHERE n.owner_id = ?1
             ORDER BY g.id",
        )?;

        let rows = stmt.query_map(params![owner_id], group_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_groups_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn();
        let sql = format!(
            "SELECT id, namespace_id, name, path, created_by_id, created_at
             FROM groups WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(ids.iter()), group_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Group membership operations

    fn add_group_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
        access_level: AccessLevel,
    ) -> Result<MembershipId> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO group_memberships (user_id, group_id, access_level, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                group_id,
                access_level.as_i64(),
                format_datetime(&Utc::now()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list_group_memberships_for_user(&self, user_id: UserId) -> Result<Vec<GroupMembership>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, group_id, access_level, created_at
             FROM group_memberships WHERE user_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok(GroupMembership {
                id: row.get(0)?,
                user_id: row.get(1)?,
                group_id: row.get(2)?,
                access_level: parse_access_level(row.get(3)?),
                created_at: parse_datetime(&row.get::<_, String>(4)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_group_owners(&self, group_id: GroupId) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM group_memberships WHERE group_id = ?1 AND access_level = ?2",
            params![group_id, AccessLevel::Owner.as_i64()],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    fn delete_group_membership(&self, id: MembershipId) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM group_memberships WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Project operations

    fn create_project(&self, project: &Project) -> Result<ProjectId> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO projects (namespace_id, name, creator_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                project.namespace_id,
                project.name,
                project.creator_id,
                format_datetime(&project.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, namespace_id, name, creator_id, created_at FROM projects WHERE id = ?1",
            params![id],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_projects_in_namespace(&self, namespace_id: NamespaceId) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, namespace_id, name, creator_id, created_at
             FROM projects WHERE namespace_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![namespace_id], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_projects_created_by(&self, creator_id: UserId) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, namespace_id, name, creator_id, created_at
             FROM projects WHERE creator_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![creator_id], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_projects_by_ids(&self, ids: &[ProjectId]) -> Result<Vec<Project>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn();
        let sql = format!(
            "SELECT id, namespace_id, name, creator_id, created_at
             FROM projects WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(ids.iter()), project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Project membership operations

    fn add_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        access_level: AccessLevel,
    ) -> Result<MembershipId> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO project_memberships (user_id, project_id, access_level, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                project_id,
                access_level.as_i64(),
                format_datetime(&Utc::now()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list_project_memberships_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ProjectMembership>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, project_id, access_level, created_at
             FROM project_memberships WHERE user_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok(ProjectMembership {
                id: row.get(0)?,
                user_id: row.get(1)?,
                project_id: row.get(2)?,
                access_level: parse_access_level(row.get(3)?),
                created_at: parse_datetime(&row.get::<_, String>(4)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_project_membership(&self, id: MembershipId) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM project_memberships WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}
