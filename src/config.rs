/// Process-wide account defaults, applied by the factories in
/// [`crate::identity`] when a request leaves an attribute unset.
///
/// Read-only after construction; pass by reference, never store globally.
#[derive(Debug, Clone)]
pub struct Defaults {
    /// Personal projects a new account may create.
    pub projects_limit: u32,
    /// Whether new accounts may create groups.
    pub can_create_group: bool,
    /// UI theme assigned to new accounts.
    pub theme_id: i32,
    /// Whether accounts may change their username after creation.
    pub username_changing_enabled: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            projects_limit: 10,
            can_create_group: true,
            theme_id: 1,
            username_changing_enabled: true,
        }
    }
}
