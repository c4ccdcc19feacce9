use serde::{Deserialize, Serialize};

/// Authenticated admin identity, used for audit stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
struct AdminAccount {
    username: String,
    password: String,
    identity: AdminIdentity,
}

/// Fixed directory of dashboard admins.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    accounts: Vec<AdminAccount>,
}

impl AdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. The identity name mirrors the username, matching
    /// what the login response reports back to the dashboard.
    pub fn with_account(
        mut self,
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        self.accounts.push(AdminAccount {
            identity: AdminIdentity {
                id: id.into(),
                name: username.clone(),
            },
            username,
            password: password.into(),
        });
        self
    }

    /// Load the two-admin directory from the environment
    /// (`ADMIN_USERNAME`/`ADMIN_PASSWORD`, `ADMIN2_USERNAME`/`ADMIN2_PASSWORD`).
    pub fn from_env() -> Self {
        Self::new()
            .with_account(
                "admin1",
                env_or_dev_default("ADMIN_USERNAME", "admin"),
                env_or_dev_default("ADMIN_PASSWORD", "admin123"),
            )
            .with_account(
                "admin2",
                env_or_dev_default("ADMIN2_USERNAME", "admin2"),
                env_or_dev_default("ADMIN2_PASSWORD", "admin234"),
            )
    }

    /// Check credentials; returns the matching identity on success.
    pub fn verify(&self, username: &str, password: &str) -> Option<AdminIdentity> {
        self.accounts
            .iter()
            .find(|a| a.username == username && a.password == password)
            .map(|a| a.identity.clone())
    }
}

fn env_or_dev_default(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        tracing::warn!("{key} not set; using insecure dev default");
        fallback.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> AdminDirectory {
        AdminDirectory::new()
            .with_account("admin1", "alice", "s3cret")
            .with_account("admin2", "bob", "hunter2")
    }

    #[test]
    fn verify_accepts_matching_credentials() {
        let identity = directory().verify("alice", "s3cret").unwrap();
        assert_eq!(identity.id, "admin1");
        assert_eq!(identity.name, "alice");
    }

    #[test]
    fn verify_matches_the_right_account() {
        let identity = directory().verify("bob", "hunter2").unwrap();
        assert_eq!(identity.id, "admin2");
    }

    #[test]
    fn verify_rejects_wrong_password() {
        assert!(directory().verify("alice", "hunter2").is_none());
    }

    #[test]
    fn verify_rejects_unknown_username() {
        assert!(directory().verify("mallory", "s3cret").is_none());
    }
}
