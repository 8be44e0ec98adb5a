// src/services/admin_session.rs
use crate::errors::VisionRankError;
use crate::services::kv_store::{ADMIN_STATUS_KEY, KeyValueStore};
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Curator mode flag. A UI gate with a fixed password, not access control.
pub struct AdminSession {
    kv: Arc<dyn KeyValueStore>,
    password: String,
    elevated: AtomicBool,
}

impl AdminSession {
    pub async fn restore(
        kv: Arc<dyn KeyValueStore>,
        password: String,
    ) -> Result<Self, VisionRankError> {
        let elevated = kv.get(ADMIN_STATUS_KEY).await?.as_deref() == Some("true");
        Ok(Self {
            kv,
            password,
            elevated: AtomicBool::new(elevated),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.elevated.load(Ordering::SeqCst)
    }

    /// Enters curator mode when `password` matches. Returns whether it did.
    pub async fn login(&self, password: &str) -> Result<bool, VisionRankError> {
        if password != self.password {
            return Ok(false);
        }
        self.elevated.store(true, Ordering::SeqCst);
        self.kv.set(ADMIN_STATUS_KEY, "true").await?;
        info!("Curator mode enabled");
        Ok(true)
    }

    pub async fn logout(&self) -> Result<(), VisionRankError> {
        self.elevated.store(false, Ordering::SeqCst);
        self.kv.set(ADMIN_STATUS_KEY, "false").await?;
        info!("Curator mode disabled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::kv_store::MemoryStore;

    async fn session(kv: Arc<MemoryStore>) -> AdminSession {
        AdminSession::restore(kv, "admin".to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn wrong_password_keeps_session_plain() {
        let kv = Arc::new(MemoryStore::new());
        let admin = session(kv.clone()).await;

        assert!(!admin.login("letmein").await.unwrap());
        assert!(!admin.is_admin());
        assert_eq!(kv.get(ADMIN_STATUS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_persists_and_restores() {
        let kv = Arc::new(MemoryStore::new());
        let admin = session(kv.clone()).await;

        assert!(admin.login("admin").await.unwrap());
        assert!(admin.is_admin());
        assert!(session(kv.clone()).await.is_admin());

        admin.logout().await.unwrap();
        assert!(!admin.is_admin());
        assert_eq!(kv.get(ADMIN_STATUS_KEY).await.unwrap().as_deref(), Some("false"));
        assert!(!session(kv).await.is_admin());
    }
}
