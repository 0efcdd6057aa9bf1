use async_trait::async_trait;
use roster_core::AppResult;
use roster_domain::UserServices;

/// Store acknowledgement for one user services write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    /// Key the aggregate was written under.
    pub user_id: String,
    /// True when no prior value existed for the key.
    pub created: bool,
}

/// Repository port for the per-user services table.
#[async_trait]
pub trait UserServicesRepository: Send + Sync {
    /// Upserts the aggregate keyed by `user_id`.
    ///
    /// The stored service list is fully replaced; the last writer wins.
    async fn write_user_services(
        &self,
        user_services: &UserServices,
    ) -> AppResult<WriteAcknowledgement>;

    /// Returns the stored aggregate for a user.
    async fn find_user_services(&self, user_id: &str) -> AppResult<Option<UserServices>>;
}
