use async_trait::async_trait;
use labwise_core::errors::LabResult;
use labwise_core::models::{Role, SlotRecord, Timetable, TimetableKey};
use labwise_core::store::TimetableStore;
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbSession, DbUser};

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            email: &'static str,
            name: &'static str,
            password_hash: &'static str,
            role: Role,
        ) -> eyre::Result<DbUser>;

        pub async fn verify_credentials(
            &self,
            email: &'static str,
            password: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn create_session(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<DbSession>;

        pub async fn get_session_user(
            &self,
            token: Uuid,
        ) -> eyre::Result<Option<(Uuid, Role)>>;
    }
}

// Mock of the persistence collaborator the scheduling engine drives
mock! {
    pub Store {}

    #[async_trait]
    impl TimetableStore for Store {
        async fn find(&self, key: &TimetableKey) -> LabResult<Option<Timetable>>;
        async fn delete(&self, id: Uuid) -> LabResult<()>;
        async fn create(&self, key: &TimetableKey, slots: &[SlotRecord]) -> LabResult<Timetable>;
    }
}
