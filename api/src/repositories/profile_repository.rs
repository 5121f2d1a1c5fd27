use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use shared::entity::profiles;
use shared::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<profiles::Model>, ServiceError> {
        let profile = profiles::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(profile)
    }

    pub async fn create(
        &self,
        active_model: profiles::ActiveModel,
    ) -> Result<profiles::Model, ServiceError> {
        let profile = active_model.insert(self.db.as_ref()).await?;
        Ok(profile)
    }

    pub async fn update(
        &self,
        active_model: profiles::ActiveModel,
    ) -> Result<profiles::Model, ServiceError> {
        let profile = active_model.update(self.db.as_ref()).await?;
        Ok(profile)
    }
}
