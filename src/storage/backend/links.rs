//! LinkStore implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use super::converters::link_from_model;
use super::{SeaOrmStorage, classify_db_error};
use crate::storage::{Link, LinkStore, NewLink, StoreError, StoreResult};

use migration::entities::link;

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn create(&self, new_link: NewLink) -> StoreResult<Link> {
        let model = link::ActiveModel {
            shortcode: Set(new_link.shortcode.clone()),
            long_url: Set(new_link.long_url.clone()),
            created_at: Set(new_link.created_at),
            ..Default::default()
        };

        let result = link::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "insert link"))?;

        debug!(
            "Link '{}' inserted into {} (id {})",
            new_link.shortcode,
            self.backend_name.to_uppercase(),
            result.last_insert_id
        );

        Ok(Link {
            id: result.last_insert_id,
            shortcode: new_link.shortcode,
            long_url: new_link.long_url,
            created_at: new_link.created_at,
        })
    }

    async fn find_by_shortcode(&self, code: &str) -> StoreResult<Link> {
        link::Entity::find()
            .filter(link::Column::Shortcode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "find link"))?
            .map(link_from_model)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn find_all(&self) -> StoreResult<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_asc(link::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "load links"))?;

        Ok(models.into_iter().map(link_from_model).collect())
    }
}
