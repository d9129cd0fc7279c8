//! ClickStore implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use super::{SeaOrmStorage, classify_db_error};
use crate::storage::{Click, ClickStore, NewClick, StoreResult};

use migration::entities::click;

#[async_trait]
impl ClickStore for SeaOrmStorage {
    async fn create(&self, new_click: NewClick) -> StoreResult<Click> {
        let model = click::ActiveModel {
            link_id: Set(new_click.link_id),
            clicked_at: Set(new_click.timestamp),
            referrer: Set(new_click.referrer.clone()),
            user_agent: Set(new_click.user_agent.clone()),
            ip_address: Set(new_click.ip_address.clone()),
            ..Default::default()
        };

        let result = click::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "insert click"))?;

        Ok(Click {
            id: result.last_insert_id,
            link_id: new_click.link_id,
            timestamp: new_click.timestamp,
            referrer: new_click.referrer,
            user_agent: new_click.user_agent,
            ip_address: new_click.ip_address,
        })
    }

    async fn count_by_link_id(&self, link_id: i64) -> StoreResult<u64> {
        click::Entity::find()
            .filter(click::Column::LinkId.eq(link_id))
            .count(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "count clicks"))
    }
}
