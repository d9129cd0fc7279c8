use crate::storage::Link;
use migration::entities::link;

/// 将 Sea-ORM Model 转换为 Link
pub fn link_from_model(model: link::Model) -> Link {
    Link {
        id: model.id,
        shortcode: model.shortcode,
        long_url: model.long_url,
        created_at: model.created_at,
    }
}
