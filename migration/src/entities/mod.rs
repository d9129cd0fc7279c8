pub mod click;
pub mod link;

pub use click::Entity as ClickEntity;
pub use link::Entity as LinkEntity;
