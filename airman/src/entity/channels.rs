use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub is_live: bool,
    pub schedule_active: bool,
    pub status: String, // offline, ready, streaming
    pub hls_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for api::schedule::Channel {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            name: m.name,
            is_live: m.is_live,
            schedule_active: m.schedule_active,
            status: m.status,
            hls_url: m.hls_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
