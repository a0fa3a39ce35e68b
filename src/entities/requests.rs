use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub anime_name: String,
    #[sea_orm(default_value = 1)]
    pub votes: i32,
    #[sea_orm(default_value = "Pending")]
    pub status: String,
    #[sea_orm(default_value = 0)]
    pub total_episodes: i32,
    #[sea_orm(default_value = 0)]
    pub uploaded_episodes: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote_logs::Entity")]
    VoteLogs,
}

impl Related<super::vote_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoteLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
