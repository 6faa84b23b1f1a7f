//! Member entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Member.
impl From<Model> for photogram_core::domain::Member {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            password_hash: model.password_hash,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Member to SeaORM ActiveModel.
impl From<photogram_core::domain::Member> for ActiveModel {
    fn from(member: photogram_core::domain::Member) -> Self {
        Self {
            id: Set(member.id),
            name: Set(member.name),
            password_hash: Set(member.password_hash),
            created_at: Set(member.created_at.into()),
            updated_at: Set(member.updated_at.into()),
        }
    }
}
