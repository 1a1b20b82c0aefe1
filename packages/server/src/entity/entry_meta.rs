use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_meta")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub entry_id: i32,
    #[sea_orm(belongs_to, from = "entry_id", to = "id")]
    pub entry: HasOne<super::entry::Entity>,

    pub meta_key: String,
    #[sea_orm(column_type = "Text")]
    pub meta_value: String,
}

impl ActiveModelBehavior for ActiveModel {}
