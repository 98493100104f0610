// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use bson_entity::prelude::*;

#[derive(Record, Default)]
pub struct User {
    #[bson("_id")]
    pub id: i64,

    pub email: String,

    #[bson("active,omitempty")]
    pub is_active: bool
}

fn main() {
    let entity = resolve(&User::default()).unwrap();
    assert_eq!(entity.collection(), "user");
    assert_eq!(entity.primary_key_name(), "_id");
    assert_eq!(entity.db_names(), ["_id", "email", "active"]);
    assert!(entity.lookup_field("is_active").is_some());
}
