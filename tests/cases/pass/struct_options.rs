// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::sync::Mutex;

use bson_entity::prelude::*;

#[derive(Record, Default)]
#[bson(collection = "order_lines", rename_all = "camelCase")]
pub struct OrderLine {
    #[bson("_id")]
    pub id: String,

    pub unit_price: f64,

    pub r#type: String,

    #[bson("-")]
    pub scratch: Mutex<Vec<u8>>
}

fn main() {
    let entity = resolve(&vec![OrderLine::default()]).unwrap();
    assert_eq!(entity.collection(), "order_lines");
    assert_eq!(entity.db_names(), ["_id", "unitPrice", "type"]);
    assert!(entity.lookup_field("scratch").is_none());
}
