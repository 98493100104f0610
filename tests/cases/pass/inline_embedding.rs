// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use bson_entity::prelude::*;

#[derive(Record, Default)]
pub struct Audit {
    pub created_by: String,
    pub revision:   u32
}

#[derive(Record, Default)]
pub struct Invoice {
    #[bson("_id")]
    pub id: u64,

    #[bson(",inline")]
    pub audit: Audit,

    #[bson(",inline")]
    pub previous: Option<Box<Audit>>
}

fn main() {
    let mut invoice = Invoice::default();
    let entity = resolve(&invoice).unwrap();

    assert_eq!(entity.fields().len(), 3);
    assert_eq!(entity.all_fields().len(), 5);

    let revision = &entity.all_fields()[4];
    *revision.slot_as::<u32>(&mut invoice).unwrap() = 2;
    assert_eq!(invoice.previous.as_ref().map(|audit| audit.revision), Some(2));
}
