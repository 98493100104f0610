// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use bson_entity::Record;

#[derive(Record)]
pub struct Wrapper<T> {
    #[bson("_id")]
    pub id: i64,
    pub value: T
}

fn main() {}
