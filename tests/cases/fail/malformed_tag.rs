// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use bson_entity::Record;

#[derive(Record)]
pub struct User {
    #[bson("_id,name=")]
    pub id: i64
}

fn main() {}
