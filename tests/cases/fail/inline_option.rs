// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use bson_entity::Record;

#[derive(Record)]
pub struct Customer {
    #[bson(",inline")]
    pub shipping: Option<Address>
}

#[derive(Record, Default)]
pub struct Address {
    pub city: String
}

fn main() {}
