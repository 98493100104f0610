// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use bson_entity::Record;

#[derive(Record)]
pub struct Session {
    #[bson("ttl", empty = "Duration::is_zero")]
    pub ttl: std::time::Duration
}

fn main() {}
