// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::{net::Ipv4Addr, time::Duration};

use bson_entity::prelude::*;

#[derive(Record)]
pub struct Session {
    #[bson("_id")]
    pub id: i64,

    #[bson("ttl,omitempty")]
    pub ttl: Duration,

    #[bson("peer,omitempty", zero = "Ipv4Addr::is_unspecified")]
    pub peer: Ipv4Addr
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id:   0,
            ttl:  Duration::ZERO,
            peer: Ipv4Addr::UNSPECIFIED
        }
    }
}

fn main() {
    let entity = resolve(&Session::default()).unwrap();
    assert_eq!(entity.db_names(), ["_id", "ttl", "peer"]);
    assert!(Session::default().is_zero());
}
