// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::Deserialize;
use utoipa::IntoParams;

pub const ITEMS_PER_PAGE: usize = 10;

/// `?page=N`. Missing or unparseable values mean page 1.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        page_number(self.page.as_deref())
    }
}

pub fn page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|raw| raw.trim().parse().ok()).unwrap_or(1)
}

/// Items of page `page`; pages before the first are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let Some(index) = page
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
    else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(index.saturating_mul(ITEMS_PER_PAGE))
        .take(ITEMS_PER_PAGE)
        .collect()
}
