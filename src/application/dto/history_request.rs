// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQueryDto {
    pub limit: Option<usize>,
    pub category: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistorySearchDto {
    pub keyword: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
}
