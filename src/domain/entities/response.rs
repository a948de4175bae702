use actix_web::HttpResponse;
use serde::Serialize;

use crate::constants::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// `{"success": true, ...payload}`. The payload must serialize as a map.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(payload: T) -> Self {
        Self { success: true, payload }
    }

    pub fn ok(payload: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(payload))
    }

    pub fn created(payload: T) -> HttpResponse {
        HttpResponse::Created().json(Self::new(payload))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total_pages = ((total.max(0) as u64).div_ceil(per_page as u64)) as u32;
        Self { items, total, page, per_page, total_pages }
    }
}

/// Clamps optional `page`/`perPage` query values to usable bounds.
pub fn page_bounds(page: Option<u32>, per_page: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}
