use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::Duration,
};
use sysinfo::System;

use crate::{constants::START_TIME, AppState};

const CACHE_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct HealthCheckResponse {
    success: bool,
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    storage: String,
    storage_status: String,
    tracked_submitters: usize,
    version: String,
    memory_usage: String,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(|| RwLock::new(HealthCheckResponse::default()));

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let mut sys = System::new_all();
    sys.refresh_all();

    let system = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let storage_status = match state.storage.check_connection().await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            "Unavailable"
        }
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or("Unknown".to_string(), |p| format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0));

    HealthCheckResponse {
        success: true,
        status: if storage_status == "OK" { "healthy" } else { "degraded" }.to_string(),
        uptime: format_duration(Duration::from_secs(uptime)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        storage: state.storage.kind().to_string(),
        storage_status: storage_status.to_string(),
        tracked_submitters: state.limiter.tracked_keys(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        system,
    }
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > CACHE_SECS {
        let response = build_health_response(&state).await;
        *CACHED_STATUS.write() = response.clone();
        LAST_CHECK.store(now, Ordering::Relaxed);
        return HttpResponse::Ok().json(response);
    }

    HttpResponse::Ok().json(CACHED_STATUS.read().clone())
}
