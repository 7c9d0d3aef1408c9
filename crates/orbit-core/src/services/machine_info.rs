use std::process::Stdio;

use serde::Serialize;
use sysinfo::System;
use tokio::process::Command;

/// Host facts shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MachineInfo {
    pub hostname: String,
    pub os: String,
    pub architecture: String,
    pub uptime: String,
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub cpu_usage_percent: u32,
    /// Empty when no NVIDIA GPU (or `nvidia-smi`) is present.
    pub gpu_model: String,
    pub gpu_uses_percent: u32,
}

/// Collect [`MachineInfo`] off the async runtime (CPU usage needs two samples).
pub async fn gather() -> MachineInfo {
    let mut info = match tokio::task::spawn_blocking(collect).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, "machine info collection panicked");
            MachineInfo::default()
        }
    };
    if let Some((model, usage)) = query_gpu().await {
        info.gpu_model = model;
        info.gpu_uses_percent = usage;
    }
    info
}

/// Ask `nvidia-smi` for the first GPU's name and utilization.
async fn query_gpu() -> Option<(String, u32)> {
    let output = Command::new("nvidia-smi")
        .args([
            "--query-gpu=name,utilization.gpu",
            "--format=csv,noheader,nounits",
        ])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| tracing::debug!(error = %e, "nvidia-smi unavailable"))
        .ok()?;
    if !output.status.success() {
        tracing::debug!(code = ?output.status.code(), "nvidia-smi failed");
        return None;
    }
    parse_gpu_line(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `nvidia-smi` CSV output such as `NVIDIA GeForce RTX 3080, 14`.
/// Only the first line (first GPU) is used. An unparsable usage reads as 0.
fn parse_gpu_line(output: &str) -> Option<(String, u32)> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let (model, usage) = line.rsplit_once(',')?;
    let model = model.trim();
    if model.is_empty() {
        return None;
    }
    Some((model.to_string(), usage.trim().parse().unwrap_or(0)))
}

fn collect() -> MachineInfo {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();

    let cpus = sys.cpus();
    MachineInfo {
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        os: std::env::consts::OS.to_string(),
        architecture: std::env::consts::ARCH.to_string(),
        uptime: format_uptime(System::uptime()),
        cpu_model: cpus
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default(),
        cpu_cores: cpus.len(),
        cpu_usage_percent: sys.global_cpu_usage().clamp(0.0, 100.0) as u32,
        gpu_model: String::new(),
        gpu_uses_percent: 0,
    }
}

pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
