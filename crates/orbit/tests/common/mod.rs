#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use orbit_core::models::{OrbitConfig, ProjectConfig};
use orbit_core::services::{
    CommandRunner, ConfigStore, CycleSettings, DeployManager, DeploymentCycle, HealthCheck,
    LoadProbe, StatusRegistry,
};

pub const SECRET: &str = "s3cret";

/// Reports the same load average forever.
pub struct StaticProbe(pub f64);

impl LoadProbe for StaticProbe {
    fn current_load(&self) -> f64 {
        self.0
    }
}

/// Succeeds at everything and remembers what it was asked to run.
#[derive(Default)]
pub struct NoopRunner {
    calls: Mutex<Vec<String>>,
}

impl NoopRunner {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for NoopRunner {
    async fn run(&self, _dir: &Path, program: &str, args: &[&str]) -> orbit_core::Result<()> {
        let mut call = program.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheck for AlwaysHealthy {
    async fn check(&self, _url: &str, _timeout: Duration) -> orbit_core::Result<()> {
        Ok(())
    }
}

pub fn project(path: &str) -> ProjectConfig {
    ProjectConfig {
        path: path.to_string(),
        branch: "main".into(),
        build_cmd: "make".into(),
        restart_cmd: "systemctl restart app".into(),
        binary_name: "app".into(),
        health_url: "http://127.0.0.1:1/health".into(),
    }
}

/// Config with `api` and `web`, both rooted in `dir`.
pub fn config_in(dir: &Path) -> OrbitConfig {
    let path = dir.to_string_lossy().into_owned();
    let mut config = OrbitConfig {
        port: 8080,
        secret: SECRET.into(),
        ..Default::default()
    };
    config.projects.insert("web".into(), project(&path));
    config.projects.insert("api".into(), project(&path));
    config
}

pub struct Harness {
    pub router: axum::Router,
    pub manager: Arc<DeployManager>,
    pub runner: Arc<NoopRunner>,
}

/// Manager wired to fakes. Above-threshold `load` parks every cycle in
/// Cooling Check.
pub fn harness(config: OrbitConfig, load: f64, store: Option<ConfigStore>) -> Harness {
    let runner = Arc::new(NoopRunner::default());
    let cycle = DeploymentCycle::new(
        StatusRegistry::new(),
        Arc::new(StaticProbe(load)),
        runner.clone(),
        Arc::new(AlwaysHealthy),
    )
    .with_settings(CycleSettings {
        cooling_interval: Duration::from_millis(20),
        grace_period: Duration::from_millis(1),
        health_timeout: Duration::from_millis(100),
        ..CycleSettings::default()
    });
    let mut manager = DeployManager::new(config, cycle);
    if let Some(store) = store {
        manager = manager.with_store(store);
    }
    let manager = Arc::new(manager);
    Harness {
        router: orbit::build_router(manager.clone()),
        manager,
        runner,
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub text: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.text).unwrap_or(serde_json::Value::Null)
    }
}

/// Send `req` via `oneshot` and collect the whole reply.
pub async fn send(app: &axum::Router, req: Request<Body>) -> Reply {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get("location")
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    Reply {
        status,
        location,
        text: String::from_utf8_lossy(&body).into_owned(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// JSON request, carrying the secret header when `secret` is set.
pub fn json(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    secret: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-orbit-secret", secret);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn with_secret(method: &str, uri: &str, secret: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-orbit-secret", secret)
        .body(Body::empty())
        .unwrap()
}

/// Poll until `name` is back to Idle.
pub async fn wait_idle(manager: &DeployManager, name: &str) {
    for _ in 0..200 {
        if manager
            .registry()
            .get(name)
            .is_some_and(|s| s.status.is_idle())
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{name} never returned to idle");
}
