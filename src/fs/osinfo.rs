//! OS info backend (§4.2, §9): a synthetic tree of host facts, re-sampled
//! on every `get()` rather than snapshotted once at construction — unlike
//! every other adapter, there's no underlying file to parse, so "the
//! index" and "the live system" are the same thing.

use std::sync::Arc;
use std::time::SystemTime;

use sysinfo::System;

use crate::fs::{Backend, BackendErr, BackendResult, ResourceInfo};

const FIELDS: &[&str] = &[
    "hostname",
    "kernel_version",
    "os_version",
    "uptime_seconds",
    "cpu_count",
    "total_memory_bytes",
    "used_memory_bytes",
];

pub struct OsInfoBackend;

pub fn new() -> Arc<dyn Backend> {
    Arc::new(OsInfoBackend)
}

fn field_value(field: &str) -> Option<String> {
    match field {
        "hostname" => System::host_name(),
        "kernel_version" => System::kernel_version(),
        "os_version" => System::os_version(),
        "uptime_seconds" => Some(System::uptime().to_string()),
        "cpu_count" => {
            let mut sys = System::new();
            sys.refresh_cpu_all();
            Some(sys.cpus().len().to_string())
        }
        "total_memory_bytes" => {
            let mut sys = System::new();
            sys.refresh_memory();
            Some(sys.total_memory().to_string())
        }
        "used_memory_bytes" => {
            let mut sys = System::new();
            sys.refresh_memory();
            Some(sys.used_memory().to_string())
        }
        _ => None,
    }
}

impl Backend for OsInfoBackend {
    fn info(&self, path: &[String]) -> BackendResult<ResourceInfo> {
        match path {
            [] => Ok(ResourceInfo::directory(SystemTime::now())),
            [name] if name == "environment" => Ok(ResourceInfo::directory(SystemTime::now())),
            [name] if FIELDS.contains(&name.as_str()) => {
                let value = field_value(name).unwrap_or_default();
                Ok(ResourceInfo::file(value.len() as u64, SystemTime::now(), "text/plain"))
            }
            [env, key] if env == "environment" => {
                let value = std::env::var(key).map_err(|_| BackendErr::NotFound)?;
                Ok(ResourceInfo::file(value.len() as u64, SystemTime::now(), "text/plain"))
            }
            _ => Err(BackendErr::NotFound),
        }
    }

    fn list(&self, path: &[String]) -> BackendResult<Vec<String>> {
        match path {
            [] => {
                let mut names: Vec<String> = FIELDS.iter().map(|s| s.to_string()).collect();
                names.push("environment".to_string());
                Ok(names)
            }
            [name] if name == "environment" => Ok(std::env::vars().map(|(k, _)| k).collect()),
            _ => Err(BackendErr::NotFound),
        }
    }

    fn get(&self, path: &[String]) -> BackendResult<Vec<u8>> {
        match path {
            [name] if FIELDS.contains(&name.as_str()) => Ok(field_value(name).unwrap_or_default().into_bytes()),
            [env, key] if env == "environment" => {
                std::env::var(key).map(String::into_bytes).map_err(|_| BackendErr::NotFound)
            }
            _ => Err(BackendErr::NotFound),
        }
    }

    fn name(&self) -> &'static str {
        "osinfo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_lists_fixed_fields_plus_environment() {
        let b = new();
        let children = b.list(&[]).unwrap();
        assert!(children.contains(&"hostname".to_string()));
        assert!(children.contains(&"environment".to_string()));
    }

    #[test]
    fn environment_lists_process_env_vars() {
        std::env::set_var("STRUCTDAV_TEST_VAR", "xyz");
        let b = new();
        let data = b.get(&["environment".to_string(), "STRUCTDAV_TEST_VAR".to_string()]).unwrap();
        assert_eq!(data, b"xyz");
    }

    #[test]
    fn unknown_field_is_not_found() {
        let b = new();
        assert!(matches!(b.info(&["nope".to_string()]), Err(BackendErr::NotFound)));
    }
}
