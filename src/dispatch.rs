//! CLI argument parsing and extension-to-adapter resolution (§6).
//!
//! `clap` was a dev-dependency in the teacher (used only by its own example
//! binaries); here it's promoted to a real dependency since this crate's
//! reason to exist is the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use crate::errors::{DavError, DavResult};
use crate::fs::{csv_fs, html_fs, ini_fs, json_fs, mailbox_fs, osinfo, source_ast, sqlite_fs, tar_fs, toml_fs, xml_fs, zip_fs, Backend, BackendErr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Zip,
    Tar,
    Sqlite,
    Json,
    Csv,
    Ini,
    Xml,
    Toml,
    Html,
    Mailbox,
    PythonSource,
    OsInfo,
}

impl AdapterKind {
    pub fn parse_name(name: &str) -> Option<AdapterKind> {
        Some(match name.to_ascii_lowercase().as_str() {
            "zip" => AdapterKind::Zip,
            "tar" => AdapterKind::Tar,
            "sqlite" | "db" => AdapterKind::Sqlite,
            "json" => AdapterKind::Json,
            "csv" => AdapterKind::Csv,
            "ini" | "cfg" => AdapterKind::Ini,
            "xml" => AdapterKind::Xml,
            "toml" => AdapterKind::Toml,
            "html" | "htm" => AdapterKind::Html,
            "mailbox" | "mbox" => AdapterKind::Mailbox,
            "py" | "python" | "source" => AdapterKind::PythonSource,
            "osinfo" | "os" => AdapterKind::OsInfo,
            _ => return None,
        })
    }
}

/// Resolve a source path's extension to an adapter, per the extension map
/// (§6): `.zip→zip`, `.tar|.tar.gz|.tgz|.tar.bz2|.tar.xz→tar`,
/// `.sqlite|.db→sqlite`, `.json→json`, `.csv→csv`, `.ini|.cfg→ini`,
/// `.xml→xml`, `.toml→toml`, `.html|.htm→html`, `.mbox→mailbox`, `.py→ast`.
pub fn detect_from_path(path: &Path) -> Option<AdapterKind> {
    let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") || name.ends_with(".tar.bz2") || name.ends_with(".tar.xz") || name.ends_with(".tar") {
        return Some(AdapterKind::Tar);
    }
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "zip" => Some(AdapterKind::Zip),
        "sqlite" | "sqlite3" | "db" => Some(AdapterKind::Sqlite),
        "json" => Some(AdapterKind::Json),
        "csv" => Some(AdapterKind::Csv),
        "ini" | "cfg" => Some(AdapterKind::Ini),
        "xml" => Some(AdapterKind::Xml),
        "toml" => Some(AdapterKind::Toml),
        "html" | "htm" => Some(AdapterKind::Html),
        "mbox" => Some(AdapterKind::Mailbox),
        "py" => Some(AdapterKind::PythonSource),
        _ => None,
    }
}

pub fn build_backend(kind: AdapterKind, path: &Path) -> DavResult<Arc<dyn Backend>> {
    if kind == AdapterKind::OsInfo {
        return Ok(osinfo::new());
    }
    if kind == AdapterKind::Sqlite {
        return sqlite_fs::open_readonly(path);
    }

    let bytes = std::fs::read(path)?;
    match kind {
        AdapterKind::Zip => zip_fs::from_bytes(bytes),
        AdapterKind::Tar => {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            tar_fs::from_bytes(bytes, tar_fs::compression_for_name(&name))
        }
        AdapterKind::Json => json_fs::from_bytes(&bytes),
        AdapterKind::Csv => csv_fs::from_bytes(&bytes),
        AdapterKind::Ini => ini_fs::from_bytes(&bytes),
        AdapterKind::Xml => xml_fs::from_bytes(&bytes),
        AdapterKind::Toml => toml_fs::from_bytes(&bytes),
        AdapterKind::Html => html_fs::from_bytes(&bytes),
        AdapterKind::Mailbox => mailbox_fs::from_bytes(&bytes),
        AdapterKind::PythonSource => source_ast::from_bytes(&bytes),
        AdapterKind::Sqlite | AdapterKind::OsInfo => unreachable!("handled above"),
    }
}

/// Command line arguments (§6): `<program> <file> [-p PORT] [--host HOST]
/// [-t TYPE]`. `--type` overrides extension detection; required when
/// `source` has no recognised extension, and for `osinfo` (which has no
/// backing file at all, so `source` is ignored).
#[derive(Parser, Debug)]
#[command(name = "structdav", about = "Read-only WebDAV server over structured data files")]
pub struct Cli {
    /// Path to the structured data file to serve. Ignored for `--type osinfo`.
    pub source: Option<PathBuf>,

    /// Force the adapter instead of guessing from the file extension.
    #[arg(short = 't', long = "type")]
    pub r#type: Option<String>,

    /// Port to listen on.
    #[arg(short = 'p', long = "port", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

impl Cli {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn resolve_adapter(&self) -> DavResult<AdapterKind> {
        if let Some(t) = &self.r#type {
            return AdapterKind::parse_name(t)
                .ok_or_else(|| DavError::Backend(BackendErr::Failure(format!("unknown --type {t}"))));
        }
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| DavError::Backend(BackendErr::Failure("SOURCE or --type is required".to_string())))?;
        detect_from_path(source).ok_or_else(|| {
            DavError::Backend(BackendErr::Failure(format!(
                "cannot infer adapter from extension of {}; pass --type",
                source.display()
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_extensions() {
        assert_eq!(detect_from_path(Path::new("a.zip")), Some(AdapterKind::Zip));
        assert_eq!(detect_from_path(Path::new("a.tar.gz")), Some(AdapterKind::Tar));
        assert_eq!(detect_from_path(Path::new("a.tgz")), Some(AdapterKind::Tar));
        assert_eq!(detect_from_path(Path::new("a.db")), Some(AdapterKind::Sqlite));
        assert_eq!(detect_from_path(Path::new("a.py")), Some(AdapterKind::PythonSource));
    }

    #[test]
    fn unrecognised_extension_is_none() {
        assert_eq!(detect_from_path(Path::new("a.bin")), None);
    }

    #[test]
    fn type_override_wins_over_detection() {
        let cli = Cli {
            source: Some(PathBuf::from("a.bin")),
            r#type: Some("json".to_string()),
            port: 0,
            host: "127.0.0.1".to_string(),
        };
        assert_eq!(cli.resolve_adapter().unwrap(), AdapterKind::Json);
    }

    #[test]
    fn listen_addr_combines_host_and_port() {
        let cli = Cli {
            source: None,
            r#type: Some("osinfo".to_string()),
            port: 8080,
            host: "0.0.0.0".to_string(),
        };
        assert_eq!(cli.listen_addr(), "0.0.0.0:8080");
    }
}
