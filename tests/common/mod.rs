//! Common test utilities for appstow integration tests

#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use appstow::error::transform_failed;
use appstow::{InstallPipeline, Store, Transformer};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Manifest text for a package
pub fn manifest(name: &str, vendor: &str, version: &str) -> String {
    format!(
        "Manifest-Version: 1.0\n\
         MIDlet-Name: {name}\n\
         MIDlet-Vendor: {vendor}\n\
         MIDlet-Version: {version}\n\
         MIDlet-1: {name}, /icon.png, com.example.{name}\n\
         MicroEdition-Profile: MIDP-2.0\n"
    )
}

/// Transformer that copies the archive as the executable
pub fn copy_transform(input: &Path, output: &Path) -> appstow::Result<()> {
    fs::copy(input, output)?;
    Ok(())
}

/// Transformer that always fails, as if the bytecode were rejected
pub fn failing_transform(_input: &Path, _output: &Path) -> appstow::Result<()> {
    Err(transform_failed("simulated rejection"))
}

/// Build a zip archive with an embedded manifest and extra entries
pub fn write_archive(path: &Path, manifest: &str, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create archive directory");
    }
    let file = fs::File::create(path).expect("Failed to create archive");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.start_file("META-INF/MANIFEST.MF", options)
        .expect("Failed to start manifest entry");
    zip.write_all(manifest.as_bytes())
        .expect("Failed to write manifest");
    for (name, content) in entries {
        zip.start_file(*name, options).expect("Failed to start entry");
        zip.write_all(content).expect("Failed to write entry");
    }
    zip.finish().expect("Failed to finish archive");
}

/// A scratch area holding packages, a store and a payload cache
pub struct TestEnv {
    pub temp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { temp, root }
    }

    pub fn store_root(&self) -> PathBuf {
        self.root.join("store")
    }

    pub fn cache_root(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn payload_dir(&self) -> PathBuf {
        appstow::cache::payloads_dir(&self.cache_root())
    }

    pub fn packages(&self) -> PathBuf {
        let dir = self.root.join("packages");
        fs::create_dir_all(&dir).expect("Failed to create packages directory");
        dir
    }

    pub fn store(&self) -> Store {
        Store::open(self.store_root()).expect("Failed to open store")
    }

    /// Pipeline with a copying transformer
    pub fn pipeline(&self) -> InstallPipeline {
        self.pipeline_with(copy_transform)
    }

    pub fn pipeline_with(&self, transformer: impl Transformer + 'static) -> InstallPipeline {
        InstallPipeline::new(self.store(), transformer)
            .expect("Failed to create pipeline")
            .with_payload_dir(self.payload_dir())
    }

    /// Write `packages/<file>` as an archive for the given identity
    pub fn archive(&self, file: &str, name: &str, vendor: &str, version: &str) -> PathBuf {
        let path = self.packages().join(file);
        write_archive(
            &path,
            &manifest(name, vendor, version),
            &[("icon.png", b"\x89PNG"), ("com/example/Main.class", b"\xca\xfe\xba\xbe")],
        );
        path
    }

    /// Write `packages/<file>` as a standalone descriptor
    pub fn descriptor(
        &self,
        file: &str,
        name: &str,
        vendor: &str,
        version: &str,
        jar_url: &str,
    ) -> PathBuf {
        let path = self.packages().join(file);
        let text = format!(
            "MIDlet-Name: {name}\r\n\
             MIDlet-Vendor: {vendor}\r\n\
             MIDlet-Version: {version}\r\n\
             MIDlet-Jar-URL: {jar_url}\r\n\
             MIDlet-Jar-Size: 1234\r\n\
             MIDlet-Description: {name} by {vendor}\r\n"
        );
        fs::write(&path, text).expect("Failed to write descriptor");
        path
    }

    /// Write a settings file naming `program` as the transformer
    pub fn config(&self, program: &str, args: &[&str]) -> PathBuf {
        let path = self.root.join("config.yaml");
        let args = args
            .iter()
            .map(|a| format!("\"{a}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let yaml = format!(
            "store_root: {}\ncache_dir: {}\ntransformer:\n  program: {program}\n  args: [{args}]\n",
            self.store_root().display(),
            self.cache_root().display()
        );
        fs::write(&path, yaml).expect("Failed to write config");
        path
    }

    /// Hidden (staging or retired) entries in the applications root
    pub fn hidden_app_entries(&self) -> Vec<String> {
        let apps = self.store_root().join("apps");
        if !apps.is_dir() {
            return Vec::new();
        }
        fs::read_dir(apps)
            .expect("Failed to read apps directory")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .filter(|n| appstow::store::is_transient(n))
            .collect()
    }

    /// Names of files in the payload cache
    pub fn cached_payloads(&self) -> Vec<String> {
        let dir = self.payload_dir();
        if !dir.is_dir() {
            return Vec::new();
        }
        fs::read_dir(dir)
            .expect("Failed to read payload cache")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect()
    }
}

/// Snapshot of every file below `dir` as (relative path, content)
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(dir)
                .expect("prefix")
                .to_string_lossy()
                .into_owned();
            (rel, fs::read(e.path()).expect("Failed to read file"))
        })
        .collect();
    files.sort();
    files
}

/// Canned response of the loopback HTTP server
#[derive(Debug, Clone)]
pub enum Reply {
    Body(Vec<u8>),
    Redirect(String),
    Status(u16),
    /// Declares more bytes than it sends
    Truncated(Vec<u8>),
}

/// Minimal HTTP/1.1 responder on 127.0.0.1 serving fixed routes
pub struct TestServer {
    pub addr: SocketAddr,
}

impl TestServer {
    pub fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read server address");
        let routes: Arc<Vec<(String, Reply)>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let routes = Arc::clone(&routes);
                std::thread::spawn(move || handle(stream, &routes));
            }
        });
        Self { addr }
    }

    /// Absolute URL of `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

fn handle(mut stream: TcpStream, routes: &[(String, Reply)]) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let reply = routes
        .iter()
        .find(|(p, _)| *p == path)
        .map_or(Reply::Status(404), |(_, r)| r.clone());

    let (head, body) = match reply {
        Reply::Body(body) => (
            format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n", body.len()),
            body,
        ),
        Reply::Redirect(location) => (
            format!("HTTP/1.1 302 Found\r\nLocation: {location}\r\nContent-Length: 0\r\n"),
            Vec::new(),
        ),
        Reply::Status(code) => (
            format!("HTTP/1.1 {code} Status\r\nContent-Length: 0\r\n"),
            Vec::new(),
        ),
        Reply::Truncated(body) => (
            format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n", body.len() + 100),
            body,
        ),
    };
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(b"Connection: close\r\n\r\n");
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}
