//! Shared test doubles for the artwork integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bridge_traits::content::ContentResolver;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::fs::{FileMetadata, FileSystemAccess};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::network::{ConnectivityProbe, NetworkInfo, NetworkType};
use bridge_traits::settings::SettingsStore;

use core_artwork::{ArtworkConfig, ArtworkCoordinator, ArtworkFetcher};

/// Encoded PNG bytes usable as fake artwork payloads.
pub fn encoded_png(width: u32, height: u32) -> Bytes {
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([200, 60, 20]),
    ));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    Bytes::from(buffer)
}

struct Route {
    pattern: String,
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

/// HTTP client scripted with substring-matched routes. Unmatched URLs
/// answer 404. Every executed URL is recorded for assertions.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, pattern: &str, status: u16, body: impl Into<Bytes>) {
        self.routes.lock().unwrap().push(Route {
            pattern: pattern.to_string(),
            status,
            headers: HashMap::new(),
            body: body.into(),
        });
    }

    pub fn route_with_header(
        &self,
        pattern: &str,
        status: u16,
        header: (&str, &str),
        body: impl Into<Bytes>,
    ) {
        let mut headers = HashMap::new();
        headers.insert(header.0.to_string(), header.1.to_string());
        self.routes.lock().unwrap().push(Route {
            pattern: pattern.to_string(),
            status,
            headers,
            body: body.into(),
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.calls.lock().unwrap().push(request.url.clone());

        let routes = self.routes.lock().unwrap();
        let matched = routes.iter().find(|r| request.url.contains(&r.pattern));
        match matched {
            Some(route) => Ok(HttpResponse {
                status: route.status,
                headers: route.headers.clone(),
                body: route.body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                headers: HashMap::new(),
                body: Bytes::new(),
            }),
        }
    }
}

/// Connectivity probe reporting a fixed network state.
pub struct FixedConnectivity(pub NetworkInfo);

impl FixedConnectivity {
    pub fn wifi() -> Self {
        Self(NetworkInfo {
            reachable: true,
            network_type: Some(NetworkType::WiFi),
        })
    }

    pub fn cellular() -> Self {
        Self(NetworkInfo {
            reachable: true,
            network_type: Some(NetworkType::Cellular),
        })
    }

    pub fn offline() -> Self {
        Self(NetworkInfo::offline())
    }
}

#[async_trait]
impl ConnectivityProbe for FixedConnectivity {
    async fn network_info(&self) -> BridgeResult<NetworkInfo> {
        Ok(self.0)
    }
}

/// Content resolver backed by a URI map.
#[derive(Default)]
pub struct MapContentResolver {
    entries: Mutex<HashMap<String, Bytes>>,
    calls: Mutex<Vec<String>>,
}

impl MapContentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: &str, bytes: impl Into<Bytes>) {
        self.entries
            .lock()
            .unwrap()
            .insert(uri.to_string(), bytes.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentResolver for MapContentResolver {
    async fn open_local(&self, uri: &str) -> BridgeResult<Bytes> {
        self.calls.lock().unwrap().push(uri.to_string());
        self.entries
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(uri.to_string()))
    }
}

/// In-memory file system rooted at a fake cache directory.
#[derive(Default)]
pub struct MemFileSystem {
    files: Mutex<HashMap<PathBuf, Bytes>>,
}

impl MemFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileSystemAccess for MemFileSystem {
    async fn cache_directory(&self) -> BridgeResult<PathBuf> {
        Ok(PathBuf::from("/cache"))
    }

    async fn exists(&self, path: &Path) -> BridgeResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata> {
        let files = self.files.lock().unwrap();
        let bytes = files
            .get(path)
            .ok_or_else(|| BridgeError::NotFound(path.display().to_string()))?;
        Ok(FileMetadata {
            size: bytes.len() as u64,
            modified_at: None,
            is_directory: false,
        })
    }

    async fn create_dir_all(&self, _path: &Path) -> BridgeResult<()> {
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(path.display().to_string()))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
        self.files.lock().unwrap().insert(path.to_path_buf(), data);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> BridgeResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> BridgeResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }
}

/// In-memory settings store.
#[derive(Default)]
pub struct MemSettings {
    bools: Mutex<HashMap<String, bool>>,
    strings: Mutex<HashMap<String, String>>,
    ints: Mutex<HashMap<String, u64>>,
}

impl MemSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.bools.lock().unwrap().insert(key.to_string(), value);
        self
    }

    pub fn with_u64(self, key: &str, value: u64) -> Self {
        self.ints.lock().unwrap().insert(key.to_string(), value);
        self
    }
}

#[async_trait]
impl SettingsStore for MemSettings {
    async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.strings.lock().unwrap().get(key).cloned())
    }

    async fn set_bool(&self, key: &str, value: bool) -> BridgeResult<()> {
        self.bools.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn get_bool(&self, key: &str) -> BridgeResult<Option<bool>> {
        Ok(self.bools.lock().unwrap().get(key).copied())
    }

    async fn set_u64(&self, key: &str, value: u64) -> BridgeResult<()> {
        self.ints.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn get_u64(&self, key: &str) -> BridgeResult<Option<u64>> {
        Ok(self.ints.lock().unwrap().get(key).copied())
    }

    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.bools.lock().unwrap().remove(key);
        self.strings.lock().unwrap().remove(key);
        self.ints.lock().unwrap().remove(key);
        Ok(())
    }

    async fn has_key(&self, key: &str) -> BridgeResult<bool> {
        Ok(self.bools.lock().unwrap().contains_key(key)
            || self.strings.lock().unwrap().contains_key(key)
            || self.ints.lock().unwrap().contains_key(key))
    }
}

/// Everything a fetcher or coordinator test needs, with handles to the
/// fakes kept for assertions.
pub struct Harness {
    pub http: Arc<ScriptedHttpClient>,
    pub content: Arc<MapContentResolver>,
    pub fs: Arc<MemFileSystem>,
    pub settings: Arc<MemSettings>,
    pub config: ArtworkConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(MemSettings::new())
    }

    pub fn with_settings(settings: MemSettings) -> Self {
        let config = ArtworkConfig {
            lookup_api_key: Some("test-key".to_string()),
            rate_limit_delay_ms: 0,
            ..ArtworkConfig::default()
        };
        Self {
            http: Arc::new(ScriptedHttpClient::new()),
            content: Arc::new(MapContentResolver::new()),
            fs: Arc::new(MemFileSystem::new()),
            settings: Arc::new(settings),
            config,
        }
    }

    pub fn fetcher(&self, connectivity: FixedConnectivity) -> ArtworkFetcher {
        ArtworkFetcher::new(
            self.http.clone(),
            self.content.clone(),
            Arc::new(connectivity),
            self.settings.clone(),
            self.fs.clone(),
            &self.config,
        )
    }

    pub fn coordinator(&self, connectivity: FixedConnectivity) -> ArtworkCoordinator {
        ArtworkCoordinator::new(self.fetcher(connectivity), &self.config)
    }
}
