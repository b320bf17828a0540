//! Consumer that writes rendered outputs to files.

use crate::consumer::Consumer;
use crate::error::DistributionError;
use crate::generator::Generator;
use async_trait::async_trait;
use log::{debug, info};
use meridian_rs_config::MeridianConfig;
use meridian_rs_protocol::{ConfigKey, ConfigOutput};
use meridian_rs_schema::is_dns1123_label;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default extension for rendered files.
const DEFAULT_EXTENSION: &str = "out";
/// Suffix appended to an output path for its provenance manifest.
const MANIFEST_SUFFIX: &str = "sources.json";

/// Writes each output to `<dir>/<name>.<ext>`, or `<dir>/<name>-<index>.<ext>`
/// when a sync produces more than one output.
///
/// Files are written to a temporary path and renamed into place, so readers
/// never see a partially written output. Once a sync's files are in place,
/// outputs and manifests an earlier sync wrote under other paths are
/// removed: the plain file when the sync produced several outputs, and
/// indexed files from the new output count upward. A manifest left next to
/// a written output is removed when manifests are disabled.
#[derive(Clone)]
pub struct FileConsumer {
    name: String,
    dir: PathBuf,
    extension: String,
    manifest: bool,
    generators: Vec<Arc<dyn Generator>>,
}

/// Provenance written next to an output file.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    consumer: &'a str,
    sources: &'a [ConfigKey],
}

impl FileConsumer {
    /// Create a consumer writing into `dir` with manifests enabled.
    ///
    /// The name prefixes every file the consumer writes and must be a
    /// DNS-1123 label.
    pub fn new(
        name: impl Into<String>,
        dir: impl AsRef<Path>,
    ) -> Result<Self, DistributionError> {
        let name = name.into();
        if !is_dns1123_label(&name) {
            return Err(DistributionError::InvalidName(name));
        }
        Ok(Self {
            name,
            dir: dir.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
            manifest: true,
            generators: Vec::new(),
        })
    }

    /// Create a consumer from the `output` settings, resolving the directory
    /// against `base`.
    pub fn from_config(
        name: impl Into<String>,
        config: &MeridianConfig,
        base: &Path,
    ) -> Result<Self, DistributionError> {
        Ok(Self::new(name, config.resolve_output_dir(base))?
            .with_extension(config.output.extension.clone())
            .with_manifest(config.output.manifest))
    }

    /// Append a generator to render for this consumer.
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable `.sources.json` manifests.
    pub fn with_manifest(mut self, manifest: bool) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths the consumer writes for a sync producing `count` outputs.
    pub fn output_paths(&self, count: usize) -> Vec<PathBuf> {
        if count == 1 {
            return vec![self.plain_path()];
        }
        (0..count).map(|index| self.indexed_path(index)).collect()
    }

    /// Manifest path for an output path.
    pub fn manifest_path(output: &Path) -> PathBuf {
        let mut path = output.as_os_str().to_owned();
        path.push(".");
        path.push(MANIFEST_SUFFIX);
        PathBuf::from(path)
    }

    fn plain_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, self.extension))
    }

    fn indexed_path(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{}-{}.{}", self.name, index, self.extension))
    }

    /// Remove outputs an earlier sync wrote that the current `count` does not
    /// overwrite. Indexed files are contiguous from zero, so the scan stops at
    /// the first index with neither an output nor a manifest.
    async fn remove_stale(&self, count: usize) -> Result<usize, DistributionError> {
        let mut removed = 0;
        if count != 1 && remove_output(&self.plain_path()).await? {
            removed += 1;
        }
        let mut index = if count > 1 { count } else { 0 };
        while remove_output(&self.indexed_path(index)).await? {
            removed += 1;
            index += 1;
        }
        Ok(removed)
    }
}

#[async_trait]
impl Consumer for FileConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    fn generators(&self) -> Vec<Arc<dyn Generator>> {
        self.generators.clone()
    }

    async fn distribute(&self, outputs: &[ConfigOutput]) -> Result<(), DistributionError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error(&self.dir, source))?;
        let paths = self.output_paths(outputs.len());
        for (output, path) in outputs.iter().zip(&paths) {
            write_atomic(path, &output.content).await?;
            let manifest_path = Self::manifest_path(path);
            if self.manifest {
                let manifest = Manifest {
                    consumer: &self.name,
                    sources: &output.sources,
                };
                let contents = serde_json::to_vec_pretty(&manifest)?;
                write_atomic(&manifest_path, &contents).await?;
            } else {
                remove_if_exists(&manifest_path).await?;
            }
            debug!(
                "wrote output (consumer={}, path={}, bytes={})",
                self.name,
                path.display(),
                output.content.len()
            );
        }
        let removed = self.remove_stale(outputs.len()).await?;
        if removed > 0 {
            debug!(
                "removed stale outputs (consumer={}, files={})",
                self.name, removed
            );
        }
        info!(
            "distributed outputs to files (consumer={}, files={})",
            self.name,
            paths.len()
        );
        Ok(())
    }
}

async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DistributionError> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    tokio::fs::write(&temp, contents)
        .await
        .map_err(|source| io_error(&temp, source))?;
    tokio::fs::rename(&temp, path)
        .await
        .map_err(|source| io_error(path, source))
}

/// Remove an output and its manifest; true when either existed.
async fn remove_output(path: &Path) -> Result<bool, DistributionError> {
    let output = remove_if_exists(path).await?;
    let manifest = remove_if_exists(&FileConsumer::manifest_path(path)).await?;
    Ok(output || manifest)
}

async fn remove_if_exists(path: &Path) -> Result<bool, DistributionError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(io_error(path, source)),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DistributionError {
    DistributionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::FileConsumer;
    use crate::{Consumer, DistributionError};
    use meridian_rs_config::{MeridianConfig, OutputConfig};
    use meridian_rs_protocol::{ConfigKey, ConfigOutput};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    #[test]
    fn single_output_uses_plain_name() {
        let consumer = FileConsumer::new("envoy", "/srv/out")
            .expect("consumer")
            .with_extension("yaml");
        assert_eq!(
            consumer.output_paths(1),
            vec![PathBuf::from("/srv/out/envoy.yaml")]
        );
        assert_eq!(
            consumer.output_paths(2),
            vec![
                PathBuf::from("/srv/out/envoy-0.yaml"),
                PathBuf::from("/srv/out/envoy-1.yaml"),
            ]
        );
        assert!(consumer.output_paths(0).is_empty());
        assert_eq!(
            FileConsumer::manifest_path(Path::new("/srv/out/envoy.yaml")),
            PathBuf::from("/srv/out/envoy.yaml.sources.json")
        );
    }

    #[test]
    fn from_config_applies_output_settings() {
        let config = MeridianConfig::builder()
            .output(OutputConfig {
                dir: Some("rendered".to_string()),
                manifest: false,
                extension: "conf".to_string(),
            })
            .build();
        let consumer = FileConsumer::from_config("nginx", &config, Path::new("/etc/app"))
            .expect("consumer");
        assert_eq!(consumer.dir(), Path::new("/etc/app/rendered"));
        assert_eq!(
            consumer.output_paths(1),
            vec![PathBuf::from("/etc/app/rendered/nginx.conf")]
        );
    }

    #[tokio::test]
    async fn writes_outputs_and_manifests() {
        let temp = TempDir::new().expect("tmp");
        let dir = temp.path().join("nested").join("out");
        let consumer = FileConsumer::new("proxy", &dir).expect("consumer");
        let outputs = vec![
            ConfigOutput::new(vec![ConfigKey::new("Route", "edge", "a")], "route a\n"),
            ConfigOutput::new(
                vec![
                    ConfigKey::new("Route", "edge", "b"),
                    ConfigKey::new("Route", "edge", "c"),
                ],
                "routes b c\n",
            ),
        ];

        consumer.distribute(&outputs).await.expect("distribute");

        let first = std::fs::read_to_string(dir.join("proxy-0.out")).expect("first");
        assert_eq!(first, "route a\n");
        let second = std::fs::read_to_string(dir.join("proxy-1.out")).expect("second");
        assert_eq!(second, "routes b c\n");

        let manifest: Value = serde_json::from_slice(
            &std::fs::read(dir.join("proxy-1.out.sources.json")).expect("manifest"),
        )
        .expect("json");
        assert_eq!(
            manifest,
            json!({
                "consumer": "proxy",
                "sources": [
                    { "kind": "Route", "namespace": "edge", "name": "b" },
                    { "kind": "Route", "namespace": "edge", "name": "c" },
                ],
            })
        );
        assert!(!dir.join("proxy-0.out.tmp").exists());
    }

    #[tokio::test]
    async fn skips_manifests_when_disabled() {
        let temp = TempDir::new().expect("tmp");
        let consumer = FileConsumer::new("proxy", temp.path())
            .expect("consumer")
            .with_manifest(false);
        let outputs = vec![ConfigOutput::new(Vec::new(), "empty\n")];

        consumer.distribute(&outputs).await.expect("distribute");

        assert!(temp.path().join("proxy.out").exists());
        assert!(!temp.path().join("proxy.out.sources.json").exists());
    }

    #[tokio::test]
    async fn reports_io_failures_with_path() {
        let temp = TempDir::new().expect("tmp");
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a dir").expect("write");
        let consumer = FileConsumer::new("proxy", blocker.join("out")).expect("consumer");

        let err = consumer
            .distribute(&[ConfigOutput::new(Vec::new(), "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, DistributionError::Io { .. }));
    }

    #[test]
    fn rejects_names_that_escape_the_directory() {
        for name in ["../escape", "a/b", "..", "", "Proxy"] {
            match FileConsumer::new(name, "/srv/out") {
                Err(DistributionError::InvalidName(rejected)) => assert_eq!(rejected, name),
                Err(other) => panic!("unexpected error: {other}"),
                Ok(_) => panic!("{name:?} should be rejected"),
            }
        }
    }

    fn outputs(count: usize) -> Vec<ConfigOutput> {
        (0..count)
            .map(|index| {
                ConfigOutput::new(
                    vec![ConfigKey::new("Route", "edge", format!("r{index}"))],
                    format!("route {index}\n"),
                )
            })
            .collect()
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names = std::fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[tokio::test]
    async fn shrinking_syncs_remove_stale_outputs_and_manifests() {
        let temp = TempDir::new().expect("tmp");
        let consumer = FileConsumer::new("proxy", temp.path()).expect("consumer");
        let other = FileConsumer::new("edge", temp.path()).expect("consumer");
        other.distribute(&outputs(2)).await.expect("other");

        consumer.distribute(&outputs(3)).await.expect("three");
        consumer.distribute(&outputs(2)).await.expect("two");
        assert_eq!(
            file_names(temp.path()),
            vec![
                "edge-0.out",
                "edge-0.out.sources.json",
                "edge-1.out",
                "edge-1.out.sources.json",
                "proxy-0.out",
                "proxy-0.out.sources.json",
                "proxy-1.out",
                "proxy-1.out.sources.json",
            ]
        );

        consumer.distribute(&outputs(1)).await.expect("one");
        assert!(temp.path().join("proxy.out").exists());
        assert!(!temp.path().join("proxy-0.out").exists());
        assert!(!temp.path().join("proxy-1.out.sources.json").exists());

        consumer.distribute(&outputs(0)).await.expect("none");
        assert_eq!(
            file_names(temp.path()),
            vec![
                "edge-0.out",
                "edge-0.out.sources.json",
                "edge-1.out",
                "edge-1.out.sources.json",
            ]
        );
    }

    #[tokio::test]
    async fn disabling_manifests_removes_old_ones() {
        let temp = TempDir::new().expect("tmp");
        let consumer = FileConsumer::new("proxy", temp.path()).expect("consumer");
        consumer.distribute(&outputs(1)).await.expect("with manifest");
        assert!(temp.path().join("proxy.out.sources.json").exists());

        let consumer = consumer.with_manifest(false);
        consumer.distribute(&outputs(1)).await.expect("without manifest");
        assert_eq!(file_names(temp.path()), vec!["proxy.out"]);
    }
}
