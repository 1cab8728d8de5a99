//! Image ingestion service.
//!
//! Turns a batch of uploaded files into [`ImageRecord`]s appended to a
//! caller-owned collection. Each file is read and decoded in its own task;
//! a failing file is logged, reported in its [`IngestOutcome`], and left out
//! of the collection without affecting its siblings.
//!
//! Records are only appended by the awaiting caller, never from inside the
//! spawned tasks, so the collection needs no lock on a multi-threaded runtime.

use std::path::PathBuf;
use std::sync::Arc;

use composer_core::collection;
use composer_core::{
    IdGenerator, IdSequence, ImageDefaults, ImageFormat, ImageRecord, IngestOrder, PixelSource,
    RecordId,
};
use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::task::JoinError;

use crate::image::{fit_within, load_image_from_bytes, load_image_from_data_uri, to_data_uri};

/// Identifier prefix for image records.
pub const IMAGE_ID_PREFIX: &str = "image";

/// Where an uploaded file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory.
    Bytes(Vec<u8>),
    /// A file on disk, read when ingestion starts.
    Path(PathBuf),
}

/// An uploaded file awaiting ingestion.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as supplied by the user.
    pub name: String,
    /// Declared MIME type; may be empty.
    pub mime: String,
    /// The file contents.
    pub source: FileSource,
}

impl UploadedFile {
    /// An in-memory upload.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            source: FileSource::Bytes(bytes),
        }
    }

    /// An upload backed by a file on disk; the MIME type is guessed from the
    /// extension.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(ImageFormat::Unknown, ImageFormat::from_extension);
        let mime = if format == ImageFormat::Unknown {
            String::new()
        } else {
            format.mime().to_string()
        };
        Self {
            name,
            mime,
            source: FileSource::Path(path),
        }
    }
}

/// Why a single file was dropped from a batch.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    /// The bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The task processing the file panicked or was cancelled.
    #[error("Ingestion task failed: {0}")]
    Task(String),
}

impl From<JoinError> for IngestError {
    fn from(e: JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

/// Result of ingesting one file.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Name of the uploaded file.
    pub file_name: String,
    /// Identifier of the appended record, or why nothing was appended.
    pub result: Result<RecordId, IngestError>,
}

impl IngestOutcome {
    /// Whether the file produced a record.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A decoded upload, not yet placed.
struct DecodedUpload {
    source: PixelSource,
    preview_uri: String,
}

/// Ingests uploads and edits [`ImageRecord`]s held in caller-owned collections.
#[derive(Debug, Clone)]
pub struct ImageService {
    ids: IdGenerator,
    defaults: ImageDefaults,
}

#[allow(clippy::unused_self)]
impl ImageService {
    /// Service with default placement and its own id sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sequence(IdSequence::new(), ImageDefaults::default())
    }

    /// Service drawing ids from an injected sequence.
    #[must_use]
    pub fn with_sequence(sequence: IdSequence, defaults: ImageDefaults) -> Self {
        Self {
            ids: IdGenerator::with_sequence(IMAGE_ID_PREFIX, sequence),
            defaults,
        }
    }

    /// The placement and ordering defaults in use.
    #[must_use]
    pub fn defaults(&self) -> &ImageDefaults {
        &self.defaults
    }

    /// Ingest a batch of uploads, appending one record per decodable file.
    ///
    /// Files are processed concurrently. With [`IngestOrder::Input`] records
    /// and outcomes follow the order of `files`; with
    /// [`IngestOrder::Completion`] both follow the order in which files
    /// finished. Identifiers are issued in append order either way.
    pub async fn process_uploaded_files(
        &self,
        files: Vec<UploadedFile>,
        images: &mut Vec<ImageRecord>,
    ) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        let tasks: Vec<_> = files
            .into_iter()
            .map(|file| {
                tracing::debug!("Processing file: {} ({})", file.name, file.mime);
                let name = file.name.clone();
                (name, tokio::spawn(decode_upload(file)))
            })
            .collect();

        match self.defaults.order {
            IngestOrder::Input => {
                for (name, task) in tasks {
                    let decoded = flatten(task.await);
                    outcomes.push(self.settle(name, decoded, images));
                }
            }
            IngestOrder::Completion => {
                let mut pending: FuturesUnordered<_> = tasks
                    .into_iter()
                    .map(|(name, task)| async move { (name, flatten(task.await)) })
                    .collect();
                while let Some((name, decoded)) = pending.next().await {
                    outcomes.push(self.settle(name, decoded, images));
                }
            }
        }

        let ok = outcomes.iter().filter(|o| o.is_ok()).count();
        tracing::debug!("Ingested {ok} of {} files", outcomes.len());
        outcomes
    }

    /// Ingest a single upload.
    pub async fn process_uploaded_file(
        &self,
        file: UploadedFile,
        images: &mut Vec<ImageRecord>,
    ) -> IngestOutcome {
        let name = file.name.clone();
        let decoded = decode_upload(file).await;
        self.settle(name, decoded, images)
    }

    /// Place a decoded upload into the collection, or log why it was dropped.
    fn settle(
        &self,
        file_name: String,
        decoded: Result<DecodedUpload, IngestError>,
        images: &mut Vec<ImageRecord>,
    ) -> IngestOutcome {
        let result = match decoded {
            Ok(upload) => {
                let record = self.place(&file_name, upload);
                tracing::debug!(
                    "Image {} loaded: {}x{} resized to {}x{}",
                    record.id,
                    record.original_width,
                    record.original_height,
                    record.width,
                    record.height
                );
                let id = record.id.clone();
                images.push(record);
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Dropping uploaded file {file_name}: {e}");
                Err(e)
            }
        };
        IngestOutcome { file_name, result }
    }

    fn place(&self, file_name: &str, upload: DecodedUpload) -> ImageRecord {
        let DecodedUpload {
            source,
            preview_uri,
        } = upload;
        let (width, height) = fit_within(
            source.width,
            source.height,
            self.defaults.max_width,
            self.defaults.max_height,
        );
        ImageRecord {
            id: self.ids.next_id(),
            x: self.defaults.x,
            y: self.defaults.y,
            width,
            height,
            original_width: source.width,
            original_height: source.height,
            source: Arc::new(source),
            preview_uri,
            file_name: file_name.to_string(),
        }
    }

    /// Look up an image record.
    #[must_use]
    pub fn find_image<'a>(
        &self,
        id: &RecordId,
        images: &'a [ImageRecord],
    ) -> Option<&'a ImageRecord> {
        collection::find(images, id)
    }

    /// Move an image. Returns `false` if `id` is absent.
    pub fn update_image_position(
        &self,
        id: &RecordId,
        x: f32,
        y: f32,
        images: &mut [ImageRecord],
    ) -> bool {
        collection::update(images, id, |img| {
            img.x = x;
            img.y = y;
        })
    }

    /// Resize and move an image. Returns `false` if `id` is absent.
    pub fn update_image_transform(
        &self,
        id: &RecordId,
        width: f32,
        height: f32,
        x: f32,
        y: f32,
        images: &mut [ImageRecord],
    ) -> bool {
        collection::update(images, id, |img| {
            img.width = width;
            img.height = height;
            img.x = x;
            img.y = y;
        })
    }

    /// Delete an image. Returns `false` if `id` is absent.
    pub fn delete_image(&self, id: &RecordId, images: &mut Vec<ImageRecord>) -> bool {
        let removed = collection::remove(images, id);
        if removed {
            tracing::debug!("Deleted image {id}");
        }
        removed
    }

    /// Remove every image.
    pub fn clear_images(&self, images: &mut Vec<ImageRecord>) {
        collection::clear(images);
    }

    /// Decode `preview_uri` back into pixels for records that have none.
    ///
    /// Pixel sources are not serialized, so records loaded with
    /// [`composer_core::Scene::from_json`] come back empty. Records that
    /// already hold pixels are skipped and get no outcome. A record whose
    /// data URI cannot be decoded stays in the collection unchanged.
    pub fn restore_sources(&self, images: &mut [ImageRecord]) -> Vec<IngestOutcome> {
        images
            .iter_mut()
            .filter(|img| img.source.rgba.is_empty())
            .map(|img| {
                let result = match load_image_from_data_uri(&img.preview_uri) {
                    Ok(source) => {
                        img.source = Arc::new(source);
                        Ok(img.id.clone())
                    }
                    Err(e) => {
                        tracing::warn!("Cannot restore pixels for image {}: {e}", img.id);
                        Err(IngestError::Decode(e.to_string()))
                    }
                };
                IngestOutcome {
                    file_name: img.file_name.clone(),
                    result,
                }
            })
            .collect()
    }
}

impl Default for ImageService {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and decode one upload. Decoding runs on the blocking pool.
async fn decode_upload(file: UploadedFile) -> Result<DecodedUpload, IngestError> {
    let bytes = match file.source {
        FileSource::Bytes(bytes) => bytes,
        FileSource::Path(path) => tokio::fs::read(&path).await?,
    };
    let declared_mime = file.mime;

    tokio::task::spawn_blocking(move || -> Result<DecodedUpload, IngestError> {
        let source =
            load_image_from_bytes(&bytes).map_err(|e| IngestError::Decode(e.to_string()))?;
        let mime = if declared_mime.is_empty() {
            source.format.mime().to_string()
        } else {
            declared_mime
        };
        let preview_uri = to_data_uri(&mime, &bytes);
        Ok(DecodedUpload {
            source,
            preview_uri,
        })
    })
    .await?
}

fn flatten(
    joined: Result<Result<DecodedUpload, IngestError>, JoinError>,
) -> Result<DecodedUpload, IngestError> {
    joined.map_err(IngestError::from).and_then(|r| r)
}
