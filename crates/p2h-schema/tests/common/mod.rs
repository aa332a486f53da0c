use std::fmt;
use std::sync::{Arc, Mutex};

use futures::stream::BoxStream;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{
    GetOptions, GetRange, GetResult, ListResult, MultipartUpload, ObjectMeta, ObjectStore,
    PutMultipartOptions, PutOptions, PutPayload, PutResult, Result,
};
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

pub const SPARK_SCHEMA_KEY: &str = "org.apache.spark.sql.parquet.row.metadata";

/// Writes a Parquet file without row groups carrying the given key-value metadata.
pub fn parquet_file_with_metadata(entries: Vec<KeyValue>) -> Vec<u8> {
    let schema = Arc::new(parse_message_type("message spark_schema { optional int32 x; }").unwrap());
    let properties = Arc::new(
        WriterProperties::builder()
            .set_key_value_metadata(Some(entries))
            .build(),
    );
    let mut buffer = Vec::new();
    let writer = SerializedFileWriter::new(&mut buffer, schema, properties).unwrap();
    writer.close().unwrap();
    buffer
}

pub fn parquet_file_with_schema(schema: &str) -> Vec<u8> {
    parquet_file_with_metadata(vec![KeyValue::new(
        SPARK_SCHEMA_KEY.to_string(),
        schema.to_string(),
    )])
}

/// Wraps an in-memory store and records the byte range of every read.
///
/// Metadata lookups are not recorded. A read of the whole object is recorded as `None`.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: InMemory,
    reads: Mutex<Vec<Option<GetRange>>>,
}

impl RecordingStore {
    pub fn reads(&self) -> Vec<Option<GetRange>> {
        self.reads.lock().unwrap().clone()
    }
}

impl fmt::Display for RecordingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordingStore({})", self.inner)
    }
}

#[async_trait::async_trait]
impl ObjectStore for RecordingStore {
    async fn put_opts(
        &self,
        location: &Path,
        payload: PutPayload,
        opts: PutOptions,
    ) -> Result<PutResult> {
        self.inner.put_opts(location, payload, opts).await
    }

    async fn put_multipart_opts(
        &self,
        location: &Path,
        opts: PutMultipartOptions,
    ) -> Result<Box<dyn MultipartUpload>> {
        self.inner.put_multipart_opts(location, opts).await
    }

    async fn get_opts(&self, location: &Path, options: GetOptions) -> Result<GetResult> {
        if !options.head {
            self.reads.lock().unwrap().push(options.range.clone());
        }
        self.inner.get_opts(location, options).await
    }

    async fn delete(&self, location: &Path) -> Result<()> {
        self.inner.delete(location).await
    }

    fn list(&self, prefix: Option<&Path>) -> BoxStream<'static, Result<ObjectMeta>> {
        self.inner.list(prefix)
    }

    async fn list_with_delimiter(&self, prefix: Option<&Path>) -> Result<ListResult> {
        self.inner.list_with_delimiter(prefix).await
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        self.inner.copy(from, to).await
    }

    async fn copy_if_not_exists(&self, from: &Path, to: &Path) -> Result<()> {
        self.inner.copy_if_not_exists(from, to).await
    }
}
