//! Filesystem-backed `ObjectStore` confined to one directory via `cap-std`.
//!
//! Every path is resolved inside the root capability, so a crafted object
//! path cannot reach outside it. Object bytes live under `objects/` and the
//! media type recorded at `put` under the same path in `types/`. Writes use
//! `create_new`, which makes the write-once contract hold even under
//! concurrent submissions.

use std::io::{self, ErrorKind, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;
use url::Url;

use crate::domain::TraceId;
use crate::domain::ports::{
    ObjectPath, ObjectPayload, ObjectStore, ObjectStoreError, StoredBlob, StoredObject,
    content_type_for,
};

use super::public_base;

const OBJECTS_DIR: &str = "objects";
const TYPES_DIR: &str = "types";

struct Roots {
    objects: Dir,
    types: Dir,
}

/// Photo store rooted at a directory on local disk.
#[derive(Clone)]
pub struct CapStdObjectStore {
    roots: Arc<Roots>,
    public_base: Url,
}

fn open_subdir(root: &Dir, name: &str) -> io::Result<Dir> {
    root.create_dir_all(name)?;
    root.open_dir(name)
}

impl CapStdObjectStore {
    /// Open (creating if needed) `root` and serve objects below `base`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directories cannot be
    /// created or opened.
    pub fn open(root: &Path, base: Url) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        let roots = Roots {
            objects: open_subdir(&dir, OBJECTS_DIR)?,
            types: open_subdir(&dir, TYPES_DIR)?,
        };
        Ok(Self {
            roots: Arc::new(roots),
            public_base: public_base::normalise(base),
        })
    }

    async fn blocking<T, F>(&self, path: &ObjectPath, op: F) -> Result<T, ObjectStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Roots) -> Result<T, ObjectStoreError> + Send + 'static,
    {
        let roots = Arc::clone(&self.roots);
        let trace_id = TraceId::current();
        tokio::task::spawn_blocking(move || TraceId::enter_blocking(trace_id, || op(&roots)))
            .await
            .map_err(|err| ObjectStoreError::write(path.as_str(), err.to_string()))?
    }
}

fn create_new(dir: &Dir, relative: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
        dir.create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(relative, &options)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn write_new(
    roots: &Roots,
    path: &ObjectPath,
    payload: &ObjectPayload,
) -> Result<u64, ObjectStoreError> {
    let relative = Path::new(path.as_str());
    create_new(&roots.objects, relative, &payload.bytes).map_err(|err| {
        if err.kind() == ErrorKind::AlreadyExists {
            ObjectStoreError::already_exists(path.as_str())
        } else {
            ObjectStoreError::write(path.as_str(), err.to_string())
        }
    })?;
    create_new(&roots.types, relative, payload.content_type.as_bytes())
        .map_err(|err| ObjectStoreError::write(path.as_str(), err.to_string()))?;
    debug!(path = %path, size = payload.bytes.len(), "object written");
    Ok(payload.bytes.len() as u64)
}

fn read_existing(roots: &Roots, path: &ObjectPath) -> Result<Option<StoredBlob>, ObjectStoreError> {
    let bytes = match roots.objects.read(path.as_str()) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ObjectStoreError::read(path.as_str(), err.to_string())),
    };
    let content_type = match roots.types.read_to_string(path.as_str()) {
        Ok(recorded) if !recorded.trim().is_empty() => recorded.trim().to_owned(),
        Ok(_) => content_type_for(path.file_name()).to_owned(),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            content_type_for(path.file_name()).to_owned()
        }
        Err(err) => return Err(ObjectStoreError::read(path.as_str(), err.to_string())),
    };
    Ok(Some(StoredBlob {
        content_type,
        bytes,
    }))
}

#[async_trait]
impl ObjectStore for CapStdObjectStore {
    async fn put(
        &self,
        path: &ObjectPath,
        payload: ObjectPayload,
    ) -> Result<StoredObject, ObjectStoreError> {
        let target = path.clone();
        let size = self
            .blocking(path, move |roots| write_new(roots, &target, &payload))
            .await?;
        Ok(StoredObject {
            path: path.clone(),
            size,
        })
    }

    fn public_url(&self, stored: &StoredObject) -> Result<String, ObjectStoreError> {
        public_base::join(&self.public_base, &stored.path)
    }

    async fn get(&self, path: &ObjectPath) -> Result<Option<StoredBlob>, ObjectStoreError> {
        let target = path.clone();
        self.blocking(path, move |roots| read_existing(roots, &target))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: CapStdObjectStore,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let base = Url::parse("http://localhost:8080/storage").expect("base url");
        let store = CapStdObjectStore::open(&dir.path().join("photos"), base).expect("open store");
        Fixture { _dir: dir, store }
    }

    fn path(raw: &str) -> ObjectPath {
        ObjectPath::new(raw).expect("valid path")
    }

    fn payload(bytes: &[u8]) -> ObjectPayload {
        ObjectPayload {
            content_type: "image/png".into(),
            bytes: bytes.to_vec(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn stored_object_reads_back(fixture: Fixture) {
        let target = path("owner/1710468000000/ringkas_before_meja.png");
        let stored = fixture
            .store
            .put(&target, payload(b"\x89PNG"))
            .await
            .expect("put");
        assert_eq!(stored.size, 4);

        let blob = fixture.store.get(&target).await.expect("get").expect("present");
        assert_eq!(blob.bytes, b"\x89PNG");
        assert_eq!(blob.content_type, "image/png");
    }

    #[rstest]
    #[tokio::test]
    async fn second_write_to_same_path_is_refused(fixture: Fixture) {
        let target = path("owner/1/rapi_after_a.jpg");
        fixture.store.put(&target, payload(b"one")).await.expect("first put");

        let error = fixture
            .store
            .put(&target, payload(b"two"))
            .await
            .expect_err("second put");
        assert!(matches!(error, ObjectStoreError::AlreadyExists { .. }));
        let blob = fixture.store.get(&target).await.expect("get").expect("present");
        assert_eq!(blob.bytes, b"one");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_object_is_none(fixture: Fixture) {
        assert!(fixture.store.get(&path("nobody/x.jpg")).await.expect("get").is_none());
    }

    #[rstest]
    fn public_url_sits_below_base(fixture: Fixture) {
        let stored = StoredObject {
            path: path("owner/1/resik_before_foto kelas.jpg"),
            size: 1,
        };
        let url = fixture.store.public_url(&stored).expect("url");
        assert_eq!(
            url,
            "http://localhost:8080/storage/owner/1/resik_before_foto%20kelas.jpg"
        );
    }
}
