//! Photo storage adapters.
//!
//! Both adapters hand out URLs below a configured public base; the HTTP
//! layer serves that prefix from the same store.

mod cap_std_object_store;
mod memory_object_store;
mod public_base;

pub use cap_std_object_store::CapStdObjectStore;
pub use memory_object_store::MemoryObjectStore;

#[cfg(test)]
mod tests {
    //! Behaviour both adapters must share.

    use super::*;
    use crate::domain::ports::{ObjectPath, ObjectPayload, ObjectStore, ObjectStoreError};
    use rstest::rstest;
    use tempfile::TempDir;
    use url::Url;

    enum Backend {
        Memory,
        Filesystem,
    }

    struct Opened {
        _dir: Option<TempDir>,
        store: Box<dyn ObjectStore>,
    }

    fn open(backend: Backend) -> Opened {
        let base = Url::parse("http://localhost:8080/storage/").expect("base url");
        match backend {
            Backend::Memory => Opened {
                _dir: None,
                store: Box::new(MemoryObjectStore::new(base)),
            },
            Backend::Filesystem => {
                let dir = TempDir::new().expect("temp dir");
                let store = CapStdObjectStore::open(dir.path(), base).expect("open store");
                Opened {
                    _dir: Some(dir),
                    store: Box::new(store),
                }
            }
        }
    }

    fn payload(content_type: &str, bytes: &[u8]) -> ObjectPayload {
        ObjectPayload {
            content_type: content_type.into(),
            bytes: bytes.to_vec(),
        }
    }

    #[rstest]
    #[case("o/1/ringkas_before_IMG_0001", "image/jpeg")]
    #[case("o/1/rapi_after_scan.png", "image/webp")]
    #[case("o/1/resik_before_foto#1.jpg", "image/jpeg")]
    #[tokio::test]
    async fn recorded_type_is_served_back(
        #[values(Backend::Memory, Backend::Filesystem)] backend: Backend,
        #[case] raw: &str,
        #[case] content_type: &str,
    ) {
        let Opened { _dir, store } = open(backend);
        let path = ObjectPath::new(raw).expect("path");
        store
            .put(&path, payload(content_type, b"\xFF\xD8\xFF"))
            .await
            .expect("put");

        let blob = store.get(&path).await.expect("get").expect("present");
        assert_eq!(blob.content_type, content_type);
        assert_eq!(blob.bytes, b"\xFF\xD8\xFF");
    }

    #[rstest]
    #[tokio::test]
    async fn objects_are_written_once(
        #[values(Backend::Memory, Backend::Filesystem)] backend: Backend,
    ) {
        let Opened { _dir, store } = open(backend);
        let path = ObjectPath::new("o/1/rawat_after_meja.jpg").expect("path");
        let stored = store
            .put(&path, payload("image/jpeg", b"one"))
            .await
            .expect("first put");

        let error = store
            .put(&path, payload("image/png", b"two"))
            .await
            .expect_err("second put");
        assert!(matches!(error, ObjectStoreError::AlreadyExists { .. }));

        let blob = store.get(&path).await.expect("get").expect("present");
        assert_eq!(blob.bytes, b"one");
        assert_eq!(blob.content_type, "image/jpeg");
        assert_eq!(
            store.public_url(&stored).expect("url"),
            "http://localhost:8080/storage/o/1/rawat_after_meja.jpg"
        );
    }
}
