//! Public URL construction shared by the object store adapters.

use url::Url;

use crate::domain::ports::{ObjectPath, ObjectStoreError};

/// Ensure the base ends in `/` so joins append instead of replacing the last
/// segment.
pub(super) fn normalise(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Public URL for `path` below `base`. Each segment is percent-encoded, so
/// `#`, `?`, and `%` in file names stay part of the path.
pub(super) fn join(base: &Url, path: &ObjectPath) -> Result<String, ObjectStoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ObjectStoreError::public_url(path.as_str(), "base URL cannot hold a path"))?
        .pop_if_empty()
        .extend(path.segments());
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://files.sekolah.id/storage", "https://files.sekolah.id/storage/")]
    #[case("https://files.sekolah.id/storage/", "https://files.sekolah.id/storage/")]
    #[case("https://files.sekolah.id", "https://files.sekolah.id/")]
    fn base_always_ends_in_slash(#[case] raw: &str, #[case] expected: &str) {
        let base = normalise(Url::parse(raw).expect("url"));
        assert_eq!(base.as_str(), expected);
    }

    #[rstest]
    fn join_keeps_every_segment() {
        let base = normalise(Url::parse("https://files.sekolah.id/storage").expect("url"));
        let path = ObjectPath::new("a/1/rawat_after_x.jpg").expect("path");
        assert_eq!(
            join(&base, &path).expect("join"),
            "https://files.sekolah.id/storage/a/1/rawat_after_x.jpg"
        );
    }

    #[rstest]
    #[case("a/1/ringkas_before_foto#1.jpg", "a/1/ringkas_before_foto%231.jpg")]
    #[case("a/1/ringkas_before_foto?.jpg", "a/1/ringkas_before_foto%3F.jpg")]
    #[case("a/1/ringkas_before_100%.jpg", "a/1/ringkas_before_100%25.jpg")]
    fn reserved_characters_stay_in_the_path(#[case] raw: &str, #[case] encoded: &str) {
        let base = normalise(Url::parse("https://files.sekolah.id/storage/").expect("url"));
        let url = join(&base, &ObjectPath::new(raw).expect("path")).expect("join");
        assert_eq!(url, format!("https://files.sekolah.id/storage/{encoded}"));
        let parsed = Url::parse(&url).expect("parse back");
        assert_eq!(parsed.fragment(), None);
        assert_eq!(parsed.query(), None);
    }
}
