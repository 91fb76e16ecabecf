use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::source::ImageFile;

pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex, 64 chars.
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Keep the first of each set of byte-identical images. Returns the kept
/// images in their original order and the paths of the dropped copies.
pub fn dedupe(images: Vec<ImageFile>) -> (Vec<ImageFile>, Vec<PathBuf>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(images.len());
    let mut duplicates = Vec::new();

    for image in images {
        let digest = sha256_bytes(&image.bytes);
        if seen.insert(digest) {
            kept.push(image);
        } else {
            tracing::warn!(
                "Skipping {}: identical to an earlier page ({})",
                image.path.display(),
                to_hex(&digest)
            );
            duplicates.push(image.path);
        }
    }
    (kept, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, bytes: &[u8]) -> ImageFile {
        ImageFile {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            mime_type: "image/png",
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn sha256_bytes_known_vector() {
        assert_eq!(
            to_hex(&sha256_bytes(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn dedupe_keeps_first_copy_in_order() {
        let (kept, dups) = dedupe(vec![
            image("a.png", b"one"),
            image("b.png", b"two"),
            image("c.png", b"one"),
        ]);
        let names: Vec<&str> = kept.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(dups, vec![PathBuf::from("c.png")]);
    }

    #[test]
    fn dedupe_distinct_images_untouched() {
        let (kept, dups) = dedupe(vec![image("a.png", b"1"), image("b.png", b"2")]);
        assert_eq!(kept.len(), 2);
        assert!(dups.is_empty());
    }
}
