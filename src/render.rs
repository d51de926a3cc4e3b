//! Presentation collaborators.
//!
//! Rendering is a pluggable concern: the core hands out [`KeyView`] values
//! and calls through these traits, never the other way around. A missing or
//! failing visual-fingerprint renderer degrades to a typed unavailable
//! result instead of a core failure.

use crate::storage::record::KeyView;
use std::fmt::Write as _;
use thiserror::Error;

/// Which fingerprint digest a visual renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestMode {
    Md5,
    Sha256,
}

/// The visual fingerprint could not be produced.
#[derive(Debug, Error)]
#[error("visual fingerprint unavailable: {0}")]
pub struct ArtUnavailable(pub String);

/// Renders a fingerprint digest as a text-art block.
pub trait ArtRenderer {
    fn render(&self, digest: &str, mode: DigestMode) -> std::result::Result<String, ArtUnavailable>;
}

/// The default renderer when no external art generator is wired in.
pub struct NullArtRenderer;

impl ArtRenderer for NullArtRenderer {
    fn render(
        &self,
        _digest: &str,
        _mode: DigestMode,
    ) -> std::result::Result<String, ArtUnavailable> {
        Err(ArtUnavailable("no renderer configured".to_string()))
    }
}

/// Renders key views for human consumption.
pub trait RecordRenderer {
    fn render(&self, records: &[KeyView]) -> String;
}

/// Plain aligned-text rendering, one block per key.
pub struct PlainRenderer;

impl RecordRenderer for PlainRenderer {
    fn render(&self, records: &[KeyView]) -> String {
        let mut out = String::new();
        for view in records {
            let _ = writeln!(out, "Id:          {}", view.id);
            let _ = writeln!(out, "Name:        {}", view.name);
            let _ = writeln!(out, "Slug:        {}", view.slug);
            let _ = writeln!(out, "Status:      {:?}", view.status);
            let _ = writeln!(out, "Curve:       {}", view.curve);
            let _ = writeln!(out, "MD5:         {}", view.fingerprint_md5);
            let _ = writeln!(out, "SHA256:      {}", view.fingerprint_sha256);
            let _ = writeln!(out, "PrivateKey:  {}", view.private_key_preview);
            let _ = writeln!(out, "PublicKey:   {}", view.public_key_preview);
            let _ = writeln!(out, "Created:     {}", view.created_at);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::KeyStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_view() -> KeyView {
        KeyView {
            id: Uuid::new_v4(),
            name: "test-key".to_string(),
            slug: "quiet-harbor-4821".to_string(),
            status: KeyStatus::Active,
            curve: "prime256v1",
            fingerprint_md5: "ae2b1fca515949e5d54fb22b8ed95575".to_string(),
            fingerprint_sha256:
                "cf80cd8aed482d5d1527d7dc72fceff84e6326592848447d2dc0b0e87dfc9a90".to_string(),
            public_key_preview: "LS0tLS1CRUdJTiBQVUJMSUMgS0VZLS0tLS0...".to_string(),
            private_key_preview: "... ... ... ... ... ...".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plain_renderer_includes_identity_fields() {
        let view = sample_view();
        let text = PlainRenderer.render(std::slice::from_ref(&view));

        assert!(text.contains(&view.id.to_string()));
        assert!(text.contains("test-key"));
        assert!(text.contains("prime256v1"));
        assert!(text.contains(&view.fingerprint_sha256));
    }

    #[test]
    fn test_plain_renderer_multiple_records() {
        let views = vec![sample_view(), sample_view()];
        let text = PlainRenderer.render(&views);

        assert_eq!(text.matches("Name:").count(), 2);
    }

    #[test]
    fn test_null_art_renderer_degrades() {
        let result = NullArtRenderer.render("cf80cd8a", DigestMode::Sha256);
        match result {
            Err(ArtUnavailable(reason)) => assert!(reason.contains("no renderer")),
            Ok(_) => panic!("expected ArtUnavailable"),
        }
    }
}
