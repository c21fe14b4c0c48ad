use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use super::unescape::unescape_html;
use crate::error::Result;
use crate::generator::SourceSet;

/// Mode bits of every archive entry
pub const ENTRY_MODE: u32 = 0o777;

/// Archive path of an artifact: `<project>/<relative path>`, without a
/// leading `/`.
pub fn entry_path(project: &str, relative: &str) -> String {
    format!("{project}/{relative}")
        .trim_start_matches('/')
        .to_string()
}

/// Write both artifacts as a gzip-compressed tar stream into `sink`.
///
/// Entries are prefixed with `project` and written main first. Size is the
/// un-escaped content length and mtime the current time. The finished sink
/// is handed back so callers can use a buffer as the sink.
pub fn write_archive<W: Write>(sink: W, project: &str, sources: &SourceSet) -> Result<W> {
    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let mut builder = tar::Builder::new(GzEncoder::new(sink, Compression::default()));
    for artifact in sources.artifacts() {
        let body = unescape_html(&artifact.body);
        let path = entry_path(project, &artifact.relative_path());

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(mtime);
        header.set_size(body.len() as u64);
        builder.append_data(&mut header, &path, body.as_bytes())?;
        debug!(path = %path, bytes = body.len(), "archived artifact");
    }
    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Artifact, Destination};
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_entry_path() {
        assert_eq!(entry_path("shop", "data/sql.rs"), "shop/data/sql.rs");
        assert_eq!(entry_path("", "main.rs"), "main.rs");
    }

    #[test]
    fn test_archive_round_trip() {
        let sources = SourceSet {
            main: Artifact::new(Destination::Main, "x &lt; y".to_string()),
            data: Artifact::new(Destination::Data, "data".to_string()),
        };
        let bytes = write_archive(Vec::new(), "shop", &sources).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
        let mut seen = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().into_owned();
            assert_eq!(entry.header().mode().unwrap(), ENTRY_MODE);
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            seen.push((path, body));
        }
        assert_eq!(
            seen,
            vec![
                ("shop/main.rs".to_string(), "x < y".to_string()),
                ("shop/data/sql.rs".to_string(), "data".to_string()),
            ]
        );
    }
}
