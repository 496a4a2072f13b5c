use std::{
    fmt::Display,
    fs::OpenOptions,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::error::{Error, Result};

use super::Stream;

/// How [`Stream::write_to`] treats an existing file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate the file first.
    #[default]
    Overwrite,
    Append,
}

impl<T: Display + 'static> Stream<T> {
    /// Drain the stream into the file at `path`, writing each element's
    /// display form with no separator. Returns the number of elements
    /// written.
    pub fn write_to(self, path: impl AsRef<Path>, mode: WriteMode) -> Result<usize> {
        let path = path.as_ref();
        let written = write_items(self, path, mode).map_err(|source| Error::Sink {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("wrote {written} elements to {}", path.display());
        Ok(written)
    }
}

fn write_items<T: Display + 'static>(
    stream: Stream<T>,
    path: &Path,
    mode: WriteMode,
) -> io::Result<usize> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Overwrite => options.write(true).truncate(true),
        WriteMode::Append => options.append(true),
    };
    let mut out = BufWriter::new(options.open(path)?);
    let mut written = 0;
    for item in stream {
        write!(out, "{item}")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn overwrite_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "stale").unwrap();

        let n = Stream::emit_all(["a", "b", "c"])
            .intersperse(",")
            .write_to(&path, WriteMode::Overwrite)
            .unwrap();
        assert_eq!(n, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b,c");

        Stream::emit("\n").write_to(&path, WriteMode::Append).unwrap();
        Stream::range(1, 4, 1)
            .write_to(&path, WriteMode::Append)
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b,c\n123");
    }

    #[test]
    fn empty_stream_creates_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        let n = Stream::<String>::empty()
            .write_to(&path, WriteMode::default())
            .unwrap();
        assert_eq!(n, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn unopenable_path_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        match Stream::emit(1).write_to(&path, WriteMode::Overwrite) {
            Err(Error::Sink { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a sink error, got {other:?}"),
        }
    }
}
