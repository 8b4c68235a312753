use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description;

use crate::infra::Move;

/// Records every turn as a `> input` line followed by a `< move` line.
pub struct ReplayFile {
    file: File,
    path: PathBuf,
}

impl ReplayFile {
    /// Creates `<label> - <yyyymmdd-hhmmss>.replay` inside `replays_folder`.
    pub fn new(replays_folder: &Path, label: &str) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let format = format_description::parse("[year][month][day]-[hour][minute][second]")
            .map_err(io::Error::other)?;
        let date_time_str = now.format(&format).map_err(io::Error::other)?;

        let path = replays_folder.join(format!("{} - {}.replay", label, date_time_str));
        Self::create(path)
    }

    pub fn create(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        Ok(ReplayFile { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, input: &str, mv: Move) -> io::Result<()> {
        writeln!(self.file, "> {}", input.trim_end())?;
        writeln!(self.file, "< {}", mv.as_str_name())?;
        self.file.flush()
    }
}
