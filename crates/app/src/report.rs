use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use stakepick_core_pipeline::SelectionStats;
use stakepick_core_types::{BlockRef, ReportRow};

use crate::Error;

/// Outcome of a selection run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Relay chain block the staking tables were read at
    pub block: BlockRef,

    /// Active era at `block`
    pub era: u32,

    /// Block the identity tables were read at
    pub identity_block: BlockRef,

    pub generated_at: OffsetDateTime,

    /// Selected validators, by ascending commission
    pub rows: Vec<ReportRow>,

    pub stats: SelectionStats,
}

impl Report {
    /// `YYYYMMDD-<block>.json`, dated in UTC.
    pub fn file_name(&self) -> String {
        let date = self.generated_at.to_offset(time::UtcOffset::UTC).date();
        format!(
            "{:04}{:02}{:02}-{}.json",
            date.year(),
            u8::from(date.month()),
            date.day(),
            self.block
        )
    }

    /// Write the rows as a pretty-printed JSON array into `dir`, creating it
    /// if needed. Returns the path of the written file.
    pub fn write_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let dir = dir.as_ref();
        let path = dir.join(self.file_name());

        let io_error = |source| Error::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_error)?;

        let mut writer = BufWriter::new(File::create(&path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, &self.rows).map_err(Error::Json)?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)?;

        Ok(path)
    }

    /// Human-readable rendering of the report.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "block {} | era {} | validators {} | active {} | selected {}",
            self.block, self.era, self.stats.total, self.stats.active, self.stats.selected
        )?;

        if self.identity_block != self.block {
            writeln!(out, "identities read at block {}", self.identity_block)?;
        }

        for (reason, count) in &self.stats.exclusions {
            writeln!(out, "  excluded, {reason}: {count}")?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "{:<32} {:>10}  {:<48}  ACCOUNT ID",
            "DISPLAY NAME", "COMMISSION", "ADDRESS"
        )?;

        for row in &self.rows {
            writeln!(
                out,
                "{:<32} {:>10}  {:<48}  {}",
                row.display_name.as_deref().unwrap_or("-"),
                row.commission,
                row.address,
                row.account_id
            )?;
        }

        Ok(())
    }
}
