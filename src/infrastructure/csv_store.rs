// Append-only CSV file implementation of the emission repository
//
// One record per line, no header:
// timestamp,onshore,offshore,solar,conventional,total,gCO2_per_kWh
use crate::application::emission_repository::{EmissionRepository, StoreError};
use crate::domain::emission::{EmissionRecord, EmissionSeries};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const FIELD_COUNT: usize = 7;
/// Local time with microseconds, sortable as text
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Accepts any fraction length, or none
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub struct CsvEmissionStore {
    path: PathBuf,
    // Serialises appends, reads and archiving on the one file
    lock: Mutex<()>,
}

impl CsvEmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(record: &EmissionRecord) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record([
                record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                record.onshore.to_string(),
                record.offshore.to_string(),
                record.solar.to_string(),
                record.conventional.to_string(),
                record.total.to_string(),
                record.g_co2_per_kwh.to_string(),
            ])
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;

        writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))
    }

    fn parse_line(line: &str, line_number: usize) -> Result<EmissionRecord, StoreError> {
        let malformed = |reason: String| StoreError::MalformedRecord {
            line: line_number,
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        let fields = reader
            .records()
            .next()
            .transpose()
            .map_err(|e| malformed(e.to_string()))?
            .ok_or_else(|| malformed("empty record".to_string()))?;

        if fields.len() != FIELD_COUNT {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let timestamp = NaiveDateTime::parse_from_str(&fields[0], TIMESTAMP_PARSE_FORMAT)
            .map_err(|e| malformed(format!("invalid timestamp {:?}: {}", &fields[0], e)))?;
        let number = |idx: usize| -> Result<f64, StoreError> {
            fields[idx]
                .trim()
                .parse::<f64>()
                .map_err(|e| malformed(format!("field {} {:?}: {}", idx + 1, &fields[idx], e)))
        };

        Ok(EmissionRecord {
            timestamp,
            onshore: number(1)?,
            offshore: number(2)?,
            solar: number(3)?,
            conventional: number(4)?,
            total: number(5)?,
            g_co2_per_kwh: number(6)?,
        })
    }

    /// Take the last `n` lines, ignoring trailing blank ones. A blank line
    /// inside the window ends the read.
    fn parse_latest(content: &str, n: usize) -> Result<EmissionSeries, StoreError> {
        let mut lines: Vec<&str> = content
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        // n = 0 yields an empty series, not the whole file
        let start = lines.len().saturating_sub(n);
        let mut series = EmissionSeries::default();
        for (offset, line) in lines[start..].iter().enumerate() {
            if line.is_empty() {
                break;
            }
            series.push(&Self::parse_line(line, start + offset + 1)?);
        }

        Ok(series)
    }

    fn backup_path(&self, stamp: &str, attempt: u32) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.csv".to_string());
        let file_name = match attempt {
            0 => format!("{}.{}.bak", name, stamp),
            n => format!("{}.{}-{}.bak", name, stamp, n),
        };
        self.path.with_file_name(file_name)
    }

    /// Copy the live file into a fresh backup, then truncate it. Never
    /// overwrites an existing backup. Caller holds the lock.
    async fn archive_as(&self, stamp: &str) -> Result<PathBuf, StoreError> {
        self.ensure_parent().await?;

        let mut attempt = 0;
        let (backup, mut file) = loop {
            let candidate = self.backup_path(stamp, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&candidate).await {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        // Copy first, truncate second: a failed copy leaves the live file intact
        match fs::read(&self.path).await {
            Ok(content) => file.write_all(&content).await?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        file.flush().await?;

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        Ok(backup)
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EmissionRepository for CsvEmissionStore {
    async fn append(&self, record: &EmissionRecord) -> Result<(), StoreError> {
        let line = Self::encode(record)?;
        let _guard = self.lock.lock().await;

        self.ensure_parent().await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::debug!("Appended record to {}", self.path.display());
        Ok(())
    }

    async fn read_latest(&self, n: usize) -> Result<EmissionSeries, StoreError> {
        let content = {
            let _guard = self.lock.lock().await;
            match fs::read_to_string(&self.path).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
                Err(e) => return Err(e.into()),
            }
        };

        Self::parse_latest(&content, n)
    }

    async fn archive(&self) -> Result<PathBuf, StoreError> {
        let _guard = self.lock.lock().await;
        let stamp = Local::now().format("%Y%m%dT%H%M%S%6f").to_string();
        self.archive_as(&stamp).await
    }
}
