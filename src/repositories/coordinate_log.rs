use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::NaiveDate;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::models::CoordinateSample;

const HEADER: &str = "lat,lon,date";

/// Companion log of externally submitted locations, one `lat,lon,date`
/// line per sample.
pub struct CoordinateLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CoordinateLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn append(&self, sample: &CoordinateSample) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StoreError::io(parent, err))?;
            }
        }

        let needs_header = match fs::metadata(&self.path).await {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        let mut content = String::new();
        if needs_header {
            content.push_str(HEADER);
            content.push('\n');
        }
        content.push_str(&format!("{},{},{}\n", sample.lat, sample.lon, sample.date));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;

        Ok(())
    }

    pub async fn read_all(&self) -> Result<Vec<CoordinateSample>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        Ok(content
            .lines()
            .enumerate()
            .filter_map(|(number, line)| {
                let sample = parse_line(line);
                if sample.is_none() && !line.trim().is_empty() && line.trim() != HEADER {
                    debug!("Skipping coordinate log line {}: {:?}", number + 1, line);
                }
                sample
            })
            .collect())
    }
}

fn parse_line(line: &str) -> Option<CoordinateSample> {
    let mut fields = line.split(',').map(str::trim);
    let lat = fields.next()?.parse::<f64>().ok()?;
    let lon = fields.next()?.parse::<f64>().ok()?;
    let date = fields.next()?.parse::<NaiveDate>().ok()?;
    if fields.next().is_some() || !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some(CoordinateSample { lat, lon, date })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(lat: f64, lon: f64) -> CoordinateSample {
        CoordinateSample {
            lat,
            lon,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coords.csv");
        let log = CoordinateLog::new(&path);

        log.append(&sample(1.5, 2.5)).await.unwrap();
        log.append(&sample(-3.0, 4.0)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "lat,lon,date\n1.5,2.5,2024-07-01\n-3,4,2024-07-01\n");

        let samples = log.read_all().await.unwrap();
        assert_eq!(samples, vec![sample(1.5, 2.5), sample(-3.0, 4.0)]);
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coords.csv");
        std::fs::write(
            &path,
            "lat,lon,date\n1,2,2024-07-01\nbroken\n1,2,not-a-date\n\n3,4,2024-07-01,extra\n",
        )
        .unwrap();

        let samples = CoordinateLog::new(&path).read_all().await.unwrap();
        assert_eq!(samples, vec![sample(1.0, 2.0)]);
    }

    #[tokio::test]
    async fn test_missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = CoordinateLog::new(dir.path().join("none.csv"));
        assert!(log.read_all().await.unwrap().is_empty());
    }
}
