//! Bar sinks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tickbar_core::{Error, OhlcvBar, Result, BAR_HEADER, TIMESTAMP_FORMAT};

/// Receiver for completed bars, in increasing interval order.
pub trait BarSink {
    /// Accept one bar.
    fn emit(&mut self, bar: &OhlcvBar) -> Result<()>;
}

impl BarSink for Vec<OhlcvBar> {
    fn emit(&mut self, bar: &OhlcvBar) -> Result<()> {
        self.push(bar.clone());
        Ok(())
    }
}

/// Adapter turning a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> BarSink for FnSink<F>
where
    F: FnMut(&OhlcvBar) -> Result<()>,
{
    fn emit(&mut self, bar: &OhlcvBar) -> Result<()> {
        (self.0)(bar)
    }
}

/// CSV sink writing `timestamp,open,high,low,close,volume` rows.
///
/// The timestamp column uses the same format the ticks were parsed with
/// ([`TIMESTAMP_FORMAT`] unless overridden).
pub struct CsvBarSink<W: Write> {
    writer: csv::Writer<W>,
    timestamp_format: String,
    rows: usize,
}

impl CsvBarSink<BufWriter<File>> {
    /// Create (or truncate) a CSV file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvBarSink<W> {
    /// Wrap a writer; the header row is written immediately.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(BAR_HEADER)?;
        Ok(Self {
            writer,
            timestamp_format: TIMESTAMP_FORMAT.to_string(),
            rows: 0,
        })
    }

    /// Render interval starts with `format` instead of the default.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

impl<W: Write> BarSink for CsvBarSink<W> {
    fn emit(&mut self, bar: &OhlcvBar) -> Result<()> {
        self.writer
            .write_record(&bar.to_record(&self.timestamp_format))?;
        self.rows += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(minute: u32, close: f64) -> OhlcvBar {
        OhlcvBar {
            interval_start: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            open: 10.0,
            high: 12.5,
            low: 9.5,
            close,
            volume: 8,
        }
    }

    #[test]
    fn test_vec_sink() {
        let mut bars: Vec<OhlcvBar> = Vec::new();
        bars.emit(&make_bar(30, 12.0)).unwrap();
        bars.emit(&make_bar(31, 11.0)).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 11.0);
    }

    #[test]
    fn test_fn_sink() {
        let mut volume = 0;
        {
            let mut sink = FnSink(|bar: &OhlcvBar| -> Result<()> {
                volume += bar.volume;
                Ok(())
            });
            sink.emit(&make_bar(30, 12.0)).unwrap();
            sink.emit(&make_bar(31, 12.0)).unwrap();
        }
        assert_eq!(volume, 16);
    }

    #[test]
    fn test_fn_sink_propagates_error() {
        let mut sink =
            FnSink(|_: &OhlcvBar| -> Result<()> { Err(Error::Other("sink closed".to_string())) });
        assert!(sink.emit(&make_bar(30, 12.0)).is_err());
    }

    #[test]
    fn test_csv_sink_output() {
        let mut sink = CsvBarSink::new(Vec::new()).unwrap();
        sink.emit(&make_bar(30, 12.0)).unwrap();
        sink.emit(&make_bar(31, 11.25)).unwrap();
        assert_eq!(sink.rows(), 2);

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "timestamp,open,high,low,close,volume\n\
             2024-01-02 09:30:00,10,12.5,9.5,12,8\n\
             2024-01-02 09:31:00,10,12.5,9.5,11.25,8\n"
        );
    }

    #[test]
    fn test_csv_sink_custom_timestamp_format() {
        let mut sink = CsvBarSink::new(Vec::new())
            .unwrap()
            .with_timestamp_format("%d/%m/%Y %H:%M:%S");
        sink.emit(&make_bar(30, 12.0)).unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,open,high,low,close,volume");
        assert_eq!(lines[1], "02/01/2024 09:30:00,10,12.5,9.5,12,8");
    }

    #[test]
    fn test_csv_sink_header_only() {
        let sink = CsvBarSink::new(Vec::new()).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(text, "timestamp,open,high,low,close,volume\n");
    }

    #[test]
    fn test_csv_sink_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");

        let mut sink = CsvBarSink::create(&path).unwrap();
        sink.emit(&make_bar(30, 12.0)).unwrap();
        sink.flush().unwrap();
        drop(sink);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("timestamp,open,high,low,close,volume"));
    }
}
