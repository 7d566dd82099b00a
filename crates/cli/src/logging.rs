use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Env, Target, WriteStyle};

use rtsp_inference_core::shared::constants::LOG_FILE_NAME;

/// Installs the global logger: `RUST_LOG` filtering (default `info`),
/// one `<timestamp> <LEVEL> <message>` line per record, written to both
/// stdout and `<log_dir>/app.log`.
pub fn init(log_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter::new(file))))
        .try_init()
        .map_err(io::Error::other)
}

/// Mirrors every write to stdout and a log file.
struct TeeWriter {
    stdout: io::Stdout,
    file: File,
}

impl TeeWriter {
    fn new(file: File) -> Self {
        Self {
            stdout: io::stdout(),
            file,
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.file.flush()
    }
}
