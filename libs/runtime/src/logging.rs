use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendCount, AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        // unknown or empty strings fall back to info
        _ => Some(Level::INFO),
    }
}

/// Returns true if `target` is `crate_name` itself or one of its submodules.
fn belongs_to(target: &str, crate_name: &str) -> bool {
    target
        .strip_prefix(crate_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Accepts everything up to `max_level` that is NOT claimed by an explicit subsystem section.
fn unclaimed_filter(
    claimed: Vec<String>,
    max_level: Level,
) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool> {
    FilterFn::new(move |meta: &tracing::Metadata<'_>| {
        let target = meta.target();
        !claimed.iter().any(|c| belongs_to(target, c)) && *meta.level() <= max_level
    })
}

// ---------------- file sinks ----------------

enum Rotator {
    Timestamped(FileRotate<AppendTimestamp>),
    Counted(FileRotate<AppendCount>),
}

impl Write for Rotator {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Rotator::Timestamped(f) => f.write(buf),
            Rotator::Counted(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Rotator::Timestamped(f) => f.flush(),
            Rotator::Counted(f) => f.flush(),
        }
    }
}

/// Shared handle to one rotating log file.
#[derive(Clone)]
struct LogFile(Arc<Mutex<Rotator>>);

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer that silently drops records when no file is routed for a target.
struct MaybeFile(Option<LogFile>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

/// Routes JSON records to per-subsystem files by target prefix, falling back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<LogFile>,
    by_subsystem: HashMap<String, LogFile>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<LogFile> {
        self.by_subsystem
            .iter()
            .find(|(name, _)| belongs_to(target, name))
            .map(|(_, f)| f.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_subsystem.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.route(meta.target()))
    }
}

/// Resolve a log file path against `base_dir` (the server home dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_log_file(path: &Path, section: &Section) -> std::io::Result<LogFile> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let content_limit = ContentLimit::BytesSurpassed(max_bytes as usize);

    let rotator = match section.max_backups {
        Some(0) => Rotator::Timestamped(FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(1))),
            content_limit,
            Compression::None,
            #[cfg(unix)]
            None,
        )),
        other => Rotator::Counted(FileRotate::new(
            path,
            AppendCount::new(other.unwrap_or(DEFAULT_MAX_BACKUPS)),
            content_limit,
            Compression::None,
            #[cfg(unix)]
            None,
        )),
    };

    Ok(LogFile(Arc::new(Mutex::new(rotator))))
}

fn file_for(name: &str, section: &Section, base_dir: &Path) -> Option<LogFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = resolve_log_path(&section.file, base_dir);
    match open_log_file(&path, section) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

// ---------------- plan ----------------

/// Everything needed to assemble the subscriber, computed from a `LoggingConfig`.
struct LogPlan<'a> {
    default: Option<&'a Section>,
    subsystems: Vec<(&'a str, &'a Section)>,
}

impl<'a> LogPlan<'a> {
    fn new(cfg: &'a LoggingConfig) -> Self {
        let mut subsystems: Vec<(&str, &Section)> = cfg
            .iter()
            .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        subsystems.sort_by_key(|(k, _)| *k);
        Self {
            default: cfg.get(DEFAULT_SECTION),
            subsystems,
        }
    }

    fn claimed(&self) -> Vec<String> {
        self.subsystems.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn console_targets(&self) -> Targets {
        self.subsystems
            .iter()
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, s)| {
                match parse_level(&s.console_level) {
                    Some(level) => t.with_target(*name, LevelFilter::from_level(level)),
                    None => t,
                }
            })
    }

    fn file_targets(&self) -> Targets {
        self.subsystems
            .iter()
            .filter(|(_, s)| !s.file.trim().is_empty())
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, s)| {
                match parse_level(&s.file_level) {
                    Some(level) => t.with_target(*name, LevelFilter::from_level(level)),
                    None => t,
                }
            })
    }

    fn file_router(&self, base_dir: &Path) -> FileRouter {
        let mut router = FileRouter {
            default: self
                .default
                .and_then(|s| file_for(DEFAULT_SECTION, s, base_dir)),
            ..Default::default()
        };
        for (name, section) in &self.subsystems {
            if let Some(f) = file_for(name, section, base_dir) {
                router.by_subsystem.insert((*name).to_string(), f);
            }
        }
        router
    }
}

// ---------------- public init ----------------

/// Initialize the global subscriber from a logging configuration.
///
/// Console output is human-readable; file output is JSON, one record per line.
/// Relative file paths are resolved against `base_dir` (usually `server.home_dir`).
/// Calling this more than once is harmless: later calls are ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` records into tracing before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let plan = LogPlan::new(cfg);
    let router = plan.file_router(base_dir);
    let ansi = std::io::stdout().is_terminal();

    let console_explicit = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(plan.console_targets());

    let file_explicit = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router.clone())
            .with_filter(plan.file_targets())
    });

    let console_default = plan
        .default
        .and_then(|s| parse_level(&s.console_level))
        .map(|level| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(unclaimed_filter(plan.claimed(), level))
        });

    let file_default = plan
        .default
        .filter(|_| router.default.is_some())
        .and_then(|s| parse_level(&s.file_level))
        .map(|level| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(unclaimed_filter(plan.claimed(), level))
        });

    let _ = Registry::default()
        .with(console_explicit)
        .with(file_explicit)
        .with(console_default)
        .with(file_default)
        .try_init();
}
