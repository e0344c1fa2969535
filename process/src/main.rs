#[macro_use]
extern crate tracing;

use anyhow::{Context, bail};
use image::GenericImageView;
use itertools::Itertools;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};
use tessera_common::{BundledLevel, Level, LevelBundle, Pixel};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_INPUT: &str = "public/mapImages";

#[derive(argh::FromArgs)]
/// turn a directory of level images into level data
struct Args {
    #[argh(positional)]
    /// path to the directory with level images (default: public/mapImages)
    path: Option<PathBuf>,

    #[argh(option, default = "PathBuf::from(\"public/mapData\")")]
    /// directory the JSON level files are written to
    output: PathBuf,

    #[argh(option)]
    /// also pack every level into this archive
    bundle: Option<PathBuf>,

    #[argh(option)]
    /// number of images decoded in parallel
    jobs: Option<NonZeroUsize>,
}

struct Processed {
    width: u32,
    height: u32,
    level: Level,
}

fn read_level(entry_path: &Path) -> anyhow::Result<Processed> {
    let image = image::open(entry_path)?;
    let (width, height) = image.dimensions();

    let pixels = image
        .to_rgba8()
        .pixels()
        .map(|pixel| Pixel::from(pixel.0))
        .collect_vec();
    let level = Level::from_pixels(width, height, pixels)?;

    debug!(
        path = %entry_path.display(),
        walls = level.walls.len(),
        rects = level.optimized_walls.len(),
        "read level"
    );

    Ok(Processed {
        width,
        height,
        level,
    })
}

fn write_level(output_path: &Path, level: &Level) -> anyhow::Result<()> {
    let file = File::create(output_path)?;
    let mut file = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut file, level)?;
    file.flush()?;

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

/// Decodes every image on `jobs` threads. Results come back in input order.
fn read_all(files: &[PathBuf], jobs: usize) -> Vec<anyhow::Result<Processed>> {
    let cursor = AtomicUsize::new(0);

    let mut results = thread::scope(|scope| {
        let workers = (0..jobs.min(files.len()))
            .map(|idx| {
                let cursor = &cursor;
                scope.spawn(move || {
                    debug!("spawning worker {idx}");

                    let mut acc = Vec::new();
                    loop {
                        let idx = cursor.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = files.get(idx) else {
                            break acc;
                        };
                        acc.push((idx, read_level(path)));
                    }
                })
            })
            .collect_vec();

        workers
            .into_iter()
            .flat_map(|worker| match worker.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect_vec()
    });

    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, result)| result).collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    let input = args.path.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    if !input.is_dir() {
        bail!("input directory not found: {}", input.display());
    }

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut files: Vec<PathBuf> = fs::read_dir(&input)?
        .map_ok(|entry| entry.path())
        .filter_ok(|path| is_png(path))
        .try_collect()?;
    files.sort();

    let jobs = args
        .jobs
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);

    info!(images = files.len(), jobs, "processing levels..");

    let mut bundle = LevelBundle::default();
    let mut failed = 0;

    for (entry_path, result) in files.iter().zip(read_all(&files, jobs)) {
        let processed = match result {
            Ok(processed) => processed,
            Err(error) => {
                error!(?error, path = %entry_path.display(), "failed to read level");
                failed += 1;
                continue;
            }
        };

        let Some(stem) = entry_path.file_stem() else {
            continue;
        };
        let mut file_name = stem.to_os_string();
        file_name.push(".json");
        let output_path = args.output.join(file_name);

        if let Err(error) = write_level(&output_path, &processed.level) {
            error!(?error, path = %output_path.display(), "failed to write level");
            failed += 1;
            continue;
        }
        info!(path = %output_path.display(), "generated");

        if args.bundle.is_some() {
            bundle.levels.push(BundledLevel {
                name: stem.to_string_lossy().into_owned(),
                width: processed.width,
                height: processed.height,
                level: processed.level,
            });
        }
    }

    if let Some(bundle_path) = &args.bundle {
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&bundle)?;
        fs::write(bundle_path, bytes.as_slice())
            .with_context(|| format!("failed to write {}", bundle_path.display()))?;
        info!(path = %bundle_path.display(), levels = bundle.levels.len(), "wrote bundle");
    }

    if failed > 0 {
        bail!("{failed} of {} levels failed", files.len());
    }

    Ok(())
}
