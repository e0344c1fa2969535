#[macro_use]
extern crate tracing;

use anyhow::Context;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tessera_common::{ArchivedBundledLevel, ArchivedLevelBundle, Level};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(argh::FromArgs)]
/// inspect a bundle of processed levels
struct Args {
    #[argh(positional)]
    /// file containing the level bundle
    bundle: PathBuf,

    #[argh(option)]
    /// only show the level with this name
    level: Option<String>,

    #[argh(switch)]
    /// check that every level's rectangles cover exactly its walls
    verify: bool,

    #[argh(switch)]
    /// skip the checking of the bundle data
    ///
    /// will speed up initial loads at the cost of potential segfaults
    skip_checks: bool,
}

/// Rasterises a level: `#` rectangle cover, `P` player, `G` goal, `.` empty.
fn render(out: &mut impl Write, width: u32, height: u32, level: &Level) -> io::Result<()> {
    let (width, height) = (width as usize, height as usize);
    let mut canvas = vec![b'.'; width * height];

    let mut plot = |x: u32, y: u32, ch: u8| {
        let (x, y) = (x as usize, y as usize);
        if x < width && y < height {
            canvas[y * width + x] = ch;
        }
    };

    for rect in &level.optimized_walls {
        for (x, y) in rect.cells() {
            plot(x, y, b'#');
        }
    }
    if let Some(player) = &level.player {
        plot(player.position.x, player.position.y, b'P');
    }
    if let Some(goal) = &level.goal {
        plot(goal.position.x, goal.position.y, b'G');
    }

    for row in canvas.chunks(width.max(1)) {
        out.write_all(row)?;
        out.write_all(b"\n")?;
    }

    Ok(())
}

fn show(out: &mut impl Write, entry: &ArchivedBundledLevel, verify: bool) -> anyhow::Result<()> {
    let name = entry.name.as_str();
    let level = rkyv::deserialize::<Level, rkyv::rancor::Error>(&entry.level)?;
    let (width, height) = (entry.width.to_native(), entry.height.to_native());

    if verify {
        level
            .verify_cover()
            .with_context(|| format!("level {name} failed verification"))?;
        info!(name, "cover verified");
    }

    writeln!(
        out,
        "{name} ({width}x{height}): {} walls in {} rects",
        level.walls.len(),
        level.optimized_walls.len()
    )?;
    render(out, width, height, &level)?;
    writeln!(out)?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    info!("loading bundle..");
    let data_file = File::open(&args.bundle)
        .with_context(|| format!("failed to open {}", args.bundle.display()))?;
    let data = unsafe { memmap2::Mmap::map(&data_file)? };

    let bundle: &ArchivedLevelBundle = if args.skip_checks {
        unsafe { rkyv::access_unchecked(&data) }
    } else {
        rkyv::access::<_, rkyv::rancor::Error>(&data)?
    };

    info!(levels = bundle.levels.len(), "loaded bundle successfully");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut shown = 0;
    for entry in bundle.levels.iter() {
        if args
            .level
            .as_deref()
            .is_some_and(|wanted| wanted != entry.name.as_str())
        {
            continue;
        }

        show(&mut out, entry, args.verify)?;
        shown += 1;
    }
    out.flush()?;

    if let Some(wanted) = &args.level {
        if shown == 0 {
            anyhow::bail!("no level named {wanted} in bundle");
        }
    }

    Ok(())
}
