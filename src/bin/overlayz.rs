use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "overlayz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite overlays on a base image and export a PNG.
    Compose(ComposeArgs),
    /// Print the overlay catalog as JSON.
    Catalog(CatalogArgs),
    /// Decode a ledger metadata blob and print the resolved image URL.
    Metadata(MetadataArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Base image (path, `file://`, `data:`, `http(s)://` or `ipfs://` URL).
    #[arg(long)]
    base: String,

    /// Overlay as `<id>=<src>[@x,y,scale]`; repeatable, applied in order.
    #[arg(long = "overlay", value_parser = parse_overlay_arg)]
    overlays: Vec<OverlayArg>,

    /// Host region the surface is fitted into.
    #[arg(long, default_value = "600x600")]
    region: overlayz::HostRegion,

    /// Engine options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Directory relative sources are resolved against.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Gateway used for `ipfs://` sources.
    #[arg(long, default_value = overlayz::DEFAULT_IPFS_GATEWAY)]
    gateway: String,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Output file name without extension.
    #[arg(long, default_value = overlayz::DEFAULT_EXPORT_BASE)]
    name: String,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Catalog JSON to validate and print instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MetadataArgs {
    /// Hex or base64 encoded metadata blob.
    blob: String,

    /// Gateway used for `ipfs://` references.
    #[arg(long, default_value = overlayz::DEFAULT_IPFS_GATEWAY)]
    gateway: String,
}

#[derive(Clone, Debug)]
struct OverlayArg {
    id: String,
    source: String,
    transform: Option<(i32, i32, f64)>,
}

fn parse_overlay_arg(s: &str) -> Result<OverlayArg, String> {
    let (id, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("overlay '{s}' is not <id>=<src>[@x,y,scale]"))?;
    if id.is_empty() {
        return Err(format!("overlay '{s}' has an empty id"));
    }

    let (source, transform) = match rest.rsplit_once('@') {
        Some((src, t)) => match parse_transform(t) {
            Some(t) => (src, Some(t)),
            None => (rest, None),
        },
        None => (rest, None),
    };
    if source.is_empty() {
        return Err(format!("overlay '{s}' has an empty source"));
    }

    Ok(OverlayArg {
        id: id.to_string(),
        source: source.to_string(),
        transform,
    })
}

fn parse_transform(s: &str) -> Option<(i32, i32, f64)> {
    let mut parts = s.split(',').map(str::trim);
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let scale = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((x, y, scale))
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Catalog(args) => cmd_catalog(args),
        Command::Metadata(args) => cmd_metadata(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("OVERLAYZ_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let opts = match &args.opts {
        Some(path) => overlayz::EngineOpts::from_path(path)?,
        None => overlayz::EngineOpts::default(),
    };

    #[cfg(feature = "http")]
    let loader = {
        let loader = overlayz::HttpLoader::new().with_gateway(&args.gateway);
        match &args.root {
            Some(root) => loader.with_root(root),
            None => loader,
        }
    };
    #[cfg(not(feature = "http"))]
    let loader = match &args.root {
        Some(root) => overlayz::LocalLoader::with_root(root),
        None => overlayz::LocalLoader::new(),
    };
    #[cfg(not(feature = "http"))]
    if args.gateway != overlayz::DEFAULT_IPFS_GATEWAY {
        tracing::warn!("--gateway has no effect without the `http` feature");
    }

    compose(loader, opts, &args)
}

fn compose<L: overlayz::ImageLoader>(
    loader: L,
    opts: overlayz::EngineOpts,
    args: &ComposeArgs,
) -> anyhow::Result<()> {
    let mut engine = overlayz::CompositeEngine::new(loader, opts);
    engine.initialize(args.region)?;

    pollster::block_on(engine.set_base_image(&overlayz::ImageSource::url(&args.base)))
        .with_context(|| format!("load base image '{}'", args.base))?;

    for ov in &args.overlays {
        let entry = overlayz::CatalogEntry::new(&ov.id, &ov.id, &ov.source);
        let applied = pollster::block_on(engine.add_or_toggle_overlay(&entry))
            .with_context(|| format!("load overlay '{}'", ov.id))?;
        if applied.is_none() {
            eprintln!("overlay '{}' given twice; toggled off", ov.id);
            continue;
        }
        if let Some((x, y, scale)) = ov.transform {
            let patch = overlayz::TransformPatch::new().offset(x, y).scale(scale);
            engine.update_overlay_transform(&ov.id, patch);
        }
    }

    let mut sink = overlayz::DownloadSink::new(&args.out_dir);
    let exported = pollster::block_on(engine.export_composite(&args.name, &mut sink))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out_dir.join(&exported.file_name).display(),
        exported.width,
        exported.height
    );
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => overlayz::OverlayCatalog::from_path(path)?,
        None => overlayz::OverlayCatalog::builtin(),
    };
    let json = serde_json::to_string_pretty(&catalog).context("serialize catalog")?;
    println!("{json}");
    Ok(())
}

fn cmd_metadata(args: MetadataArgs) -> anyhow::Result<()> {
    let meta = overlayz::decode_metadata_blob(&args.blob);
    match &meta {
        overlayz::TokenMetadata::Link(_) => {
            let link = meta.link_url(&args.gateway).unwrap_or_default();
            println!("link: {link}");
        }
        overlayz::TokenMetadata::Inline(doc) => {
            let json = serde_json::to_string_pretty(doc).context("serialize metadata")?;
            println!("{json}");
            match meta.image_source(&args.gateway) {
                Some(overlayz::ImageSource::Url(url)) => println!("image: {url}"),
                _ => println!("image: <none>"),
            }
        }
        overlayz::TokenMetadata::Empty => anyhow::bail!("metadata blob could not be decoded"),
    }
    Ok(())
}
