use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use ctm_core::{CompressionMethod, VertexPrecision};
use ctm_tools::{init_logging, ConvertOptions, Converter, ConverterRegistry, SystemCommandRunner};

#[derive(Parser)]
#[command(name = "ctmconv", version, about = "Convert meshes to OpenCTM and re-compress CTM files")]
struct Cli {
    /// Input mesh (.ctm, or any extension with a registered converter)
    input: PathBuf,

    /// Output CTM file
    output: PathBuf,

    /// Compression method: raw, mg1 or mg2
    #[arg(long)]
    method: Option<CompressionMethod>,

    /// Compression level, 0-9
    #[arg(long)]
    level: Option<u32>,

    /// Absolute vertex precision (MG2)
    #[arg(long, conflicts_with = "vprecrel")]
    vprec: Option<f32>,

    /// Vertex precision relative to the bounding box diagonal (MG2)
    #[arg(long)]
    vprecrel: Option<f32>,

    /// Normal precision (MG2)
    #[arg(long)]
    nprec: Option<f32>,

    /// UV coordinate precision (MG2)
    #[arg(long)]
    tprec: Option<f32>,

    /// Attribute precision (MG2)
    #[arg(long)]
    aprec: Option<f32>,

    /// File comment; defaults to the input's comment
    #[arg(long)]
    comment: Option<String>,

    #[arg(long)]
    no_normals: bool,

    #[arg(long)]
    no_texcoords: bool,

    #[arg(long)]
    no_attributes: bool,

    /// External converter, e.g. `obj=obj2ctm {input} {output}`
    #[arg(long = "convert", value_name = "EXT=COMMAND")]
    converters: Vec<String>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        let vertex_precision = match (self.vprec, self.vprecrel) {
            (Some(step), _) => Some(VertexPrecision::Absolute(step)),
            (None, Some(fraction)) => Some(VertexPrecision::Relative(fraction)),
            (None, None) => None,
        };
        ConvertOptions {
            method: self.method,
            level: self.level,
            vertex_precision,
            normal_precision: self.nprec,
            uv_precision: self.tprec,
            attrib_precision: self.aprec,
            comment: self.comment.clone(),
            strip_normals: self.no_normals,
            strip_uv_maps: self.no_texcoords,
            strip_attrib_maps: self.no_attributes,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut registry = ConverterRegistry::new();
    for spec in &cli.converters {
        registry.register_spec(spec)?;
    }

    let runner = SystemCommandRunner;
    Converter::new(&registry, &runner)
        .convert(&cli.input, &cli.output, &cli.options())
        .with_context(|| {
            format!("converting {} to {}", cli.input.display(), cli.output.display())
        })?;
    Ok(())
}
