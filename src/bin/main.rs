//! SRT Mesher CLI
//!
//! Pack and inspect SRT vertex declarations and buffers.

use clap::{Parser, Subcommand};
use srt_mesher::{
    import_json, ChannelData, DrawCall, GeometryFlags, MissingChannelPolicy, PackerConfig,
    SrtPacker, VertexProperty,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "srt-mesher")]
#[command(author, version, about = "Pack and inspect SRT vertex data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack raw draw-call JSON into an SRT document
    Pack {
        /// Input JSON file containing draw calls with named vertex arrays
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Fail on missing channels instead of zero-filling them
        #[arg(long)]
        strict: bool,

        /// Omit the per-vertex payload (declaration tables only)
        #[arg(long)]
        no_vertices: bool,
    },

    /// Unpack an SRT document back to raw draw-call JSON
    Unpack {
        /// Input SRT JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show declaration tables and channel sets of an SRT document
    Info {
        /// Input SRT JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            input,
            output,
            strict,
            no_vertices,
        } => pack(&input, &output, strict, no_vertices)?,
        Commands::Unpack { input, output } => unpack(&input, &output)?,
        Commands::Info { input } => info(&input)?,
    }

    Ok(())
}

fn pack(
    input: &PathBuf,
    output: &PathBuf,
    strict: bool,
    no_vertices: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading draw calls from {:?}...", input);
    let json = fs::read_to_string(input)?;
    let asset: AssetInput = serde_json::from_str(&json)?;
    let calls = asset.into_draw_calls()?;
    println!("  Loaded {} draw calls", calls.len());

    let packer = SrtPacker::with_config(PackerConfig {
        missing_channels: if strict {
            MissingChannelPolicy::Strict
        } else {
            MissingChannelPolicy::ZeroFill
        },
        emit_vertices: !no_vertices,
    });

    let report = packer.pack(&calls)?;
    for warning in &report.warnings {
        println!(
            "  warning: draw call {} channel {:?} zero-filled",
            warning.draw_call, warning.property
        );
    }
    for (index, packed) in report.draw_calls.iter().enumerate() {
        println!(
            "  draw call {}: stride {} bytes, {} bytes packed",
            index,
            packed.decl.stride(),
            packed.buffer.len()
        );
    }

    let document_json = packer.export_json(&calls)?;
    fs::write(output, &document_json)?;
    println!("Exported SRT document ({} bytes) to {:?}", document_json.len(), output);

    Ok(())
}

fn unpack(input: &PathBuf, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading SRT document from {:?}...", input);
    let json = fs::read_to_string(input)?;
    let draw_calls = import_json(&json)?;
    println!("  Found {} draw calls", draw_calls.len());

    let asset = AssetInput::from_draw_calls(&draw_calls);
    fs::write(output, serde_json::to_string_pretty(&asset)?)?;
    println!("Wrote raw draw-call JSON to {:?}", output);

    Ok(())
}

fn info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading SRT document from {:?}...", input);
    let json = fs::read_to_string(input)?;
    let draw_calls = import_json(&json)?;

    println!("\nSRT Document Info:");
    println!("  Draw calls: {}", draw_calls.len());

    for (index, call) in draw_calls.iter().enumerate() {
        let flags = call.flags;
        println!("\n  Draw call {}:", index);
        println!(
            "    Classes: branches={} fronds={} leaves={} facing_leaves={} rigid_meshes={} grass={}",
            flags.branches,
            flags.fronds,
            flags.leaves,
            flags.facing_leaves,
            flags.rigid_meshes,
            flags.grass
        );
        println!(
            "    Vertices: {}  Indices: {}  Stride: {} bytes",
            call.vertex_count,
            call.index_count,
            call.decl.stride()
        );

        let channels: Vec<&str> = srt_mesher::registry::ALL_PROPERTIES
            .into_iter()
            .filter(|p| call.decl.contains(*p))
            .map(|p| p.as_str())
            .collect();
        println!("    Channels: {}", channels.join(", "));
    }

    Ok(())
}

// Raw draw-call JSON format, the host-facing side of the CLI.
#[derive(serde::Serialize, serde::Deserialize)]
struct AssetInput {
    #[serde(rename = "drawCalls")]
    draw_calls: Vec<DrawCallInput>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct DrawCallInput {
    #[serde(default)]
    branches: bool,
    #[serde(default)]
    fronds: bool,
    #[serde(default)]
    leaves: bool,
    #[serde(rename = "facingLeaves", default)]
    facing_leaves: bool,
    #[serde(rename = "rigidMeshes", default)]
    rigid_meshes: bool,
    #[serde(default)]
    grass: bool,
    #[serde(rename = "vertexCount")]
    vertex_count: u32,
    #[serde(default)]
    indices: Vec<u32>,
    /// Flat per-channel arrays keyed by engine channel name.
    #[serde(default)]
    channels: BTreeMap<String, Vec<f32>>,
}

impl AssetInput {
    fn into_draw_calls(self) -> Result<Vec<DrawCall>, Box<dyn std::error::Error>> {
        self.draw_calls
            .into_iter()
            .map(|input| {
                let mut channels = ChannelData::new();
                for (name, values) in input.channels {
                    let property = VertexProperty::from_str(&name)
                        .ok_or_else(|| format!("unknown channel name: {}", name))?;
                    channels.insert(property, values);
                }
                Ok(DrawCall {
                    flags: GeometryFlags {
                        branches: input.branches,
                        fronds: input.fronds,
                        leaves: input.leaves,
                        facing_leaves: input.facing_leaves,
                        rigid_meshes: input.rigid_meshes,
                        grass: input.grass,
                    },
                    vertex_count: input.vertex_count,
                    channels,
                    indices: input.indices,
                })
            })
            .collect()
    }

    fn from_draw_calls(calls: &[srt_mesher::UnpackedDrawCall]) -> Self {
        Self {
            draw_calls: calls
                .iter()
                .map(|call| DrawCallInput {
                    branches: call.flags.branches,
                    fronds: call.flags.fronds,
                    leaves: call.flags.leaves,
                    facing_leaves: call.flags.facing_leaves,
                    rigid_meshes: call.flags.rigid_meshes,
                    grass: call.flags.grass,
                    vertex_count: call.vertex_count,
                    indices: call.indices.clone(),
                    channels: call
                        .channels
                        .iter()
                        .map(|(p, v)| (p.as_str().to_string(), v.to_vec()))
                        .collect(),
                })
                .collect(),
        }
    }
}
