//! glbread - inspect and assemble GLB containers

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use glbread_core::{tokenize, GlbError, Token};
use glbread_io::{
    demux, parse_glb, write_container, ParseOptions, ParsedGlb, SceneParser, StagingLayout,
};
use log::{debug, LevelFilter};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "glbread")]
#[command(about = "Inspect and assemble GLB containers")]
#[command(version)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print chunk ranges, token count and the extracted records
    Inspect {
        /// Input GLB file
        input: PathBuf,

        /// Skip cross-reference validation
        #[arg(long)]
        no_validate: bool,

        /// Reject documents with more tokens than this
        #[arg(long)]
        max_tokens: Option<usize>,
    },

    /// Dump the JSON token stream
    Tokens {
        /// Input GLB file
        input: PathBuf,
    },

    /// Assemble a GLB from a JSON document and a binary blob
    Pack {
        /// glTF JSON document
        json: PathBuf,

        /// Binary blob for the BIN chunk
        bin: PathBuf,

        /// Output .glb file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the staging layout of every mesh
    Staging {
        /// Input GLB file
        input: PathBuf,
    },
}

#[derive(Error, Debug)]
enum ToolError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {} failed: {source}", path.display(), source.stage())]
    Glb {
        path: PathBuf,
        #[source]
        source: GlbError,
    },
}

type Result<T> = std::result::Result<T, ToolError>;

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn glb_error(path: &Path) -> impl FnOnce(GlbError) -> ToolError + '_ {
    move |source| ToolError::Glb {
        path: path.to_path_buf(),
        source,
    }
}

fn or_dash(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn inspect(input: &Path, options: ParseOptions) -> Result<()> {
    let bytes = read(input)?;
    let mut parser = SceneParser::with_options(options);
    let ParsedGlb {
        container,
        document,
        token_count,
    } = parser.parse(&bytes).map_err(glb_error(input))?;

    let json = container.json_range();
    let bin = container.bin_range();
    println!(
        "container: version {}, {} bytes",
        container.version(),
        container.declared_length()
    );
    println!("  JSON {}..{} ({} bytes)", json.offset, json.end(), json.length);
    println!("  BIN  {}..{} ({} bytes)", bin.offset, bin.end(), bin.length);
    println!("tokens: {}", token_count);
    println!("buffer: {} bytes", document.buffer.byte_length);

    println!("buffer views: {}", document.buffer_view_count());
    for (i, view) in document.buffer_views.iter().enumerate() {
        print!(
            "  [{}] buffer {}, offset {}, length {}",
            i, view.buffer, view.byte_offset, view.byte_length
        );
        if let Some(stride) = view.byte_stride {
            print!(", stride {}", stride);
        }
        if let Some(target) = view.target {
            print!(", target {:?}", target);
        }
        println!();
    }

    println!("accessors: {}", document.accessor_count());
    for (i, accessor) in document.accessors.iter().enumerate() {
        println!(
            "  [{}] view {}, offset {}, {} x {:?}, count {}",
            i,
            accessor.buffer_view,
            accessor.byte_offset,
            accessor.element_type.name(),
            accessor.component_type,
            accessor.count
        );
    }

    println!(
        "meshes: {}, materials: {}",
        document.meshes.len(),
        document.material_count
    );
    for (i, mesh) in document.meshes.iter().enumerate() {
        println!("  mesh {}: {} primitives", i, mesh.primitive_count());
        for (j, primitive) in mesh.primitives.iter().enumerate() {
            println!(
                "    [{}] mode {}, POSITION {}, NORMAL {}, indices {}, material {}",
                j,
                primitive.mode.code(),
                primitive.pos_accessor,
                or_dash(primitive.nrm_accessor),
                or_dash(primitive.idx_accessor),
                or_dash(primitive.material)
            );
        }
    }
    Ok(())
}

fn preview(token: &Token, json: &[u8]) -> String {
    if token.kind.is_container() {
        return String::new();
    }
    let text = String::from_utf8_lossy(token.bytes(json).unwrap_or_default());
    if text.chars().count() > 40 {
        let head: String = text.chars().take(40).collect();
        format!("{}...", head)
    } else {
        text.into_owned()
    }
}

fn dump_tokens(input: &Path) -> Result<()> {
    let bytes = read(input)?;
    let container = demux(&bytes).map_err(|err| glb_error(input)(err.into()))?;
    let json = container.json();
    let tokens = tokenize(json).map_err(glb_error(input))?;

    for (i, token) in tokens.iter().enumerate() {
        let key = if token.is_key() { " key" } else { "" };
        println!(
            "{:>6} {:<9} {:>7}..{:<7} size {:<4}{} {}",
            i,
            token.kind.name(),
            token.start,
            token.end,
            token.size,
            key,
            preview(token, json)
        );
    }
    debug!(
        "{} tokens, {} containers",
        tokens.len(),
        tokens
            .iter()
            .filter(|token| token.kind.is_container())
            .count()
    );
    Ok(())
}

fn pack(json_path: &Path, bin_path: &Path, output: &Path) -> Result<()> {
    let json = read(json_path)?;
    let bin = read(bin_path)?;
    let glb = write_container(&json, &bin);
    fs::write(output, &glb).map_err(|source| ToolError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    println!(
        "wrote {} ({} bytes: {} JSON, {} BIN)",
        output.display(),
        glb.len(),
        json.len(),
        bin.len()
    );
    Ok(())
}

fn staging(input: &Path) -> Result<()> {
    let bytes = read(input)?;
    let parsed = parse_glb(&bytes).map_err(glb_error(input))?;
    let document = &parsed.document;

    for (i, mesh) in document.meshes.iter().enumerate() {
        let layout =
            StagingLayout::plan(document, mesh).map_err(|err| glb_error(input)(err.into()))?;
        layout
            .fill(document, parsed.bin())
            .map_err(|err| glb_error(input)(err.into()))?;
        println!(
            "mesh {}: {} vertices ({} bytes), {} indices ({} bytes)",
            i,
            layout.vertex_count(),
            layout.vertex_buffer_size(),
            layout.index_count(),
            layout.index_buffer_size()
        );
        for (j, range) in layout.ranges().iter().enumerate() {
            println!(
                "  draw {}: mode {}, vertices {}+{}, indices {}+{}",
                j,
                range.mode.code(),
                range.vertex_offset,
                range.vertex_count,
                range.index_offset,
                range.index_count
            );
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Inspect {
            input,
            no_validate,
            max_tokens,
        } => {
            let options = ParseOptions::new()
                .with_validate_references(!no_validate)
                .with_max_tokens(max_tokens);
            inspect(&input, options)
        }
        Commands::Tokens { input } => dump_tokens(&input),
        Commands::Pack { json, bin, output } => pack(&json, &bin, &output),
        Commands::Staging { input } => staging(&input),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
