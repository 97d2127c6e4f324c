use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};
use std::io::{self, BufRead, Write};
use std::process;
use tracing_subscriber::EnvFilter;

mod catalog;
mod input;
mod mcp;
mod pdf;
mod tools;

#[derive(Parser)]
#[command(name = "mcp-pdf")]
#[command(
    version,
    about = "CLI utilities for PDF processing and MCP integration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(
    group(
        clap::ArgGroup::new("input")
            .required(true)
            .multiple(false)
            .args(["path", "base64"])
    )
)]
struct InputArgs {
    /// Path to the PDF file
    #[arg(long)]
    path: Option<String>,
    /// Base64-encoded PDF bytes
    #[arg(long)]
    base64: Option<String>,
}

#[derive(Args, Clone)]
struct MergeArgs {
    /// Input PDF paths, in merge order (repeatable)
    #[arg(long = "path", required = true)]
    paths: Vec<String>,
    /// Write the merged PDF here instead of printing base64
    #[arg(long)]
    output: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct SplitArgs {
    #[command(flatten)]
    input: InputArgs,
    /// 0-based page to surface as the split result
    #[arg(long)]
    page: Option<u64>,
    /// Write every single-page part into this directory
    #[arg(long)]
    output_dir: Option<String>,
    /// Write the selected part here instead of printing base64
    #[arg(long)]
    output: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct WatermarkArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Watermark text stamped on every page
    #[arg(long)]
    text: String,
    /// Write the stamped PDF here instead of printing base64
    #[arg(long)]
    output: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct RemovePagesArgs {
    #[command(flatten)]
    input: InputArgs,
    /// 0-based page indices to remove (repeatable)
    #[arg(long = "page", required = true)]
    pages: Vec<u64>,
    /// Write the result here instead of printing base64
    #[arg(long)]
    output: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct ReorderPagesArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Explicit 0-based page order (repeatable); omitted reverses the pages
    #[arg(long = "index")]
    order: Vec<u64>,
    /// Write the result here instead of printing base64
    #[arg(long)]
    output: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct ImagesToPdfArgs {
    /// Input image paths, one page each (repeatable)
    #[arg(long = "path", required = true)]
    paths: Vec<String>,
    /// Write the PDF here instead of printing base64
    #[arg(long)]
    output: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct ExtractTextArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
    /// Maximum characters to return
    #[arg(long)]
    max_chars: Option<u64>,
    /// Preserve newline characters (true/false)
    #[arg(long)]
    include_newlines: Option<bool>,
    /// Normalize whitespace (true/false)
    #[arg(long)]
    normalize_whitespace: Option<bool>,
}

#[derive(Args, Clone)]
struct InspectArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct ToolsArgs {
    /// Case-insensitive substring filter over the catalog
    #[arg(long)]
    query: Option<String>,
    /// Output the catalog as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// List the tool catalog
    Tools(ToolsArgs),
    /// Merge PDFs into one document
    Merge(MergeArgs),
    /// Split a PDF into single-page documents
    Split(SplitArgs),
    /// Stamp a diagonal text watermark on every page
    Watermark(WatermarkArgs),
    /// Remove pages from a PDF
    RemovePages(RemovePagesArgs),
    /// Reorder (default: reverse) the pages of a PDF
    ReorderPages(ReorderPagesArgs),
    /// Build a PDF from PNG/JPEG images
    ImagesToPdf(ImagesToPdfArgs),
    /// Extract plain text from a PDF
    ExtractText(ExtractTextArgs),
    /// Inspect page count and format details
    Inspect(InspectArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server()
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::Tools(args) => run_tools(args),
        Commands::Merge(args) => run_merge(args),
        Commands::Split(args) => run_split(args),
        Commands::Watermark(args) => run_watermark(args),
        Commands::RemovePages(args) => run_remove_pages(args),
        Commands::ReorderPages(args) => run_reorder_pages(args),
        Commands::ImagesToPdf(args) => run_images_to_pdf(args),
        Commands::ExtractText(args) => run_extract_text(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_tools(args: ToolsArgs) -> Result<()> {
    let hits = catalog::search(args.query.as_deref().unwrap_or(""));
    if args.json {
        let output = serde_json::to_string_pretty(&hits)?;
        println!("{output}");
        return Ok(());
    }
    for tool in hits {
        let mode = if tool.local { "local" } else { "placeholder" };
        println!("{:<22} {:<12} [{mode}] {}", tool.name, tool.title, tool.description);
    }
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let mut map = Map::new();
    map.insert("paths".to_string(), json!(args.paths));
    insert_output(&mut map, args.output.as_deref());
    let result = tools::merge::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_split(args: SplitArgs) -> Result<()> {
    let mut map = build_input_args(&args.input);
    if let Some(page) = args.page {
        map.insert("page".to_string(), json!(page));
    }
    if let Some(output_dir) = &args.output_dir {
        map.insert("output_dir".to_string(), json!(output_dir));
    }
    insert_output(&mut map, args.output.as_deref());
    let result = tools::split::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_watermark(args: WatermarkArgs) -> Result<()> {
    let mut map = build_input_args(&args.input);
    map.insert("text".to_string(), json!(args.text));
    insert_output(&mut map, args.output.as_deref());
    let result = tools::watermark::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_remove_pages(args: RemovePagesArgs) -> Result<()> {
    let mut map = build_input_args(&args.input);
    map.insert("pages".to_string(), json!(args.pages));
    insert_output(&mut map, args.output.as_deref());
    let result = tools::remove_pages::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_reorder_pages(args: ReorderPagesArgs) -> Result<()> {
    let mut map = build_input_args(&args.input);
    if !args.order.is_empty() {
        map.insert("order".to_string(), json!(args.order));
    }
    insert_output(&mut map, args.output.as_deref());
    let result = tools::reorder_pages::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_images_to_pdf(args: ImagesToPdfArgs) -> Result<()> {
    let mut map = Map::new();
    map.insert("paths".to_string(), json!(args.paths));
    insert_output(&mut map, args.output.as_deref());
    let result = tools::images_to_pdf::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_extract_text(args: ExtractTextArgs) -> Result<()> {
    let mut map = build_input_args(&args.input);
    if let Some(max_chars) = args.max_chars {
        map.insert("max_chars".to_string(), json!(max_chars));
    }
    if let Some(include_newlines) = args.include_newlines {
        map.insert("include_newlines".to_string(), json!(include_newlines));
    }
    if let Some(normalize_whitespace) = args.normalize_whitespace {
        map.insert(
            "normalize_whitespace".to_string(),
            json!(normalize_whitespace),
        );
    }
    let result = tools::extract_text::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let map = build_input_args(&args.input);
    let result = tools::inspect::call(&Value::Object(map));
    print_tool_result(result, args.json)
}

fn build_input_args(input: &InputArgs) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(path) = &input.path {
        map.insert("path".to_string(), json!(path));
    }
    if let Some(base64) = &input.base64 {
        map.insert("base64".to_string(), json!(base64));
    }
    map
}

fn insert_output(map: &mut Map<String, Value>, output: Option<&str>) {
    if let Some(output) = output {
        map.insert("output_path".to_string(), json!(output));
    }
}

fn print_tool_result(result: Value, json_output: bool) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let message = result
            .get("structuredContent")
            .and_then(|value| value.get("error"))
            .and_then(|value| value.get("message"))
            .and_then(|value| value.as_str())
            .unwrap_or("tool error");
        eprintln!("{message}");
        process::exit(1);
    }

    if json_output {
        let structured = result
            .get("structuredContent")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let output = serde_json::to_string_pretty(&structured)?;
        println!("{output}");
        return Ok(());
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

fn run_stdio_server() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock().lines();
    let mut writer = io::BufWriter::new(stdout.lock());

    for line in reader {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: serde_json::Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(_) => continue,
        };

        let method = request.get("method").and_then(|value| value.as_str());
        let id = request.get("id").cloned();
        let response = match (method, id) {
            (Some("initialize"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-11-25",
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }
            })),
            (Some("tools/list"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "tools": mcp::tool_definitions()
                }
            })),
            (Some("tools/call"), Some(id)) => {
                let result = handle_tool_call(&request);
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                }))
            }
            _ => None,
        };

        if let Some(response) = response {
            let serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            writeln!(writer, "{serialized}").context("failed to write response")?;
            writer.flush().context("failed to flush response")?;
        }
    }

    Ok(())
}

fn handle_tool_call(request: &serde_json::Value) -> serde_json::Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params must be an object", None);
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(
            mcp::errors::INVALID_INPUT,
            "params.name must be a string",
            None,
        );
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    match name {
        mcp::contracts::TOOL_MERGE => tools::merge::call(&args),
        mcp::contracts::TOOL_SPLIT => tools::split::call(&args),
        mcp::contracts::TOOL_WATERMARK => tools::watermark::call(&args),
        mcp::contracts::TOOL_REMOVE_PAGES => tools::remove_pages::call(&args),
        mcp::contracts::TOOL_REORDER_PAGES => tools::reorder_pages::call(&args),
        mcp::contracts::TOOL_IMAGES_TO_PDF => tools::images_to_pdf::call(&args),
        mcp::contracts::TOOL_EXTRACT_TEXT => tools::extract_text::call(&args),
        mcp::contracts::TOOL_INSPECT => tools::inspect::call(&args),
        // Cataloged tools without a local handler fabricate a placeholder
        // document naming the operation.
        other if catalog::find(other).is_some() => tools::placeholder::call(other, &args),
        _ => tools::error_result(
            mcp::errors::INVALID_INPUT,
            format!("tool not implemented: {name}"),
            Some(name),
        ),
    }
}
