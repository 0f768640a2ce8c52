/// Widget compiler CLI

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use widget_compiler::tools::ToolRegistry;
use widget_compiler::{
    CompileOptions, DestinationPicker, NoPicker, WidgetCompiler, WidgetRequest, total_length,
};

#[derive(Parser, Debug)]
#[command(name = "widgetc")]
#[command(about = "Widget compiler - turns widget descriptions into Übersicht widget scripts")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a widget and save it
    Compile(CompileArgs),

    /// Sum the character lengths of the given strings
    TotalLength {
        #[arg(value_name = "STRING")]
        strings: Vec<String>,
    },

    /// Print the available tool specs as JSON
    Tools,
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Read the request from a JSON file instead of flags
    #[arg(long, value_name = "FILE", conflicts_with_all = ["command", "refresh", "positioning", "markup", "styles"])]
    request: Option<PathBuf>,

    /// Bash command whose output the widget displays
    #[arg(long, default_value = "")]
    command: String,

    /// Refresh frequency in milliseconds
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    refresh: i64,

    /// CSS positioning declarations
    #[arg(long, default_value = "")]
    positioning: String,

    /// JSX markup with a single root element
    #[arg(long, default_value = "")]
    markup: String,

    /// JSON object of style variables
    #[arg(long, default_value = "{}")]
    styles: String,

    /// Directory to write the widget into
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// File name of the generated widget
    #[arg(long, default_value = widget_compiler::driver::DEFAULT_FILE_NAME)]
    file_name: String,

    /// Fail when a style variable is not referenced by the markup
    #[arg(long)]
    strict_styles: bool,

    /// Print the generated script and skip saving it
    #[arg(long)]
    print: bool,

    /// Never prompt for a destination when the direct write fails
    #[arg(long)]
    no_prompt: bool,
}

/// Asks for a destination on the terminal. An empty answer cancels.
struct StdinPicker;

impl DestinationPicker for StdinPicker {
    fn prompt_for_destination(
        &self,
        default_name: &str,
        extension: &str,
        initial_directory: Option<&Path>,
    ) -> io::Result<Option<PathBuf>> {
        let mut stderr = io::stderr();
        writeln!(stderr, "Could not save to the widgets folder.")?;
        if let Some(dir) = initial_directory {
            writeln!(stderr, "Intended location: {}", dir.display())?;
        }
        write!(stderr, "Save {} to (empty to cancel): ", default_name)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        let mut path = PathBuf::from(answer);
        if path.is_dir() {
            path.push(default_name);
        } else if path.extension().is_none() && !extension.is_empty() {
            path.set_extension(extension);
        }
        Ok(Some(path))
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Command::Compile(args) => compile(args, cli.verbose),
        Command::TotalLength { strings } => {
            println!("Total length of all strings: {}", total_length(&strings));
            Ok(true)
        }
        Command::Tools => print_tools(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("widgetc: {:#}", e);
            process::exit(1);
        }
    }
}

fn read_request(args: &CompileArgs) -> anyhow::Result<WidgetRequest> {
    match &args.request {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed reading request {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed parsing request {}", path.display()))
        }
        None => Ok(WidgetRequest::new(
            args.command.clone(),
            args.refresh,
            args.positioning.clone(),
            args.markup.clone(),
            args.styles.clone(),
        )),
    }
}

/// Returns whether the compile succeeded.
fn compile(args: CompileArgs, verbose: bool) -> anyhow::Result<bool> {
    let request = read_request(&args)?;

    let mut options = CompileOptions::new()
        .file_name(args.file_name.clone())
        .strict_styles(args.strict_styles)
        .verbose(verbose);
    if let Some(dir) = &args.output_dir {
        options = options.widget_dir(dir);
    }

    let compiler = WidgetCompiler::new(options);

    if args.print {
        return match compiler.generate(&request) {
            Ok(artifact) => {
                println!("{}", artifact);
                Ok(true)
            }
            Err(e) => {
                println!("{}", widget_compiler::driver::failure_status(&e));
                Ok(false)
            }
        };
    }

    let picker: &dyn DestinationPicker = if args.no_prompt { &NoPicker } else { &StdinPicker };
    let reply = compiler.run(&request, picker);
    println!("{}", reply.status);

    if verbose {
        if let Some(e) = &reply.error {
            eprintln!("error kind: {}", e.kind());
        }
    }

    Ok(reply.is_success())
}

fn print_tools() -> anyhow::Result<bool> {
    let compiler = Arc::new(WidgetCompiler::new(CompileOptions::new()));
    let registry = ToolRegistry::with_default_tools(compiler, Arc::new(NoPicker));
    let specs = serde_json::to_string_pretty(&registry.specs())?;
    println!("{}", specs);
    Ok(true)
}
