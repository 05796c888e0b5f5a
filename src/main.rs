use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;
use anyhow::{anyhow, Context};
use log::{debug, error, info, warn};
use structopt::StructOpt;
use methodgen::codegen::c::{CStyle, CTemplate};
use methodgen::codegen::text::TextTemplate;
use methodgen::codegen::{class, interface};
use methodgen::{fmt, Generator, GeneratorOptions, Schema, VoidDetection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateKind {
    Declaration,
    Vtable,
    Thunk,
    Format,
    RustTrait,
    RustProxy,
    RustThunk,
}

impl TemplateKind {
    const VARIANTS: [&'static str; 7] = [
        "declaration",
        "vtable",
        "thunk",
        "format",
        "rust-trait",
        "rust-proxy",
        "rust-thunk",
    ];

    fn is_rust(self) -> bool {
        matches!(self, Self::RustTrait | Self::RustProxy | Self::RustThunk)
    }
}

impl FromStr for TemplateKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "declaration" => Ok(Self::Declaration),
            "vtable" => Ok(Self::Vtable),
            "thunk" => Ok(Self::Thunk),
            "format" => Ok(Self::Format),
            "rust-trait" => Ok(Self::RustTrait),
            "rust-proxy" => Ok(Self::RustProxy),
            "rust-thunk" => Ok(Self::RustThunk),
            _ => Err(anyhow!("Unknown template `{}`", s))
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(about = "Expands a JSON method schema into source text")]
struct Opt {
    #[structopt(short, long, parse(from_os_str))]
    input_file: PathBuf,

    /// Writes to stdout when absent
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(short, long, default_value = "declaration", possible_values = &TemplateKind::VARIANTS)]
    template: TemplateKind,

    /// Format string for `--template format`, e.g. "{return_type} {name}({signature});"
    #[structopt(long)]
    format: Option<String>,

    #[structopt(long, default_value = "void *")]
    receiver_type: String,

    #[structopt(long, default_value = "self")]
    receiver_name: String,

    #[structopt(long, default_value = "self->vtable")]
    dispatch: String,

    #[structopt(long)]
    thunk_prefix: Option<String>,

    /// Trait name for the Rust templates, defaults to the schema name
    #[structopt(long)]
    name: Option<String>,

    #[structopt(long)]
    proxy_name: Option<String>,

    /// Extra spellings treated as void. Switches to aliased void detection
    #[structopt(long = "void-alias")]
    void_aliases: Vec<String>,

    #[structopt(long, default_value = "16")]
    max_arity: usize,

    /// Lifts the parameter limit, overrides --max-arity
    #[structopt(long)]
    unbounded: bool,

    /// Run the Rust output through rustfmt
    #[structopt(long)]
    rustfmt: bool,
}

impl Opt {
    fn generator_options(&self, schema: &Schema) -> GeneratorOptions {
        let aliases = self.void_aliases.iter()
            .chain(schema.void_aliases.iter())
            .collect::<Vec<_>>();
        let void_detection = if aliases.is_empty() {
            VoidDetection::Literal
        } else {
            VoidDetection::aliased(aliases)
        };

        GeneratorOptions {
            max_arity: if self.unbounded { None } else { Some(self.max_arity) },
            void_detection,
        }
    }

    fn c_style(&self) -> CStyle {
        CStyle {
            receiver_type: self.receiver_type.clone(),
            receiver_name: self.receiver_name.clone(),
            dispatch: self.dispatch.clone(),
            thunk_prefix: self.thunk_prefix.clone().unwrap_or_default(),
        }
    }

    fn rustfmt_applies(&self) -> bool {
        self.rustfmt && self.template.is_rust()
    }

    fn trait_name(&self, schema: &Schema) -> anyhow::Result<String> {
        self.name.clone()
            .or_else(|| schema.name.clone())
            .context("Rust templates need a trait name, pass --name or set `name` in the schema")
    }
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", format!("{}=INFO", env!("CARGO_PKG_NAME")));
    }
    env_logger::init();

    let opts: Opt = Opt::from_args();
    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&opts) {
        error!("{:#}", e);
        exit(1);
    }
}

fn run(opts: &Opt) -> anyhow::Result<()> {
    debug!("Reading schema {:?}", opts.input_file);
    let schema = Schema::from_path(&opts.input_file)?;
    info!("Loaded {} methods", schema.methods.len());

    let generator = Generator::new(opts.generator_options(&schema));
    let generated = render(opts, &schema, &generator)?;

    if opts.rustfmt && !opts.rustfmt_applies() {
        warn!("--rustfmt only applies to the rust-* templates, leaving {:?} output as is", opts.template);
    }
    let generated = if opts.rustfmt_applies() {
        fmt::rustfmt(generated)?
    } else {
        generated
    };

    match &opts.output {
        Some(path) => {
            debug!("Writing {:?}", path);
            let mut f = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {:?}", path))?;
            let mut writer = BufWriter::new(&mut f);
            writer.write_all(generated.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(generated.as_bytes())?;
            lock.flush()?;
        }
    }

    Ok(())
}

fn render(opts: &Opt, schema: &Schema, generator: &Generator) -> anyhow::Result<String> {
    let methods = &schema.methods;
    let out = match opts.template {
        TemplateKind::Declaration => generator.generate(methods, &CTemplate::Declaration(opts.c_style()))?,
        TemplateKind::Vtable => generator.generate(methods, &CTemplate::VtableSlot(opts.c_style()))?,
        TemplateKind::Thunk => generator.generate(methods, &CTemplate::Thunk(opts.c_style()))?,
        TemplateKind::Format => {
            let format = opts.format.as_deref()
                .context("--template format needs --format")?;
            let template: TextTemplate = format.parse()?;
            generator.generate(methods, &template)?
        }
        TemplateKind::RustTrait => {
            let name = opts.trait_name(schema)?;
            interface::gen_interface(&name, methods, generator)?.to_string()
        }
        TemplateKind::RustProxy => {
            let name = opts.trait_name(schema)?;
            let proxy_name = opts.proxy_name.clone()
                .unwrap_or_else(|| format!("{}Proxy", name));
            class::gen_proxy(&name, &proxy_name, methods, generator)?.to_string()
        }
        TemplateKind::RustThunk => {
            let name = opts.trait_name(schema)?;
            class::gen_thunks(&name, methods, generator)?.to_string()
        }
    };

    Ok(out)
}
