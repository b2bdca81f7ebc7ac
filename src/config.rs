use crate::codegen::{ArtifactProfile, OutputLayout};
use crate::error::ErrorCode;
use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Fully resolved settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub input: PathBuf,
    pub layout: OutputLayout,
    pub profile: ArtifactProfile,
    /// Templates overriding the built-in set
    pub template_dir: Option<PathBuf>,
    /// Where to write the digest manifest, if anywhere
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}

impl GeneratorConfig {
    /// Configuration for a single-directory run with defaults.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            layout: OutputLayout::Single { dir: output.into() },
            profile: ArtifactProfile::default(),
            template_dir: None,
            manifest: None,
            dry_run: false,
        }
    }

    pub fn with_profile(mut self, profile: ArtifactProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            input: cli_input,
            output: cli_output,
            output_hpp: cli_output_hpp,
            output_cpp: cli_output_cpp,
            profile: cli_profile,
            template_dir: cli_template_dir,
            manifest: cli_manifest,
            dry_run: cli_dry_run,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            input: file_input,
            output: file_output,
            output_hpp: file_output_hpp,
            output_cpp: file_output_cpp,
            profile: file_profile,
            template_dir: file_template_dir,
            manifest: file_manifest,
            dry_run: file_dry_run,
        } = file_config;

        let input = cli_input
            .or(file_input)
            .context("no IDL input given (use --input or FACETGEN_INPUT)")?;

        // A layout given on the command line replaces the file's layout wholesale.
        let cli_has_layout = cli_output.is_some() || cli_output_hpp.is_some() || cli_output_cpp.is_some();
        let (output, output_hpp, output_cpp) = if cli_has_layout {
            (cli_output, cli_output_hpp, cli_output_cpp)
        } else {
            (file_output, file_output_hpp, file_output_cpp)
        };
        let layout = resolve_layout(output, output_hpp, output_cpp)?;

        let profile = cli_profile.or(file_profile).unwrap_or_default();
        let template_dir = cli_template_dir.or(file_template_dir);
        let manifest = cli_manifest.or(file_manifest);
        let dry_run = cli_dry_run || file_dry_run.unwrap_or(false);

        let config = Self {
            input,
            layout,
            profile,
            template_dir,
            manifest,
            dry_run,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that only need the configuration itself. A missing input file
    /// is left to the loader, which reports it as a load failure.
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = self.template_dir.as_ref() {
            anyhow::ensure!(dir.is_dir(), "template directory {:?} is not a directory", dir);
        }
        if let Some(manifest) = self.manifest.as_ref() {
            anyhow::ensure!(
                !manifest.is_dir(),
                "manifest path {:?} is a directory",
                manifest
            );
        }
        Ok(())
    }

    pub fn input_display(&self) -> String {
        self.input.display().to_string()
    }
}

fn resolve_layout(
    output: Option<PathBuf>,
    output_hpp: Option<PathBuf>,
    output_cpp: Option<PathBuf>,
) -> Result<OutputLayout> {
    match (output, output_hpp, output_cpp) {
        (Some(dir), None, None) => Ok(OutputLayout::Single { dir }),
        (None, Some(hpp_dir), Some(cpp_dir)) => Ok(OutputLayout::Split { hpp_dir, cpp_dir }),
        (Some(_), _, _) => anyhow::bail!("--output cannot be combined with --output-hpp/--output-cpp"),
        (None, Some(_), None) => anyhow::bail!("--output-hpp requires --output-cpp"),
        (None, None, Some(_)) => anyhow::bail!("--output-cpp requires --output-hpp"),
        (None, None, None) => {
            anyhow::bail!("no output given (use --output DIR or --output-hpp DIR --output-cpp DIR)")
        }
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "genfacet",
    about = "Generate C++ facet interface, adapter and router sources from a facet IDL",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML, JSON or TOML)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_INPUT",
        value_name = "FILE",
        help = "Facet IDL source (.json5, .json, .yaml or .toml)"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_OUTPUT",
        value_name = "DIR",
        help = "Write every artifact to this directory"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_OUTPUT_HPP",
        value_name = "DIR",
        help = "Write headers to this directory (with --output-cpp)"
    )]
    pub output_hpp: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_OUTPUT_CPP",
        value_name = "DIR",
        help = "Write bodies to this directory (with --output-hpp)"
    )]
    pub output_cpp: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_PROFILE",
        value_enum,
        value_name = "PROFILE",
        help = "Artifacts to generate: minimal, routed or full [default: full]"
    )]
    pub profile: Option<ArtifactProfile>,

    #[arg(
        long,
        env = "FACETGEN_TEMPLATE_DIR",
        value_name = "DIR",
        help = "Directory of *.tera templates overriding the built-in set"
    )]
    pub template_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_MANIFEST",
        value_name = "FILE",
        help = "Write a JSON manifest of generated files and digests"
    )]
    pub manifest: Option<PathBuf>,

    #[arg(
        long,
        env = "FACETGEN_DRY_RUN",
        help = "Render and report without writing any file"
    )]
    pub dry_run: bool,
}

/// Exit code for a command line clap rejected; `None` for `--help` and
/// `--version`, which clap exits from successfully.
pub fn usage_exit_code(error: &clap::Error) -> Option<ErrorCode> {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => Some(ErrorCode::ConfigError),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    output_hpp: Option<PathBuf>,
    output_cpp: Option<PathBuf>,
    profile: Option<ArtifactProfile>,
    template_dir: Option<PathBuf>,
    manifest: Option<PathBuf>,
    dry_run: Option<bool>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        "toml" => toml::from_str(&contents)
            .with_context(|| format!("failed to parse TOML config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
