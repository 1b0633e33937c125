//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use coursegen_core::export;
use coursegen_core::pipeline::{
    CoursePipelineConfig, CoursePipelineResult, ProgressReporter, run_course_pipeline,
};
use coursegen_core::stages::{
    self, ContentRequest, CurriculumRequest, CurriculumSource, FacetPolicy, ObjectivesRequest,
};
use coursegen_providers::ProviderSet;
use coursegen_shared::{
    AppConfig, Approach, AudienceLevel, Complexity, expand_home, init_config, load_config,
};
use coursegen_store::ArtifactStore;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CourseGen — AI-assisted academic course design.
#[derive(Parser)]
#[command(
    name = "coursegen",
    version,
    about = "Generate learning objectives, curriculum plans, and weekly course content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full pipeline: objectives, curriculum, and one week of content.
    Run {
        /// Course topic.
        topic: String,

        /// Audience level: undergraduate-basic, undergraduate-advanced,
        /// graduate, or professional.
        #[arg(short, long, default_value = "graduate")]
        level: AudienceLevel,

        /// Credit hours (1-6).
        #[arg(long, default_value_t = 3)]
        credit_hours: u8,

        /// Semester length in weeks (8-20, defaults from config).
        #[arg(short, long)]
        weeks: Option<u32>,

        /// Pedagogical approach: project-based, theory, or blended.
        #[arg(short, long, default_value = "blended")]
        approach: Approach,

        /// Assessment preference (can be specified multiple times).
        #[arg(long = "assessment")]
        assessments: Vec<String>,

        /// Target week for content generation.
        #[arg(long, default_value_t = 1)]
        week: u32,

        /// Content complexity: beginner, intermediate, advanced, or expert.
        #[arg(short, long, default_value = "intermediate")]
        complexity: Complexity,

        /// Media preference for reading materials (can be specified multiple
        /// times, defaults from config).
        #[arg(long = "media")]
        media: Vec<String>,

        /// Artifact output directory (defaults from config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Generate learning objectives for a topic (Stage 1 only).
    Objectives {
        /// Course topic.
        topic: String,

        /// Audience level.
        #[arg(short, long, default_value = "graduate")]
        level: AudienceLevel,

        /// Credit hours (1-6).
        #[arg(long, default_value_t = 3)]
        credit_hours: u8,

        /// Artifact output directory (defaults from config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Structure a curriculum plan from objectives (Stage 2 only).
    Curriculum {
        /// Path to a Stage-1 objectives artifact.
        #[arg(long, conflicts_with = "text")]
        objectives: Option<PathBuf>,

        /// Raw learning-outcome text instead of an artifact.
        #[arg(long)]
        text: Option<String>,

        /// Semester length in weeks (8-20, defaults from config).
        #[arg(short, long)]
        weeks: Option<u32>,

        /// Pedagogical approach.
        #[arg(short, long, default_value = "blended")]
        approach: Approach,

        /// Assessment preference (can be specified multiple times).
        #[arg(long = "assessment")]
        assessments: Vec<String>,

        /// Artifact output directory (defaults from config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Generate weekly content from a curriculum plan (Stage 3 only).
    Content {
        /// Path to a Stage-2 curriculum artifact.
        #[arg(long)]
        curriculum: PathBuf,

        /// Target week within the plan.
        #[arg(short, long, default_value_t = 1)]
        week: u32,

        /// Content complexity.
        #[arg(short, long, default_value = "intermediate")]
        complexity: Complexity,

        /// Media preference (can be specified multiple times, defaults from
        /// config).
        #[arg(long = "media")]
        media: Vec<String>,

        /// Artifact output directory (defaults from config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Render a curriculum or content artifact as plain text.
    Export {
        /// Path to a curriculum or weekly-content artifact.
        artifact: PathBuf,

        /// Write the rendered text here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursegen=info",
        1 => "coursegen=debug",
        _ => "coursegen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            topic,
            level,
            credit_hours,
            weeks,
            approach,
            assessments,
            week,
            complexity,
            media,
            out,
        } => {
            cmd_run(
                &topic,
                level,
                credit_hours,
                weeks,
                approach,
                assessments,
                week,
                complexity,
                media,
                out.as_deref(),
            )
            .await
        }
        Command::Objectives {
            topic,
            level,
            credit_hours,
            out,
        } => cmd_objectives(&topic, level, credit_hours, out.as_deref()).await,
        Command::Curriculum {
            objectives,
            text,
            weeks,
            approach,
            assessments,
            out,
        } => cmd_curriculum(objectives, text, weeks, approach, assessments, out.as_deref()).await,
        Command::Content {
            curriculum,
            week,
            complexity,
            media,
            out,
        } => cmd_content(curriculum, week, complexity, media, out.as_deref()).await,
        Command::Export { artifact, out } => cmd_export(&artifact, out.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Resolve the artifact output directory: CLI flag, then config.
fn resolve_store(config: &AppConfig, out: Option<&str>) -> Result<ArtifactStore> {
    let root = match out {
        Some(p) => expand_home(p),
        None => expand_home(&config.defaults.output_dir),
    };
    Ok(ArtifactStore::open(root)?)
}

/// Resolve media preferences: CLI flags, then config.
fn resolve_media(config: &AppConfig, media: Vec<String>) -> Vec<String> {
    if media.is_empty() {
        config.defaults.media_preferences.clone()
    } else {
        media
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_run(
    topic: &str,
    level: AudienceLevel,
    credit_hours: u8,
    weeks: Option<u32>,
    approach: Approach,
    assessments: Vec<String>,
    week: u32,
    complexity: Complexity,
    media: Vec<String>,
    out: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let store = resolve_store(&config, out)?;
    let providers = ProviderSet::from_config(&config)?;

    let pipeline_config = CoursePipelineConfig {
        topic: topic.to_string(),
        level,
        credit_hours,
        semester_weeks: weeks.unwrap_or(config.defaults.semester_weeks),
        approach,
        assessment_preferences: assessments,
        week,
        complexity,
        media_preferences: resolve_media(&config, media),
    };

    info!(topic, week, "running full course pipeline");

    let reporter = CliProgress::new();
    let result = run_course_pipeline(
        &pipeline_config,
        &providers,
        &store,
        &FacetPolicy::default(),
        &reporter,
    )
    .await?;

    println!();
    println!("  Course package generated!");
    println!("  Objectives: {} ({} items)", result.objectives_path.display(), result.objective_count);
    println!("  Curriculum: {}", result.curriculum_path.display());
    println!("  Content:    {}", result.content_path.display());
    println!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_objectives(
    topic: &str,
    level: AudienceLevel,
    credit_hours: u8,
    out: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let store = resolve_store(&config, out)?;
    let providers = ProviderSet::from_config(&config)?;

    info!(topic, "generating learning objectives");

    let reporter = CliProgress::new();
    reporter.phase("Generating learning objectives");
    let (objectives, path) = stages::generate_objectives(
        &providers,
        &store,
        &ObjectivesRequest {
            topic: topic.to_string(),
            level,
            credit_hours,
        },
    )
    .await?;
    reporter.clear();

    println!();
    for objective in &objectives {
        println!("  {objective}");
    }
    println!();
    println!("  Saved: {}", path.display());
    println!();

    Ok(())
}

async fn cmd_curriculum(
    objectives: Option<PathBuf>,
    text: Option<String>,
    weeks: Option<u32>,
    approach: Approach,
    assessments: Vec<String>,
    out: Option<&str>,
) -> Result<()> {
    let source = match (objectives, text) {
        (Some(path), None) => CurriculumSource::ObjectivesArtifact(path),
        (None, Some(raw)) => CurriculumSource::RawText(raw),
        _ => return Err(eyre!("supply exactly one of --objectives or --text")),
    };

    let config = load_config()?;
    let store = resolve_store(&config, out)?;
    let providers = ProviderSet::from_config(&config)?;

    let reporter = CliProgress::new();
    reporter.phase("Structuring curriculum plan");
    let (plan, path) = stages::generate_curriculum(
        &providers,
        &store,
        &CurriculumRequest {
            source,
            semester_weeks: weeks.unwrap_or(config.defaults.semester_weeks),
            approach,
            assessment_preferences: assessments,
        },
    )
    .await?;
    reporter.clear();

    println!();
    println!("  Curriculum plan generated!");
    println!("  Course:   {}", plan.course_name);
    println!("  Approach: {}", plan.approach);
    println!("  Weeks:    {}", plan.semester_weeks);
    println!("  Saved:    {}", path.display());
    println!();

    Ok(())
}

async fn cmd_content(
    curriculum: PathBuf,
    week: u32,
    complexity: Complexity,
    media: Vec<String>,
    out: Option<&str>,
) -> Result<()> {
    if !curriculum.exists() {
        return Err(eyre!(
            "no curriculum artifact at '{}' — run `coursegen curriculum` first",
            curriculum.display()
        ));
    }

    let config = load_config()?;
    let store = resolve_store(&config, out)?;
    let providers = ProviderSet::from_config(&config)?;

    info!(curriculum = %curriculum.display(), week, "generating weekly content");

    let reporter = CliProgress::new();
    reporter.phase(&format!("Generating content for week {week}"));
    let (_content, path) = stages::generate_weekly_content(
        &providers,
        &store,
        &FacetPolicy::default(),
        &ContentRequest {
            curriculum_path: curriculum,
            week,
            complexity,
            media_preferences: resolve_media(&config, media),
        },
    )
    .await?;
    reporter.clear();

    println!();
    println!("  Week {week} content generated!");
    println!("  Saved: {}", path.display());
    println!();

    Ok(())
}

fn cmd_export(artifact: &Path, out: Option<&Path>) -> Result<()> {
    let stem = artifact
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| eyre!("artifact path has no usable file name"))?;

    let config = load_config()?;
    let store = resolve_store(&config, None)?;

    let text = if stem.ends_with("_curriculum") {
        let plan = store.load_curriculum(artifact)?;
        export::curriculum_to_text(&plan)
    } else if let Some(prefix) = stem.strip_suffix("_content") {
        // <Course>_Week_<n>_content.json
        let (course, week) = prefix
            .rsplit_once("_Week_")
            .ok_or_else(|| eyre!("unrecognized content artifact name '{stem}'"))?;
        let week: u32 = week
            .parse()
            .map_err(|_| eyre!("unrecognized week number in artifact name '{stem}'"))?;
        let content = store.load_content(artifact)?;
        export::weekly_content_to_text(&course.replace('_', " "), week, &content)
    } else {
        return Err(eyre!(
            "cannot export '{stem}': expected a *_curriculum.json or *_content.json artifact"
        ));
    };

    match out {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!("Exported to: {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &CoursePipelineResult) {
        self.spinner.finish_and_clear();
    }
}
