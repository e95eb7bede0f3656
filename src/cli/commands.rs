//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::toolchain::{Toolchain, ToolchainReport, ToolRole};
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::cli::args::{AudioArgs, ConcatArgs, DoctorArgs, MuteArgs, ThumbnailsArgs, TrimArgs};
use crate::config_initialization::AppConfig;
use crate::domain::model::{MuteRequest, Resolution, ThumbnailReport, ThumbnailRequest, TimeSpec, TrimRequest};
use crate::domain::rules::MuteFilter;
use crate::utils::logging::OperationReporter;
use crate::utils::path::PathUtils;
use crate::utils::Utils;

/// Detect tools once and fail early if `roles` are not all usable
async fn require_tools(config: &AppConfig, roles: &[ToolRole]) -> Result<ToolchainReport> {
    let report = Toolchain::detect(&config.tools).await;
    report
        .require(roles)
        .context("Required external tool missing; consider a package manager like apt-get, brew or chocolatey")?;
    Ok(report)
}

/// Execute the thumbnails command
pub async fn thumbnails(args: ThumbnailsArgs, config: &AppConfig) -> Result<()> {
    require_tools(
        config,
        &[ToolRole::Prober, ToolRole::Extractor, ToolRole::Converter],
    )
    .await?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathUtils::default_thumbnail_dir(&args.video));
    let samples = args.samples.unwrap_or(config.thumbnails.samples);
    let keep = args.keep.unwrap_or(config.thumbnails.keep);
    let promote = args.promote.unwrap_or(config.thumbnails.promote);

    let request = ThumbnailRequest::new(&args.video, &output_dir, samples, keep)
        .context("Invalid thumbnail request")?;

    let container = DefaultAppContainer::new(config);
    let interactor = container.thumbnail_interactor();

    let reporter = OperationReporter::start(format!(
        "THUMBNAILS - \"{}\" -> \"{}\" (samples={}, keep={})",
        args.video.display(),
        output_dir.display(),
        samples,
        keep
    ));
    let report = match interactor.generate(&request).await {
        Ok(report) => report,
        Err(e) => {
            reporter.failed(&e);
            let stage = e.stage();
            return Err(e).context(format!("Thumbnail generation failed during {}", stage));
        }
    };

    let promoted = interactor
        .promote(&report, promote)
        .await
        .context("Failed to copy top thumbnails next to the video")?;
    for path in &promoted {
        reporter.step(&format!("promoted \"{}\"", path.display()));
    }
    reporter.passed();

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize thumbnail report to JSON")?;
        println!("{}", json);
    } else {
        display_thumbnail_report(&report);
    }
    Ok(())
}

/// Execute the trim command
pub async fn trim(args: TrimArgs, config: &AppConfig) -> Result<()> {
    let start = args
        .start
        .as_deref()
        .map(TimeSpec::parse)
        .transpose()
        .with_context(|| format!("Invalid start time {:?}", args.start))?;
    let stop = args
        .stop
        .as_deref()
        .map(TimeSpec::parse)
        .transpose()
        .with_context(|| format!("Invalid stop time {:?}", args.stop))?;
    let request = TrimRequest::new(&args.input, &args.output, start, stop)?;

    if !request.is_passthrough() {
        require_tools(config, &[ToolRole::Extractor]).await?;
    }

    let container = DefaultAppContainer::new(config);
    let reporter = OperationReporter::start(format!(
        "TRIM - \"{}\" -> \"{}\"",
        args.input.display(),
        args.output.display()
    ));
    match container.media_interactor().trim(&request).await {
        Ok(()) => reporter.passed(),
        Err(e) => {
            reporter.failed(&e);
            return Err(e.into());
        }
    }
    Ok(())
}

/// Execute the audio command
pub async fn audio(args: AudioArgs, config: &AppConfig) -> Result<()> {
    require_tools(config, &[ToolRole::Extractor]).await?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("mp3"));
    if output == args.input {
        anyhow::bail!("Output would overwrite the input: {}", output.display());
    }
    let bitrate = args.bitrate.as_deref().unwrap_or(&config.audio.bitrate);
    let sample_rate = args.sample_rate.unwrap_or(config.audio.sample_rate);

    let container = DefaultAppContainer::new(config);
    let reporter = OperationReporter::start(format!(
        "AUDIO - \"{}\" -> \"{}\"",
        args.input.display(),
        output.display()
    ));
    match container
        .media_interactor()
        .extract_audio(&args.input, &output, bitrate, sample_rate)
        .await
    {
        Ok(request) => {
            reporter.step(&format!(
                "{}k @ {} Hz",
                request.bitrate_kbps, request.sample_rate
            ));
            reporter.passed();
            Ok(())
        }
        Err(e) => {
            reporter.failed(&e);
            Err(e.into())
        }
    }
}

/// Execute the mute command
pub async fn mute(args: MuteArgs, config: &AppConfig) -> Result<()> {
    if args.print_filter {
        let filter = MuteFilter::build(&args.ranges)?;
        println!("{}", filter);
        return Ok(());
    }

    let (Some(input), Some(output)) = (args.input, args.output) else {
        anyhow::bail!("--input and --output are required unless --print-filter is given");
    };
    require_tools(config, &[ToolRole::Extractor]).await?;

    let request = MuteRequest {
        input,
        output,
        ranges: args.ranges,
    };
    let container = DefaultAppContainer::new(config);
    let reporter = OperationReporter::start(format!(
        "MUTE - \"{}\" -> \"{}\" ({} ranges)",
        request.input.display(),
        request.output.display(),
        request.ranges.len()
    ));
    match container.media_interactor().mute(&request).await {
        Ok(filter) => {
            reporter.step(&filter);
            reporter.passed();
            Ok(())
        }
        Err(e) => {
            reporter.failed(&e);
            Err(e.into())
        }
    }
}

/// Execute the concat command
pub async fn concat(args: ConcatArgs, config: &AppConfig) -> Result<()> {
    let resolution = Resolution::parse(&args.resolution)?;

    let container = DefaultAppContainer::new(config);
    let interactor = container.media_interactor();
    let plan = interactor
        .plan_concat(&args.list, resolution, args.framerate, args.output.as_deref())
        .await
        .context("Failed to read concat list")?;

    for (idx, entry) in plan.entries.iter().enumerate() {
        info!("line {}: \"{}\"", idx + 1, entry.source.display());
    }
    info!("Output file: \"{}\"", plan.output.display());

    if args.dry_run {
        for entry in &plan.entries {
            println!("{} -> {}", entry.source.display(), entry.resized.display());
        }
        println!("=> {}", plan.output.display());
        return Ok(());
    }

    require_tools(config, &[ToolRole::Extractor]).await?;
    let reporter = OperationReporter::start(format!(
        "CONCAT - {} clips @ {} {}fps -> \"{}\"",
        plan.entries.len(),
        plan.resolution,
        plan.framerate,
        plan.output.display()
    ));
    match interactor.concat(&plan).await {
        Ok(()) => {
            reporter.passed();
            Ok(())
        }
        Err(e) => {
            reporter.failed(&e);
            Err(e.into())
        }
    }
}

/// Execute the doctor command
pub async fn doctor(args: DoctorArgs, config: &AppConfig) -> Result<()> {
    let report = Toolchain::detect(&config.tools).await;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize toolchain report to JSON")?;
        println!("{}", json);
    } else {
        display_toolchain_report(&report);
    }

    if report.all_available() {
        Ok(())
    } else {
        warn!("Some tools are missing");
        anyhow::bail!("Toolchain incomplete")
    }
}

/// Display thumbnail report in human-readable format
fn display_thumbnail_report(report: &ThumbnailReport) {
    println!("Thumbnails");
    println!("==========");
    println!("Source: {}", report.source.display());
    println!(
        "Duration: {}",
        Utils::format_duration(std::time::Duration::from_secs_f64(report.duration))
    );
    println!("Samples: {}", report.samples.len());
    println!();
    for selection in &report.selections {
        println!(
            "  #{:<3} @ {:>9.2}s  {:>10}  {}",
            selection.rank,
            selection.offset,
            Utils::format_file_size(selection.size),
            selection.path.display()
        );
    }
}

/// Display toolchain report in human-readable format
fn display_toolchain_report(report: &ToolchainReport) {
    println!("Toolchain");
    println!("=========");
    for tool in &report.tools {
        let status = if tool.available { "✓" } else { "✗" };
        println!("  {} {:<9} {}", status, tool.role.name(), tool.program);
        if let Some(version) = &tool.version {
            println!("      {}", version);
        }
        if let Some(error) = &tool.error {
            println!("      Error: {}", error);
        }
    }
}
