use std::path::{Path, PathBuf};

use console::Style;
use screenprep_core::batch::{IlluminationJob, IlluminationReport, MaskReport};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            warn: Style::new().yellow().bold(),
        }
    }

    fn title(&self, text: &str) {
        println!();
        println!("  {}", self.title.apply_to(text));
        println!(
            "  {}",
            self.title.apply_to("\u{2550}".repeat(text.chars().count()))
        );
        println!();
    }

    fn row(&self, label: &str, value: impl std::fmt::Display) {
        println!("    {:<14}{}", self.label.apply_to(label), self.value.apply_to(value));
    }
}

pub fn print_illumination_plan(job: &IlluminationJob) {
    let s = Styles::new();
    let illum = &job.config.illumination;

    s.title("Illumination Correction");
    println!(
        "  {:<16}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(job.paths.len())
    );
    println!();

    println!("  {}", s.header.apply_to("Field"));
    match &job.load_field {
        Some(path) => println!(
            "    {:<14}{}",
            s.label.apply_to("Loaded from"),
            s.path.apply_to(path.display())
        ),
        None => {
            s.row("Radius", illum.radius);
            s.row("Quantile", illum.quantile);
            println!(
                "    {:<14}{}",
                s.label.apply_to("Aggregation"),
                s.method.apply_to(illum.aggregation)
            );
            if illum.stretch_in > 0.0 {
                s.row("Stretch in", illum.stretch_in);
            }
            if illum.use_mask {
                s.row(
                    "Mask",
                    format!(
                        "offset {}, close {}, erode {}",
                        illum.mask.offset, illum.mask.close_radius, illum.mask.erode_radius
                    ),
                );
            } else {
                println!(
                    "    {:<14}{}",
                    s.label.apply_to("Mask"),
                    s.disabled.apply_to("disabled")
                );
            }
        }
    }
    if let Some(path) = &job.save_field {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Save to"),
            s.path.apply_to(path.display())
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Output"));
    s.row("Suffix", &job.config.naming.illum_suffix);
    if job.config.correction.stretch_out > 0.0 {
        s.row("Stretch out", job.config.correction.stretch_out);
    }
    println!();
}

pub fn print_illumination_report(report: &IlluminationReport) {
    let s = Styles::new();
    println!();
    s.row("Field range", format!("{:.4} .. {:.4}", report.field_min, report.field_max));
    s.row("Corrected", report.correction.outputs.len());
    s.row("With mask", report.correction.masked);
}

pub fn print_mask_report(report: &MaskReport) {
    let s = Styles::new();
    s.title("Artifact Masks");
    s.row("Processed", report.processed);
    s.row("Written", report.written);
    if report.failed > 0 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Failed"),
            s.warn.apply_to(report.failed)
        );
    }
}

pub fn print_outputs(title: &str, outputs: &[PathBuf]) {
    let s = Styles::new();
    s.title(title);
    for path in outputs {
        println!("    {}", s.path.apply_to(path.display()));
    }
}

pub fn print_saved(what: &str, path: &Path) {
    let s = Styles::new();
    println!(
        "\n  {} saved to {}",
        s.method.apply_to(what),
        s.path.apply_to(path.display())
    );
}
