use console::Style;
use sharpframes_core::frame::SourceInfo;
use sharpframes_core::pipeline::config::SharpFramesConfig;
use sharpframes_core::pipeline::RunOutput;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
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
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_run_summary(config: &SharpFramesConfig, info: &SourceInfo) {
    let s = Styles::new();
    print_title(&s, "SharpFrames");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    let frames = match info.total_frames {
        Some(n) => n.to_string(),
        None => "unknown".to_string(),
    };
    println!(
        "  {:<14}{} frames, {}x{}",
        s.label.apply_to("Source"),
        s.value.apply_to(frames),
        info.width,
        info.height
    );
    println!();

    println!("  {}", s.header.apply_to("Segment"));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Batch"),
        s.value.apply_to(config.segment.batch_index)
    );
    if config.scan.frames_per_batch == 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Length"),
            s.disabled.apply_to("whole video")
        );
    } else {
        println!(
            "  {:<14}{} scored frames",
            s.label.apply_to("Length"),
            s.value.apply_to(config.scan.frames_per_batch)
        );
    }
    println!(
        "  {:<14}every {} frame(s), {} worker(s)",
        s.label.apply_to("Scan"),
        s.value.apply_to(config.scan.step),
        s.value.apply_to(config.scan.workers)
    );
    if config.segment.global_offset > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Offset"),
            s.value.apply_to(config.segment.global_offset)
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Selection"));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Policy"),
        s.method.apply_to(&config.selection)
    );
    println!();
}

pub fn print_run_result(output: &RunOutput) {
    let s = Styles::new();
    print_title(&s, "Result");

    if let Some(window) = output.window {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Window"),
            s.value.apply_to(window)
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scored"),
        s.value.apply_to(output.scores.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Selected"),
        s.value.apply_to(output.selection.len())
    );
    if !output.extraction.failed.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Failed"),
            s.disabled.apply_to(format!("{:?}", output.extraction.failed))
        );
    }

    let manifest = output.manifest();
    if manifest.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Manifest"),
            s.disabled.apply_to("no frame passed selection")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Manifest"),
            s.method.apply_to(manifest)
        );
    }
    println!();
}
