use console::Style;
use multiview_core::pipeline::config::PipelineConfig;
use multiview_core::pipeline::GenerationOutput;
use multiview_core::validate::ConsistencyReport;
use multiview_core::views::ViewResult;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warning: Style,
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
            warning: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig, input: &std::path::Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Multiview Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Primary"),
        s.method.apply_to(if config.use_original_as_primary {
            "enhanced input"
        } else {
            "edited"
        })
    );
    println!();

    println!("  {}", s.header.apply_to("Views"));
    for spec in &config.views {
        println!(
            "    {:<22}{}",
            s.label.apply_to(spec.role),
            s.value.apply_to(format!("{:+.0}\u{b0}", spec.rotation_degrees))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Corrections"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Bounds"),
        s.value.apply_to(config.correction)
    );
    if config.background.enabled {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Background"),
            s.method.apply_to(format!("removed, {} px", config.background.output_size))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Background"),
            s.disabled.apply_to("kept")
        );
    }
    println!();
}

pub fn print_generation_summary(output: &GenerationOutput) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Seed"),
        s.value.apply_to(output.seed)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Brightness"),
        s.value.apply_to(format!("{:.1}", output.target_brightness))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Elapsed"),
        s.value.apply_to(format!("{:.1}s", output.elapsed.as_secs_f64()))
    );
    println!();

    print_views(&s, &output.views);
    for dropped in &output.dropped {
        println!(
            "    {:<22}{}",
            s.label.apply_to(dropped.role),
            s.disabled.apply_to(format!("dropped: {}", dropped.reason))
        );
    }
    println!();

    print_report_section(&s, &output.report);

    if let Some(ref dir) = output.saved_to {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Saved"),
            s.path.apply_to(dir.display())
        );
    }
}

pub fn print_check_summary(views: &[ViewResult], report: &ConsistencyReport) {
    let s = Styles::new();

    println!();
    print_views(&s, views);
    println!();
    print_report_section(&s, report);
}

fn print_views(s: &Styles, views: &[ViewResult]) {
    println!("  {}", s.header.apply_to("Views"));
    for view in views {
        let [r, g, b] = view.color_factors;
        println!(
            "    {:<22}{}",
            s.label.apply_to(view.role),
            s.value.apply_to(format!(
                "rgb {r:.3}/{g:.3}/{b:.3}  light {:.3}",
                view.brightness_factor
            ))
        );
    }
}

fn print_report_section(s: &Styles, report: &ConsistencyReport) {
    println!("  {}", s.header.apply_to("Consistency"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Contrast var"),
        s.value.apply_to(format!("{:.1}", report.contrast_variance))
    );
    if report.passed() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Result"),
            s.method.apply_to("passed")
        );
    } else {
        for warning in &report.warnings {
            println!("    {}", s.warning.apply_to(warning));
        }
    }
    println!();
}
