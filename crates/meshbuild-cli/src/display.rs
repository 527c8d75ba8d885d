//! Display formatting for CLI output

use console::style;
use meshbuild_core::{ExtractedResource, ExtractionConfig};
use meshbuild_repo::BuildInfo;

/// Print the initialization result, including any failures
pub fn print_build_info(info: &BuildInfo) {
    println!("{}", style("Mesh model").cyan().bold());
    println!("{}: {}", style("Category").bold(), info.model.category);
    println!("{}: {}", style("Sub-category").bold(), info.model.sub_category);
    println!(
        "{}: {} key(s)",
        style("Metadata").bold(),
        info.model.metadata.len()
    );
    println!();

    match &info.resolved {
        Some(resolved) => {
            println!("{}", style("Resolved").green().bold());
            println!("{}: {}", style("Chart version").bold(), resolved.chart_version);
            println!("{}: {}", style("App version").bold(), resolved.app_version);
            println!("{}: {}", style("Generation URL").bold(), resolved.generation_url);
            println!(
                "{}: {}",
                style("Generation method").bold(),
                resolved.generation_method
            );
            println!(
                "{}: {}",
                style("Workload path").bold(),
                resolved.workload_path.display()
            );
            println!(
                "{}: {}",
                style("Mesh model path").bold(),
                resolved.mesh_model_path.display()
            );
            println!();
            print_extraction_config(&resolved.extraction);
        }
        None => {
            println!(
                "{} version-dependent settings are unset",
                style("Unresolved:").yellow().bold()
            );
        }
    }

    if !info.failures.is_empty() {
        println!();
        println!("{}", style("Warnings").yellow().bold());
        for failure in &info.failures {
            println!(
                "  {} [{}] {}",
                style("!").yellow(),
                failure.kind,
                failure.message
            );
        }
    }
}

/// Print the CRD extraction settings as a table
pub fn print_extraction_config(config: &ExtractionConfig) {
    println!(
        "{} {} {}",
        style("Extraction").cyan().bold(),
        config.mesh_name,
        style(&config.mesh_version).dim()
    );
    println!("{}: {:?}", style("Split").bold(), config.split);
    println!(
        "{}: {}",
        style("Case-sensitive paths").bold(),
        config.case_sensitive()
    );
    for (field, path) in config.field_paths() {
        println!("  {:<8} {}", field, path);
    }
}

/// Print extracted resources as a table
pub fn print_resources(resources: &[ExtractedResource]) {
    if resources.is_empty() {
        println!("{}", style("No resource definitions found").dim());
        return;
    }

    println!("{:<30} {:<35} {:<12}", "NAME", "GROUP", "VERSION");
    println!("{}", "-".repeat(77));
    for resource in resources {
        println!(
            "{:<30} {:<35} {:<12}",
            resource.name, resource.group, resource.version
        );
    }
}
