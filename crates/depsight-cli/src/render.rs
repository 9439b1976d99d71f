use anstyle::{AnsiColor, Effects, Style};
use depsight_graph::{DependencyGraph, FrameworkPackages, InstalledPackageReference};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

const INDENT: &str = "   ";
const COLUMN_GAP: &str = "   ";

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub(crate) fn render_report(
    project: &str,
    report: &[FrameworkPackages],
    style: OutputStyle,
) -> Vec<String> {
    if report.is_empty() {
        return vec![format!(
            "No matching frameworks were found for project '{project}'."
        )];
    }

    let mut lines = vec![format!(
        "Project '{project}' has the following package references"
    )];
    for packages in report {
        lines.push(paint(
            style,
            section_style(),
            &format!("{INDENT}[{}]:", packages.framework),
        ));

        if packages.top_level.is_empty() && packages.transitive.is_empty() {
            lines.push(format!(
                "{INDENT}No package references were found for this framework."
            ));
            lines.push(String::new());
            continue;
        }

        if !packages.top_level.is_empty() {
            let rows = packages
                .top_level
                .iter()
                .map(|row| {
                    vec![
                        package_cell(row),
                        row.original_requested_version.clone().unwrap_or_default(),
                        row.resolved_version.to_string(),
                    ]
                })
                .collect::<Vec<_>>();
            lines.extend(render_table(
                style,
                &["Top-level Package", "Requested", "Resolved"],
                &rows,
            ));
            lines.push(String::new());
        }

        if !packages.transitive.is_empty() {
            let rows = packages
                .transitive
                .iter()
                .map(|row| vec![package_cell(row), row.resolved_version.to_string()])
                .collect::<Vec<_>>();
            lines.extend(render_table(
                style,
                &["Transitive Package", "Resolved"],
                &rows,
            ));
            lines.push(String::new());
        }
    }

    if report.iter().any(|packages| {
        packages
            .top_level
            .iter()
            .any(|row| row.auto_referenced)
    }) {
        lines.push("(A) : Auto-referenced package.".to_string());
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

pub(crate) fn render_paths(graph: &DependencyGraph, package: &str, style: OutputStyle) -> Vec<String> {
    let root = graph.root_node().name();
    let paths = graph.paths_to(package);
    if paths.is_empty() {
        return vec![format!(
            "'{package}' is not part of the dependency graph of '{root}'."
        )];
    }

    let mut lines = vec![format!(
        "'{package}' is reachable from '{root}' through {} path(s):",
        paths.len()
    )];
    for path in paths {
        let hops = path
            .iter()
            .enumerate()
            .map(|(position, id)| {
                let node = graph.node(*id);
                if position == 0 {
                    return node.name().to_string();
                }
                let outside = graph
                    .edge_range(path[position - 1], *id)
                    .filter(|range| !range.contains(&node.id().version));
                match outside {
                    Some(range) => format!("{} (outside {range})", node.id()),
                    None => node.id().to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(" > ");
        lines.push(paint(style, path_style(), &format!("{INDENT}{hops}")));
    }
    lines
}

fn package_cell(row: &InstalledPackageReference) -> String {
    if row.auto_referenced {
        format!("> {} (A)", row.name)
    } else {
        format!("> {}", row.name)
    }
}

fn render_table(style: OutputStyle, header: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    // Header cells are shifted by two so they line up with the "> " row marker.
    let header = header
        .iter()
        .enumerate()
        .map(|(column, title)| {
            if column == 0 {
                format!("  {title}")
            } else {
                (*title).to_string()
            }
        })
        .collect::<Vec<_>>();

    let mut widths = header.iter().map(|cell| cell.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(column) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(paint(style, header_style(), &format_row(&header, &widths)));
    for row in rows {
        lines.push(format_row(row, &widths));
    }
    lines
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, width))| {
            if column == last {
                cell.clone()
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    format!("{INDENT}{line}")
}

fn paint(style: OutputStyle, ansi: Style, text: &str) -> String {
    match style {
        OutputStyle::Plain => text.to_string(),
        OutputStyle::Rich => format!("{}{}{}", ansi.render(), text, ansi.render_reset()),
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn header_style() -> Style {
    Style::new().effects(Effects::UNDERLINE)
}

fn path_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightCyan.into()))
}
