use crate::gallery::Site;
use crate::session::Artifact;
use console::style;
use termimad::MadSkin;

fn box_width(max: usize) -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), max).max(50)
}

/// Breaks `line` at spaces so no piece is longer than `max_len` characters.
fn wrap(line: &str, max_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut remaining: Vec<char> = line.chars().collect();

    while remaining.len() > max_len {
        let break_pos = remaining[..max_len]
            .iter()
            .rposition(|c| *c == ' ')
            .filter(|pos| *pos > 0)
            .unwrap_or(max_len);
        lines.push(remaining[..break_pos].iter().collect());
        let rest = &remaining[break_pos..];
        remaining = rest
            .iter()
            .skip_while(|c| **c == ' ')
            .copied()
            .collect();
    }
    lines.push(remaining.into_iter().collect());
    lines
}

/// Renders the assistant's full reply (prose and code) as terminal markdown
pub fn display_markdown(text: &str) {
    let skin = MadSkin::default();
    println!();
    skin.print_text(text);
}

/// Display the outcome of a generation: the page size and a short head of the code
pub fn display_generated(artifact: &Artifact, modified: bool) {
    let width = box_width(100);
    let title = if modified {
        "🛠  WEBSITE UPDATED"
    } else {
        "🌐 WEBSITE GENERATED"
    };

    let mut lines: Vec<String> = artifact
        .code
        .lines()
        .take(8)
        .flat_map(|line| wrap(line, width.saturating_sub(4)))
        .collect();
    let total = artifact.code.lines().count();
    if total > 8 {
        lines.push(format!("... {} more lines", total - 8));
    }

    let header = "┌─ html ".to_string() + &"─".repeat(width.saturating_sub(9)) + "┐";
    let footer = "└".to_string() + &"─".repeat(width - 2) + "┘";

    println!("\n{}", style(title).bold().magenta());
    println!("{}", style(&header).dim().green());
    for line in lines {
        let padding = width.saturating_sub(line.chars().count() + 3);
        println!("│ {}{}│", style(&line).white(), " ".repeat(padding));
    }
    println!("{}", style(&footer).dim().green());
    println!(
        "{}",
        style("/preview to open it, /code for the explanation, /save to keep it").dim()
    );
}

/// Numbered gallery listing, most viewed first
pub fn display_sites(sites: &[Site]) {
    let width = box_width(80);
    let top_border = "┌─ gallery ".to_string() + &"─".repeat(width.saturating_sub(12)) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(width - 2) + "┘";

    println!("\n{}", style(&top_border).dim().blue());
    for (i, site) in sites.iter().enumerate() {
        let views = if site.views == 1 {
            "1 view".to_string()
        } else {
            format!("{} views", site.views)
        };
        let entry = format!("{:>3}. {} ({})", i + 1, site.name, views);
        let padding = width.saturating_sub(entry.chars().count() + 3);
        println!("│ {}{}│", style(&entry).bold().white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().blue());
}

pub fn display_progress(message: &str) {
    println!("{} {}", style("⏳").yellow(), style(message).dim());
}

pub fn display_info(message: &str) {
    println!("{}", message);
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("❌").bold().red(), style(message).bold().red());
}
