pub mod styles;

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{Section, UiState};
use crate::git::{FileEntry, RepoState};

/// Render the base view: the head summary line, then the three expandable
/// sections. The highlighted row is the one matching `(ui.section, ui.pos)`.
pub fn draw(f: &mut Frame, repo: Option<&RepoState>, ui: &UiState) {
    let area = f.area();

    let Some(repo) = repo else {
        let placeholder = Paragraph::new(" scanning repository…").style(styles::dim_style());
        f.render_widget(placeholder, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_row = 0usize;

    if ui.section == Section::Head {
        selected_row = lines.len();
    }
    lines.push(head_line(repo, ui.section == Section::Head));
    lines.push(Line::raw(""));

    let sections: [(Section, &Vec<FileEntry>); 3] = [
        (Section::Untracked, &repo.untracked),
        (Section::Unstaged, &repo.unstaged),
        (Section::Staged, &repo.staged),
    ];
    for (section, entries) in sections {
        let header_selected = ui.section == section && ui.pos == 0;
        if header_selected {
            selected_row = lines.len();
        }
        lines.push(section_header(section, entries.len(), ui.expanded(section), header_selected));

        if ui.expanded(section) {
            for (i, entry) in entries.iter().enumerate() {
                let selected = ui.section == section && ui.pos == i + 1;
                if selected {
                    selected_row = lines.len();
                }
                lines.push(entry_line(entry, selected));
            }
        }
        lines.push(Line::raw(""));
    }

    // Keep the selection on screen when the tree outgrows the window.
    let height = area.height as usize;
    let scroll = if height > 0 && selected_row >= height {
        (selected_row + 1 - height) as u16
    } else {
        0
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .style(styles::default_style())
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

/// `branch → upstream  subject`, from the status headers, the branch
/// listing, or the detached-head log fallback.
fn head_line(repo: &RepoState, selected: bool) -> Line<'static> {
    let row = row_style(selected, styles::default_style());

    let mut spans = vec![Span::styled(
        format!(" {} ", repo.branch_head.as_deref().unwrap_or("(detached)")),
        row.patch(styles::branch_style()),
    )];
    if let Some(upstream) = &repo.branch_upstream {
        spans.push(Span::styled(format!("→ {upstream}  "), row.patch(styles::dim_style())));
    }
    match repo.head_ref() {
        Some(head) => {
            let short = head.objectname.get(..7).unwrap_or(&head.objectname);
            spans.push(Span::styled(format!("{short} "), row.patch(styles::dim_style())));
            spans.push(Span::styled(head.subject.clone(), row));
        }
        None => {
            if let Some(summary) = &repo.head_summary {
                spans.push(Span::styled(summary.clone(), row));
            }
        }
    }
    Line::from(spans).style(row)
}

fn section_header(section: Section, len: usize, expanded: bool, selected: bool) -> Line<'static> {
    let row = row_style(selected, styles::default_style());
    let arrow = if expanded { "▾" } else { "▸" };
    Line::from(Span::styled(
        format!(" {arrow} {} ({len})", section.title()),
        row.patch(styles::section_header_style()),
    ))
    .style(row)
}

fn entry_line(entry: &FileEntry, selected: bool) -> Line<'static> {
    let row = row_style(selected, styles::default_style());
    let (symbol, symbol_style) = status_symbol(entry.status);
    Line::from(vec![
        Span::styled(format!("   {symbol} "), row.patch(symbol_style)),
        Span::styled(entry.path.clone(), row),
        Span::styled(format!("  {}", entry.status), row.patch(styles::dim_style())),
    ])
    .style(row)
}

fn status_symbol(status: &str) -> (&'static str, Style) {
    match status {
        "added" => ("+", styles::status_added()),
        "untracked" => ("?", styles::status_untracked()),
        "deleted" => ("-", styles::status_deleted()),
        "renamed" => ("R", styles::status_modified()),
        "copied" => ("C", styles::status_modified()),
        "unmerged" => ("!", styles::status_conflict()),
        "type-change" => ("T", styles::status_modified()),
        _ => ("~", styles::status_modified()),
    }
}

fn row_style(selected: bool, base: Style) -> Style {
    if selected {
        base.patch(styles::selected_style())
    } else {
        base
    }
}
