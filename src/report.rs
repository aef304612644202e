use crate::repo_status::RepoStatus;

/// `Found N Git repositories.`, singular for exactly one.
pub fn summary_line(count: usize) -> String {
    let noun = if count == 1 {
        "repository"
    } else {
        "repositories"
    };
    format!("Found {count} Git {noun}.")
}

/// One aligned line per repository, sorted by name.
pub fn status_lines(statuses: &[RepoStatus]) -> Vec<String> {
    let name_width = statuses.iter().map(|s| s.name.chars().count()).max();
    let head_width = statuses.iter().map(|s| s.head.chars().count()).max();
    let (Some(name_width), Some(head_width)) = (name_width, head_width) else {
        return vec![];
    };

    let mut sorted: Vec<&RepoStatus> = statuses.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
        .into_iter()
        .map(|s| render(s, name_width, head_width))
        .collect()
}

/// Columns: not-up-to-date flag, name, locality (`[LR]` local repository,
/// `[LB]` branch without upstream), head, dirty marker, `>ahead`, `<behind`.
pub fn render(status: &RepoStatus, name_width: usize, head_width: usize) -> String {
    let flag = if status.is_up_to_date() { ' ' } else { '!' };
    let locality = if status.is_local {
        "[LR]"
    } else if !status.has_upstream {
        "[LB]"
    } else {
        "    "
    };
    let dirty = if status.has_changes { " *" } else { "  " };
    let ahead = count_column('>', status.ahead);
    let behind = count_column('<', status.behind);

    let line = format!(
        "{flag}  {name:<name_width$}  {locality}  {head:<head_width$} {dirty}{ahead}{behind}",
        name = status.name,
        head = status.head,
    );
    line.trim_end().to_string()
}

fn count_column(marker: char, count: usize) -> String {
    if count > 0 {
        format!(" {marker}{count}")
    } else {
        "   ".to_string()
    }
}
