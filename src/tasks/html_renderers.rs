//! HTML building functions for the task pages
use crate::shared::utils::{escape_html, selected_if};
use crate::tasks::handlers::ListQuery;
use crate::tasks::types::{Task, TaskStats};

const PAGE_STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { margin-bottom: 0.5rem; }
.notice { padding: 0.6rem 1rem; border-radius: 6px; margin: 0.8rem 0; }
.notice.success { background: #e6f4ea; color: #1e6b33; }
.notice.error { background: #fdecea; color: #a12622; }
.stats { display: flex; gap: 0.8rem; flex-wrap: wrap; margin: 1rem 0; }
.stat-card { background: #f4f5f7; border-radius: 8px; padding: 0.6rem 1rem; min-width: 100px; }
.stat-value { font-size: 1.4rem; font-weight: 700; }
.stat-label { font-size: 0.8rem; color: #666; }
form.add-form, form.edit-form { display: flex; gap: 0.5rem; flex-wrap: wrap; margin: 1rem 0; align-items: center; }
form.filters { display: flex; gap: 0.5rem; margin: 1rem 0; align-items: center; }
input[type=text] { flex: 1; min-width: 200px; padding: 0.4rem; }
ul.tasks { list-style: none; padding: 0; }
ul.tasks li { display: flex; gap: 0.6rem; align-items: center; padding: 0.5rem 0.3rem; border-bottom: 1px solid #eee; }
ul.tasks li.completed .task-text { text-decoration: line-through; color: #999; }
.task-text { flex: 1; }
.badge { font-size: 0.75rem; padding: 0.15rem 0.5rem; border-radius: 999px; background: #eef; }
.badge.priority-high { background: #fdecea; color: #a12622; }
.badge.priority-medium { background: #fff4e0; color: #8a5b00; }
.badge.priority-low { background: #e6f4ea; color: #1e6b33; }
.task-thumb { height: 42px; border-radius: 4px; }
.task-dates { font-size: 0.72rem; color: #999; }
.actions a { margin-left: 0.4rem; font-size: 0.85rem; }
.footer { margin-top: 1.2rem; }
.footer a { color: #a12622; }
.empty { color: #888; padding: 1rem 0; }
"#;

fn notice_banner(query: &ListQuery) -> String {
    match &query.notice {
        Some(notice) if !notice.is_empty() => {
            let kind = match query.kind.as_deref() {
                Some("error") => "error",
                _ => "success",
            };
            format!(
                r#"<div class="notice {kind}">{message}</div>"#,
                kind = kind,
                message = escape_html(notice)
            )
        }
        _ => String::new(),
    }
}

fn stats_section(stats: &TaskStats) -> String {
    let cards = [
        (stats.total, "Total"),
        (stats.completed, "Completed"),
        (stats.pending, "Pending"),
        (stats.high_priority, "High priority"),
        (stats.categories, "Categories"),
    ];
    let cards_html: String = cards
        .iter()
        .map(|(value, label)| {
            format!(
                r#"<div class="stat-card"><div class="stat-value">{value}</div><div class="stat-label">{label}</div></div>"#
            )
        })
        .collect();
    format!(r#"<div class="stats">{cards_html}</div>"#)
}

fn priority_options(selected: &str) -> String {
    ["low", "medium", "high"]
        .iter()
        .map(|p| {
            format!(
                r#"<option value="{p}"{sel}>{p}</option>"#,
                sel = selected_if(selected, p)
            )
        })
        .collect()
}

fn filter_form(query: &ListQuery, categories: &[String]) -> String {
    let priority = query.priority.as_deref().unwrap_or("all");
    let category = query.category.as_deref().unwrap_or("all");
    let status = query.status.as_deref().unwrap_or("all");

    let category_options: String = categories
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{value}"{sel}>{label}</option>"#,
                value = escape_html(c),
                sel = selected_if(category, c),
                label = escape_html(c)
            )
        })
        .collect();

    format!(
        r#"<form class="filters" method="get" action="/">
    <label>Priority <select name="priority"><option value="all">all</option>{priority_options}</select></label>
    <label>Category <select name="category"><option value="all">all</option>{category_options}</select></label>
    <label>Status <select name="status">
        <option value="all"{all_sel}>all</option>
        <option value="pending"{pending_sel}>pending</option>
        <option value="completed"{completed_sel}>completed</option>
    </select></label>
    <button type="submit">Filter</button>
</form>"#,
        priority_options = priority_options(priority),
        category_options = category_options,
        all_sel = selected_if(status, "all"),
        pending_sel = selected_if(status, "pending"),
        completed_sel = selected_if(status, "completed"),
    )
}

fn task_item(task: &Task) -> String {
    let completed_class = if task.completed { " completed" } else { "" };
    let toggle_mark = if task.completed { "&#10003;" } else { "&#9675;" };
    let image_html = task
        .image
        .as_ref()
        .map(|name| {
            format!(
                r#"<a href="/uploads/{name}"><img class="task-thumb" src="/uploads/{name}" alt=""></a> <a class="task-dates" href="/delete-image/{id}">remove image</a>"#,
                name = escape_html(name),
                id = task.id
            )
        })
        .unwrap_or_default();
    let updated = task
        .updated_at
        .map(|at| format!(", updated {}", at.format("%Y-%m-%d %H:%M:%S")))
        .unwrap_or_default();

    format!(
        r#"<li class="task{completed_class}">
    <a class="toggle" href="/toggle/{id}" title="toggle">{toggle_mark}</a>
    <span class="task-text">{text}</span>
    <span class="badge priority-{priority}">{priority}</span>
    <span class="badge">{category}</span>
    {image_html}
    <span class="task-dates">created {created}{updated}</span>
    <span class="actions"><a href="/edit/{id}">edit</a><a href="/delete/{id}">delete</a></span>
</li>"#,
        completed_class = completed_class,
        id = task.id,
        toggle_mark = toggle_mark,
        text = escape_html(&task.text),
        priority = task.priority.as_str(),
        category = escape_html(&task.category),
        image_html = image_html,
        created = task.created_at.format("%Y-%m-%d %H:%M:%S"),
        updated = updated,
    )
}

/// Full index page: notice, stats, add form, filters, task list.
pub fn render_index(
    tasks: &[Task],
    stats: &TaskStats,
    categories: &[String],
    query: &ListQuery,
) -> String {
    let task_list = if tasks.is_empty() {
        r#"<div class="empty">No tasks match the current filters.</div>"#.to_string()
    } else {
        let items: String = tasks.iter().map(task_item).collect();
        format!(r#"<ul class="tasks">{items}</ul>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Task Tracker</title>
<style>{style}</style>
</head>
<body>
<h1>Task Tracker</h1>
{notice}
{stats}
<form class="add-form" method="post" action="/" enctype="multipart/form-data">
    <input type="text" name="todo" placeholder="What needs doing?" required>
    <select name="priority">{priority_options}</select>
    <input type="text" name="category" placeholder="category" size="12">
    <input type="file" name="image" accept="image/*">
    <button type="submit">Add task</button>
</form>
{filters}
{task_list}
<div class="footer"><a href="/clear" onclick="return confirm('Delete all tasks?')">Clear all tasks</a></div>
</body>
</html>"#,
        style = PAGE_STYLE,
        notice = notice_banner(query),
        stats = stats_section(stats),
        priority_options = priority_options("medium"),
        filters = filter_form(query, categories),
        task_list = task_list,
    )
}

/// Edit page for a single task, prefilled with its current values.
pub fn render_edit(task: &Task) -> String {
    let image_html = task
        .image
        .as_ref()
        .map(|name| {
            format!(
                r#"<p>Current image: <a href="/uploads/{name}"><img class="task-thumb" src="/uploads/{name}" alt=""></a>
<a href="/delete-image/{id}">remove</a></p>"#,
                name = escape_html(name),
                id = task.id
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Edit task</title>
<style>{style}</style>
</head>
<body>
<h1>Edit task</h1>
<form class="edit-form" method="post" action="/edit/{id}" enctype="multipart/form-data">
    <input type="text" name="todo" value="{text}" required>
    <select name="priority">{priority_options}</select>
    <input type="text" name="category" value="{category}" size="12">
    <input type="file" name="image" accept="image/*">
    <button type="submit">Save</button>
    <a href="/">Cancel</a>
</form>
{image_html}
</body>
</html>"#,
        style = PAGE_STYLE,
        id = task.id,
        text = escape_html(&task.text),
        priority_options = priority_options(task.priority.as_str()),
        category = escape_html(&task.category),
        image_html = image_html,
    )
}
