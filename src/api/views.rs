//! HTML views for the evaluation tracker
//!
//! Small string builders, one per page. No template engine; the pages are
//! plain forms and tables.

use crate::types::{Course, Evaluation};

/// Escape text for embedding in HTML
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shared page shell
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n\
         <body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Landing page
pub fn index() -> String {
    page(
        "Evaluation Tracker",
        "<h1>Evaluation Tracker</h1>\n\
         <p><a href=\"/evalc\">Add an evaluation</a></p>",
    )
}

/// Evaluation entry form, blank for a create, pre-filled for an edit
pub fn evaluation_form(courses: &[Course], eval: &Evaluation, edit: bool) -> String {
    let mut options = String::new();
    for course in courses {
        let selected = if course.code == eval.course {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{} - {}</option>\n",
            escape(&course.code),
            selected,
            escape(&course.code),
            escape(&course.name),
        ));
    }

    let id_field = match eval.id {
        Some(id) => format!("<input type=\"hidden\" name=\"id\" value=\"{}\">\n", id),
        None => String::new(),
    };

    let body = format!(
        "<h1>{}</h1>\n\
         <form action=\"/evals\" method=\"post\">\n\
         {}<input type=\"hidden\" name=\"edit\" value=\"{}\">\n\
         <label>Title <input type=\"text\" name=\"title\" value=\"{}\"></label><br>\n\
         <label>Course <select name=\"course\">\n{}</select></label><br>\n\
         <label>Grade <input type=\"number\" step=\"any\" name=\"grade\" value=\"{}\"></label><br>\n\
         <label>Max <input type=\"number\" step=\"any\" name=\"max\" value=\"{}\"></label><br>\n\
         <label>Weight <input type=\"number\" step=\"any\" name=\"weight\" value=\"{}\"></label><br>\n\
         <label>Due date <input type=\"date\" name=\"due_date\" value=\"{}\"></label><br>\n\
         <button type=\"submit\">Save</button>\n\
         </form>",
        if edit {
            "Edit Evaluation"
        } else {
            "New Evaluation"
        },
        id_field,
        edit,
        escape(&eval.title),
        options,
        eval.grade,
        eval.max,
        eval.weight,
        eval.due_date,
    );

    page("Evaluation", &body)
}

/// Result page after a successful submit
///
/// `eval_id` is present only for the edit flow; its absence marks the
/// submission as a create.
pub fn results(evals: &[Evaluation], eval_id: Option<i64>) -> String {
    let mut rows = String::new();
    for eval in evals {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            eval.id.unwrap_or_default(),
            escape(&eval.title),
            escape(&eval.course),
            eval.grade,
            eval.max,
            eval.weight,
            eval.due_date,
        ));
    }

    let marker = match eval_id {
        Some(id) => format!("<p id=\"evalId\">Updated evaluation evalId={}</p>\n", id),
        None => String::new(),
    };

    let body = format!(
        "<h1>Evaluations</h1>\n{}\
         <table>\n\
         <tr><th>Id</th><th>Title</th><th>Course</th><th>Grade</th>\
         <th>Max</th><th>Weight</th><th>Due</th></tr>\n\
         {}</table>\n\
         <p><a href=\"/evalc\">Add another</a></p>",
        marker, rows
    );

    page("Evaluation Results", &body)
}

/// Error page with a short reason
pub fn error(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n\
         <p><a href=\"/evalc\">Back to the form</a></p>",
        escape(message)
    );
    page("Error", &body)
}
