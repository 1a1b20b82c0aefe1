//! HTML rendering for the admin upload page.

use common::publisher::EntryOutcome;
use common::uploader::UploadReport;

pub const SUCCESS_MESSAGE: &str = "File uploaded, extracted, and entries created successfully!";
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload the file.";

/// Aggregate result banner shown above the form.
pub enum Banner {
    Updated(String),
    Error(String),
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_banner(banner: &Banner) -> String {
    let (class, message) = match banner {
        Banner::Updated(msg) => ("updated", msg),
        Banner::Error(msg) => ("error", msg),
    };
    format!(r#"<div class="{class}"><p>{}</p></div>"#, escape_html(message))
}

/// One line per image outcome.
pub fn render_outcome(outcome: &EntryOutcome) -> String {
    let line = match outcome {
        EntryOutcome::Created { title, .. } => format!("Entry created: {title}"),
        EntryOutcome::Failed { title, .. } => format!("Error creating entry: {title}"),
        EntryOutcome::CategoryMissing { title, .. } => {
            format!("Error getting category ID for entry: {title}")
        }
    };
    format!("<p>{}</p>", escape_html(&line))
}

/// Report body: per-entry lines and warnings, followed by the success banner.
pub fn render_report(report: &UploadReport) -> String {
    let mut body = String::new();
    for warning in &report.warnings {
        body.push_str(&format!(
            r#"<p class="warning">{}</p>"#,
            escape_html(warning)
        ));
    }
    for outcome in &report.entries {
        body.push_str(&render_outcome(outcome));
        body.push('\n');
    }
    body.push_str(&render_banner(&Banner::Updated(SUCCESS_MESSAGE.into())));
    body
}

pub fn render_error(message: &str) -> String {
    render_banner(&Banner::Error(message.into()))
}

/// Full admin page: optional result fragment followed by the upload form.
pub fn render_page(result: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Icon Uploader</title>
    <style>
        body {{
            font-family: -apple-system, 'Segoe UI', sans-serif;
            margin: 2em;
        }}
        .updated {{
            border-left: 4px solid #46b450;
            padding: 0 12px;
        }}
        .error {{
            border-left: 4px solid #dc3232;
            padding: 0 12px;
        }}
        .warning {{
            color: #996800;
        }}
    </style>
</head>
<body>
<div class="wrap">
    <h2>Icon Uploader</h2>
    {result}
    <form method="post" enctype="multipart/form-data">
        <label for="zip_file">Upload ZIP file:</label>
        <input type="file" id="zip_file" name="zip_file" accept=".zip">
        <input type="submit" value="Upload" class="button button-primary">
    </form>
</div>
</body>
</html>
"#,
        result = result.unwrap_or_default()
    )
}
