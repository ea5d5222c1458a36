//! Built-in pane content

/// Shown in the home tab when no dashboard payload was supplied.
pub fn welcome_page() -> String {
    r#"<div class="row">
  <div class="col-12">
    <div class="card">
      <div class="card-body text-center py-5">
        <h4 class="mb-3">Welcome to Bankers Realm</h4>
        <p class="text-muted">Select a module from the menu to begin</p>
      </div>
    </div>
  </div>
</div>"#
        .to_string()
}

/// Pane for a page that failed to load.
pub fn error_page(title: &str, message: &str) -> String {
    format!(
        r#"<div class="card">
  <div class="card-body">
    <div class="alert alert-danger">
      <h5>Error Loading Page</h5>
      <p>Unable to load the page: {}</p>
      <p class="mb-0"><small>{}</small></p>
    </div>
  </div>
</div>"#,
        escape_html(title),
        escape_html(message)
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
