//! HTML page generator implementation.

use tasting_survey_types::{Catalog, FormState, Item, Ranking, RatingField};

use crate::fields;

/// Options for HTML generation.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// CSS class prefix for all generated elements.
    pub class_prefix: String,
    /// URL path item images are served from.
    pub assets_path: String,
    /// Where the form posts to.
    pub action: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlOptions {
    pub fn new() -> Self {
        Self {
            include_styles: true,
            class_prefix: "survey".to_string(),
            assets_path: "/assets".to_string(),
            action: "/".to_string(),
        }
    }

    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_assets_path(mut self, path: impl Into<String>) -> Self {
        self.assets_path = path.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    fn asset_url(&self, file: &str) -> String {
        format!("{}/{}", self.assets_path.trim_end_matches('/'), file)
    }
}

/// A message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    fn class(&self) -> &'static str {
        match self.kind {
            BannerKind::Info => "info",
            BannerKind::Error => "error",
        }
    }
}

/// Render the survey form, pre-filled from `form`.
pub fn render_form(
    catalog: &Catalog,
    form: &FormState,
    banner: Option<&Banner>,
    options: &HtmlOptions,
) -> String {
    let prefix = &options.class_prefix;
    let labels = catalog.labels();
    let mut html = document_start(catalog, options);

    html.push_str(&format!(
        "<form id=\"survey-form\" class=\"{prefix}-form\" method=\"post\" action=\"{}\">\n",
        escape_html(&options.action)
    ));
    html.push_str(&format!(
        "  <h1 class=\"{prefix}-title\">{}</h1>\n",
        escape_html(catalog.title())
    ));

    if let Some(intro) = catalog.intro() {
        html.push_str(&format!(
            "  <div class=\"{prefix}-prelude\">{}</div>\n",
            escape_html(intro)
        ));
    }

    if let Some(banner) = banner {
        html.push_str(&generate_banner(banner, prefix));
    }

    html.push_str(&format!("  <div class=\"{prefix}-field\">\n"));
    html.push_str(&format!(
        "    <label for=\"{name}\">{}</label>\n",
        escape_html(&labels.name),
        name = fields::NAME
    ));
    html.push_str(&format!(
        "    <input type=\"text\" id=\"{name}\" name=\"{name}\" class=\"{prefix}-input\" value=\"{}\">\n",
        escape_html(&form.name),
        name = fields::NAME
    ));
    html.push_str("  </div>\n");

    for item in catalog.items() {
        html.push_str(&generate_item(catalog, item, form, options));
    }

    html.push_str(&generate_ranking(catalog, form, prefix));

    html.push_str(&format!(
        "  <h2 class=\"{prefix}-heading\">{}</h2>\n",
        escape_html(&labels.ideas_heading)
    ));
    html.push_str(&generate_textarea(fields::NEW_IDEAS, &labels.new_ideas, &form.new_ideas, prefix, 1));
    html.push_str(&generate_textarea(fields::FEEDBACK, &labels.feedback, &form.feedback, prefix, 1));

    html.push_str(&format!(
        "  <button type=\"submit\" class=\"{prefix}-submit\">{}</button>\n",
        escape_html(&labels.submit)
    ));
    html.push_str("</form>\n");
    html.push_str(SCRIPT);
    html.push_str("</body>\n</html>\n");

    html
}

/// Render the page shown once the session's survey has been sent.
pub fn render_thank_you(catalog: &Catalog, options: &HtmlOptions) -> String {
    let prefix = &options.class_prefix;
    let mut html = document_start(catalog, options);

    html.push_str(&format!("<main class=\"{prefix}-form {prefix}-done\">\n"));
    html.push_str(&format!(
        "  <p class=\"{prefix}-epilogue\">{}</p>\n",
        escape_html(catalog.thank_you())
    ));
    if let Some(image) = catalog.thank_you_image() {
        html.push_str(&format!(
            "  <img src=\"{}\" alt=\"\" class=\"{prefix}-image\">\n",
            escape_html(&options.asset_url(image))
        ));
    }
    html.push_str("</main>\n</body>\n</html>\n");

    html
}

/// Everything up to and including the opening body tag.
fn document_start(catalog: &Catalog, options: &HtmlOptions) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(catalog.title())));

    if let Some(icon) = catalog.icon() {
        let svg = format!(
            "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>\
             <text y='.9em' font-size='90'>{icon}</text></svg>"
        );
        html.push_str(&format!("  <link rel=\"icon\" href=\"{}\">\n", escape_html(&svg)));
    }

    if options.include_styles {
        html.push_str(&generate_styles(&options.class_prefix));
    }

    html.push_str("</head>\n<body>\n");
    html
}

fn generate_banner(banner: &Banner, prefix: &str) -> String {
    format!(
        "  <div class=\"{prefix}-banner {prefix}-banner-{}\" role=\"{}\">{}</div>\n",
        banner.class(),
        if banner.kind == BannerKind::Error { "alert" } else { "status" },
        escape_html(&banner.message)
    )
}

/// One item block: heading, image, description, rating groups, comment.
fn generate_item(catalog: &Catalog, item: &Item, form: &FormState, options: &HtmlOptions) -> String {
    let prefix = &options.class_prefix;
    let mut html = String::new();

    html.push_str(&format!(
        "  <section class=\"{prefix}-item\" id=\"item-{}\">\n",
        escape_html(&item.id)
    ));
    html.push_str(&format!("    <h2 class=\"{prefix}-heading\">{}</h2>\n", escape_html(&item.name)));
    html.push_str(&format!("    <div class=\"{prefix}-columns\">\n"));

    html.push_str(&format!("      <div class=\"{prefix}-column-image\">\n"));
    if let Some(image) = &item.image {
        html.push_str(&format!(
            "        <img src=\"{}\" alt=\"{}\" class=\"{prefix}-image\">\n",
            escape_html(&options.asset_url(image)),
            escape_html(&item.name)
        ));
    }
    html.push_str("      </div>\n");

    html.push_str(&format!("      <div class=\"{prefix}-column-details\">\n"));
    if !item.description.is_empty() {
        html.push_str(&format!(
            "        <p class=\"{prefix}-description\">{}</p>\n",
            escape_html(&item.description)
        ));
    }
    for field in catalog.fields() {
        html.push_str(&generate_rating(catalog, item, field, form, prefix));
    }
    let comment_path = fields::comment_path(&item.id);
    html.push_str(&generate_textarea(
        comment_path.as_str(),
        &catalog.labels().comment,
        form.comment(&item.id),
        prefix,
        4,
    ));
    html.push_str("      </div>\n");

    html.push_str("    </div>\n");
    html.push_str("  </section>\n");
    html
}

/// A horizontal radio group over the rating scale.
fn generate_rating(
    catalog: &Catalog,
    item: &Item,
    field: &RatingField,
    form: &FormState,
    prefix: &str,
) -> String {
    let ind = "        ";
    let scale = catalog.scale();
    let path = fields::grade_path(&item.id, &field.key);
    let field_id = path.element_id();
    let selected = form
        .grade(&item.id, &field.key)
        .filter(|level| scale.contains(level))
        .unwrap_or(scale.default_level());

    let mut html = String::new();
    html.push_str(&format!(
        "{ind}<fieldset class=\"{prefix}-fieldset {prefix}-rating\">\n"
    ));
    html.push_str(&format!("{ind}  <legend>{}</legend>\n", escape_html(&field.ask)));

    for (idx, level) in scale.levels().iter().enumerate() {
        let option_id = format!("{field_id}-{idx}");
        let checked = if level == selected { " checked" } else { "" };

        html.push_str(&format!("{ind}  <span class=\"{prefix}-radio-option\">\n"));
        html.push_str(&format!(
            "{ind}    <input type=\"radio\" id=\"{option_id}\" name=\"{path}\" value=\"{}\"{checked}>\n",
            escape_html(level)
        ));
        html.push_str(&format!(
            "{ind}    <label for=\"{option_id}\">{}</label>\n",
            escape_html(level)
        ));
        html.push_str(&format!("{ind}  </span>\n"));
    }

    html.push_str(&format!("{ind}</fieldset>\n"));
    html
}

/// The drag-reorder list and the hidden input the script keeps in sync.
///
/// The hidden input starts empty, so without script the ranking is reported
/// as unavailable.
fn generate_ranking(catalog: &Catalog, form: &FormState, prefix: &str) -> String {
    let labels = catalog.labels();
    let order = Ranking::resolve(catalog, &form.ranking)
        .unwrap_or_else(|_| Ranking::catalog_order(catalog));

    let mut html = String::new();
    html.push_str(&format!(
        "  <h2 class=\"{prefix}-heading\">{}</h2>\n",
        escape_html(&labels.ranking_heading)
    ));
    html.push_str(&format!(
        "  <p class=\"{prefix}-hint\">{}</p>\n",
        escape_html(&labels.ranking_hint)
    ));
    html.push_str(&format!(
        "  <ol id=\"ranking-list\" class=\"{prefix}-ranking\">\n"
    ));

    for id in order.iter() {
        let Some(item) = catalog.item(id) else {
            continue;
        };
        let text = if item.description.is_empty() {
            &item.name
        } else {
            &item.description
        };
        html.push_str(&format!(
            "    <li draggable=\"true\" data-id=\"{}\">{}</li>\n",
            escape_html(&item.id),
            escape_html(text)
        ));
    }

    html.push_str("  </ol>\n");
    html.push_str(&format!(
        "  <input type=\"hidden\" id=\"{name}\" name=\"{name}\" value=\"\">\n",
        name = fields::RANKING
    ));
    html
}

fn generate_textarea(name: &str, label: &str, content: &str, prefix: &str, indent: usize) -> String {
    let ind = "  ".repeat(indent);
    let field_id = name.replace('.', "-");

    let mut html = String::new();
    html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
    html.push_str(&format!(
        "{ind}  <label for=\"{field_id}\">{}</label>\n",
        escape_html(label)
    ));
    html.push_str(&format!(
        "{ind}  <textarea id=\"{field_id}\" name=\"{name}\" rows=\"3\" class=\"{prefix}-textarea\">{}</textarea>\n",
        escape_html(content)
    ));
    html.push_str(&format!("{ind}</div>\n"));
    html
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Keeps the hidden ranking input in sync with the list and disables the
/// submit button once the form is on its way.
const SCRIPT: &str = r#"<script>
(function () {
  var form = document.getElementById('survey-form');
  var list = document.getElementById('ranking-list');
  var input = document.getElementById('ranking');
  var dragged = null;

  function sync() {
    input.value = Array.prototype.map.call(list.children, function (li) {
      return li.getAttribute('data-id');
    }).join(',');
  }

  list.addEventListener('dragstart', function (e) {
    dragged = e.target.closest('li');
    e.dataTransfer.effectAllowed = 'move';
  });
  list.addEventListener('dragover', function (e) {
    e.preventDefault();
    var target = e.target.closest('li');
    if (!dragged || !target || target === dragged) return;
    var rect = target.getBoundingClientRect();
    var after = e.clientY > rect.top + rect.height / 2;
    list.insertBefore(dragged, after ? target.nextSibling : target);
  });
  list.addEventListener('drop', function (e) {
    e.preventDefault();
    sync();
  });
  list.addEventListener('dragend', function () {
    dragged = null;
    sync();
  });
  form.addEventListener('submit', function () {
    sync();
    var button = form.querySelector('button[type=submit]');
    if (button) button.disabled = true;
  });

  sync();
})();
</script>
"#;

/// Generate default CSS styles.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form {{
      max-width: 720px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-prelude, .{prefix}-epilogue {{
      margin: 1rem 0;
      white-space: pre-wrap;
    }}
    .{prefix}-banner {{
      margin: 1rem 0;
      padding: 0.75rem;
      border-radius: 4px;
    }}
    .{prefix}-banner-info {{ background: #e8f0fe; }}
    .{prefix}-banner-error {{ background: #fce8e6; }}
    .{prefix}-columns {{
      display: grid;
      grid-template-columns: 1fr 2fr;
      gap: 1rem;
    }}
    .{prefix}-image {{
      max-width: 100%;
    }}
    .{prefix}-field {{
      margin: 0.5rem 0;
    }}
    .{prefix}-field label {{
      display: block;
      margin-bottom: 0.25rem;
    }}
    .{prefix}-input, .{prefix}-textarea {{
      width: 100%;
      padding: 0.5rem;
      box-sizing: border-box;
    }}
    .{prefix}-fieldset {{
      margin: 0.5rem 0;
      border: none;
      padding: 0;
    }}
    .{prefix}-radio-option {{
      margin-right: 1rem;
    }}
    .{prefix}-ranking li {{
      margin: 0.25rem 0;
      padding: 0.5rem;
      border: 1px solid #ccc;
      background: #fafafa;
      cursor: grab;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 1rem;
    }}
    @media (max-width: 600px) {{
      .{prefix}-columns {{ grid-template-columns: 1fr; }}
    }}
  </style>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_options_chaining() {
        let options = HtmlOptions::new()
            .with_styles(false)
            .with_class_prefix("tasting")
            .with_assets_path("/static/")
            .with_action("/submit");

        assert!(!options.include_styles);
        assert_eq!(options.class_prefix, "tasting");
        assert_eq!(options.asset_url("praline1.jpg"), "/static/praline1.jpg");
        assert_eq!(options.action, "/submit");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Nougat" & 'Nuss'</b>"#),
            "&lt;b&gt;&quot;Nougat&quot; &amp; &#39;Nuss&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn banner_kinds() {
        let banner = Banner::error("kaputt");
        let html = generate_banner(&banner, "survey");
        assert!(html.contains("survey-banner-error"));
        assert!(html.contains("role=\"alert\""));

        assert_eq!(Banner::info("…").class(), "info");
        assert_eq!(Banner::info("…").kind, BannerKind::Info);
    }
}
