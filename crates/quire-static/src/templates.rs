//! Template engine for the page shell, index, impressum and stylesheet.

use minijinja::{context, Environment};

use crate::config::{SiteConfig, StyleConfig};
use crate::document::Page;

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the bundled templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("page.html".to_string(), PAGE_TEMPLATE.to_string())
            .expect("Failed to add page template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        env.add_template_owned("impressum.html".to_string(), IMPRESSUM_TEMPLATE.to_string())
            .expect("Failed to add impressum template");

        env.add_template_owned("opa.css".to_string(), STYLESHEET_TEMPLATE.to_string())
            .expect("Failed to add stylesheet template");

        Self { env }
    }

    /// Wrap a rendered note in the page shell.
    pub fn render_page(&self, site: &SiteConfig, content: &str) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            site => &site.content,
            mobile_width => site.style.mobile_width,
            content => content,
        })
    }

    /// Render the home page listing `pages` in the given order.
    pub fn render_index(&self, site: &SiteConfig, pages: &[Page]) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            site => &site.content,
            mobile_width => site.style.mobile_width,
            social => site.social_links(),
            pages => pages,
        })
    }

    /// Render the legal notice page.
    pub fn render_impressum(&self, site: &SiteConfig) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("impressum.html")?;

        tmpl.render(context! {
            site => &site.content,
            mobile_width => site.style.mobile_width,
        })
    }

    /// Render the site stylesheet from the configured colors.
    pub fn render_stylesheet(&self, style: &StyleConfig) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("opa.css")?;

        tmpl.render(context! { style => style })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ site.title }}</title>
  <link href="styles/monokai.css" rel="stylesheet">
  <link href="styles/opa.css" rel="stylesheet">
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/5.15.3/css/all.min.css">
  <link rel="icon" href="icon.png">
  <script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.3.1/highlight.min.js"></script>
  <script>hljs.highlightAll();</script>
  <script>
    window.MathJax = {
      tex: {
        inlineMath: [['$', '$']],
        displayMath: [['$$', '$$']],
        processEscapes: true,
        processEnvironments: true
      },
      options: {
        skipHtmlTags: ['script', 'noscript', 'style', 'textarea', 'pre']
      }
    };
  </script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/mathjax/3.2.2/es5/tex-mml-chtml.js"></script>
  <style>
    @media only screen and (max-width: {{ mobile_width }}px),
      only screen and (max-device-width: {{ mobile_width }}px) {
      .top-left { display: none !important; }
    }
  </style>
</head>
<body>
  <div class="top-left">
    <img src="icon.png" class="branding-icon" alt="">
    <h1>{{ site.title }}</h1>
  </div>
  <div class="home-link">
    <a href="index.html" target="_blank"><i class="fas fa-home"></i></a>
  </div>
  <div class="impressum-link"><a href="impressum.html">Impressum</a></div>
  <div class="container">
{% block content %}{% endblock %}
  </div>
</body>
</html>
"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}{{ content | safe }}{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<h1>{{ site.home_title }}</h1>
<p>{{ site.welcome_text }}</p>
<div class="page-list">
  <div class="search-row">
    <input type="text" id="search-bar" placeholder="Search by title, tag or date..." onkeyup="filterPages()">
    {% if social %}
    <div class="social-icons">
      {% for icon, href in social %}
      <a href="{{ href }}" target="_blank"><i class="{{ icon }}"></i></a>
      {% endfor %}
    </div>
    {% endif %}
  </div>
  {% for page in pages %}
  <div class="page-card"{% if page.hidden %} data-hidden="true" style="display: none"{% endif %}>
    <div class="page-info">
      <a href="{{ page.file_name }}">{{ page.title }}</a>
      <span class="date">{{ page.date }}</span>
    </div>
    <div class="tags">
      {% for tag in page.tags %}<span class="tag">{{ tag }}</span>{% endfor %}
    </div>
  </div>
  {% endfor %}
</div>
<script>
{% raw %}
  function filterPages() {
    let query = document.getElementById('search-bar').value.toLowerCase();
    let cards = document.getElementsByClassName('page-card');

    for (let card of cards) {
      let title = card.querySelector('a').textContent.toLowerCase();
      let tags = card.querySelector('div.tags').textContent.toLowerCase();
      let date = card.querySelector('span.date').textContent.toLowerCase();
      let matches = title.includes(query) || tags.includes(query) || date.includes(query);

      if (card.dataset.hidden === 'true') {
        let revealed = query.length > 0 && matches && 'hidden'.includes(query);
        card.style.display = revealed ? '' : 'none';
      } else {
        card.style.display = matches ? '' : 'none';
      }
    }
  }
{% endraw %}
</script>
{% endblock %}"##;

const IMPRESSUM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<h1>Impressum</h1>
<p><strong>Name:</strong> {{ site.name }}</p>
<p><strong>Address:</strong> {{ site.address }}</p>
<p><strong>Email:</strong> {{ site.email }}</p>
<h2>Disclaimer</h2>
<p>All information on this website is provided for general information purposes only. I do not take responsibility for the accuracy, completeness, or timeliness of the information provided.</p>
<p>Despite careful control, I assume no liability for the content of external links. The operators of the linked pages are solely responsible for their content.</p>
{% endblock %}"##;

const STYLESHEET_TEMPLATE: &str = r##"body {
  margin: 0;
  padding: 20px;
  min-height: 100vh;
  line-height: 1.6;
  font-family: Consolas, "Liberation Mono", Monaco, "Courier New", monospace;
  background-color: {{ style.dark_bg }};
  color: {{ style.text }};
  display: flex;
  justify-content: center;
}

.container {
  max-width: 800px;
  width: 100%;
  padding: 40px;
  border-radius: 8px;
}

a {
  color: {{ style.link }};
  text-decoration: none;
}

a:hover {
  color: {{ style.link_hover }};
  text-decoration: underline;
}

h1 {
  margin: 0.2em 0 0.1em 0;
}

h2, h3, h4, h5, h6 {
  color: #f0e3c0;
  margin: 0.01em 0 0.03em 0;
  font-family: Consolas, monospace;
  letter-spacing: 0.5px;
}

ul {
  padding-left: 20px;
  margin-top: 0.05em;
  margin-bottom: 0.5em;
}

p {
  margin-top: 0.05em;
}

li {
  margin-bottom: 0.5em;
}

pre, code {
  font-family: Consolas, monospace;
  background-color: {{ style.code_bg }};
  overflow-x: auto;
  font-size: 14px;
  line-height: 1.4;
}

b, strong {
  color: {{ style.bold }};
}

i, em {
  color: {{ style.italic }};
}

.top-left {
  position: fixed;
  left: 10px;
  display: flex;
  align-items: center;
}

.branding-icon {
  height: 50px;
  width: 50px;
  margin-right: 10px;
  border-radius: 50%;
}

.home-link {
  position: fixed;
  top: 10px;
  right: 10px;
}

.impressum-link {
  position: fixed;
  bottom: 10px;
  left: 10px;
}

.table-bordered {
  empty-cells: show;
  border-collapse: collapse;
  width: 75%;
}

.table-bordered th, .table-bordered td {
  border: 2px solid rgba(255, 255, 255, 0.2);
}

.page-list {
  display: flex;
  flex-direction: column;
  gap: 1rem;
  margin-top: 1rem;
}

.search-row {
  display: flex;
  justify-content: space-between;
  align-items: center;
}

.page-card {
  background-color: rgba(40, 40, 40, 0.5);
  border: 1px solid rgba(255, 255, 255, 0.1);
  border-radius: 4px;
  padding: 1rem;
  display: flex;
  justify-content: space-between;
  align-items: center;
}

.page-card:hover {
  background-color: rgba(50, 50, 50, 0.8);
}

.page-info {
  display: flex;
  flex-direction: column;
  gap: 0.25rem;
}

.date {
  font-size: 0.9em;
  color: #888;
}

.tags {
  display: flex;
  gap: 0.5rem;
  flex-wrap: wrap;
}

.tag {
  background-color: {{ style.tag_bg }};
  color: white;
  padding: 0.25rem 0.75rem;
  border-radius: 999px;
  font-size: 0.8em;
}

.social-icons a {
  margin-left: 10px;
  text-decoration: none;
}

input {
  padding: 10px;
  width: 100%;
  max-width: 400px;
  border: {{ style.search_border_size }}px solid {{ style.search_border }};
  border-radius: 4px;
  font-size: 12px;
  background-color: {{ style.search_bg }};
  transition: border-color 0.3s;
  color: {{ style.search_text }};
}

input:focus {
  outline: none;
  border-color: {{ style.search_border_focus }};
}

.admonition {
  border-left: 4px solid #bbb;
  padding: 10px 15px;
  margin: 10px 0;
  border-radius: 6px;
  background-color: #2e2e2e;
  color: #e0e0e0;
  font-family: "Consolas", monospace;
}

.admonition.warning {
  border-left-color: #ff6b6b;
  background-color: #402c2c;
  color: #ffeaea;
}

.admonition.warning .admonition-title {
  color: #ff9b9b;
}

.admonition.question {
  border-left-color: #6baaff;
  background-color: #2c3b40;
  color: #d2e8ff;
}

.admonition.question .admonition-title {
  color: #a3d7ff;
}

.admonition.callout {
  border-left-color: #ffcc6b;
  background-color: #40392c;
  color: #ffe8d2;
}

.admonition.callout .admonition-title {
  color: #ffd3a3;
}

.admonition.quote {
  border-left-color: #a6a6a6;
  background-color: #3b3b3b;
  color: #d6d6d6;
  font-style: italic;
}

.admonition.quote .admonition-title {
  color: #c6c6c6;
}

.admonition-title {
  font-size: 1em;
  margin-bottom: 5px;
  letter-spacing: 0.05em;
  font-weight: bold;
}

.admonition p {
  margin: 0;
  line-height: 1.5;
}
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::UNIX_EPOCH;

    fn page(name: &str, tags: &[&str]) -> Page {
        let tags: BTreeSet<String> = tags.iter().map(|t| t.to_string()).collect();
        Page::new(format!("{name}.html"), tags, UNIX_EPOCH)
    }

    #[test]
    fn renders_page_shell() {
        let engine = TemplateEngine::new();
        let site = SiteConfig::bundled();

        let html = engine.render_page(&site, "<p>Hello world</p>").unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Notes</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains("hljs.highlightAll();"));
        assert!(html.contains("inlineMath: [['$', '$']]"));
        assert!(html.contains("max-width: 768px"));
        assert!(html.contains(r#"href="impressum.html""#));
        assert!(html.contains(r#"href="index.html""#));
    }

    #[test]
    fn escapes_site_title() {
        let engine = TemplateEngine::new();
        let mut site = SiteConfig::bundled();
        site.content.title = "<b>Notes</b>".to_string();

        let html = engine.render_page(&site, "").unwrap();

        assert!(html.contains("&lt;b&gt;Notes"));
    }

    #[test]
    fn index_lists_pages_in_order() {
        let engine = TemplateEngine::new();
        let site = SiteConfig::bundled();
        let pages = vec![page("second", &["travel"]), page("first", &[])];

        let html = engine.render_index(&site, &pages).unwrap();

        let second = html.find(">second</a>").unwrap();
        let first = html.find(">first</a>").unwrap();
        assert!(second < first);
        assert!(html.contains(r#"<span class="tag">travel</span>"#));
        assert!(html.contains("<span class=\"date\">"));
        assert!(html.contains("function filterPages()"));
    }

    #[test]
    fn index_marks_hidden_pages() {
        let engine = TemplateEngine::new();
        let site = SiteConfig::bundled();
        let pages = vec![page("secret", &["hidden"]), page("public", &[])];

        let html = engine.render_index(&site, &pages).unwrap();

        assert_eq!(html.matches(r#"data-hidden="true""#).count(), 1);
        assert!(html.contains(r#"data-hidden="true" style="display: none""#));
    }

    #[test]
    fn index_omits_empty_social_links() {
        let engine = TemplateEngine::new();
        let mut site = SiteConfig::bundled();
        site.content.email = String::new();

        let html = engine.render_index(&site, &[]).unwrap();

        assert!(!html.contains("social-icons"));

        site.content.github = "https://github.com/jane".to_string();
        let html = engine.render_index(&site, &[]).unwrap();

        assert!(html.contains("fab fa-github"));
        assert!(!html.contains("fab fa-youtube"));
    }

    #[test]
    fn renders_impressum() {
        let engine = TemplateEngine::new();
        let site = SiteConfig::bundled();

        let html = engine.render_impressum(&site).unwrap();

        assert!(html.contains("<h1>Impressum</h1>"));
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("<div class=\"container\">"));
    }

    #[test]
    fn renders_stylesheet_from_style() {
        let engine = TemplateEngine::new();
        let mut site = SiteConfig::bundled();
        site.style.tag_bg = "#123456".to_string();

        let css = engine.render_stylesheet(&site.style).unwrap();

        assert!(css.contains("background-color: #123456;"));
        assert!(css.contains(".admonition.warning"));
    }
}
