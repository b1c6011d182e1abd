//! HTML rendering for the advisor page.
//!
//! The page is a single tera template.  Its name ends in `.html`, so every
//! value placed in the context is autoescaped on output.

use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    base::types::{Res, Submission},
    interaction::submission::MISSING_QUESTION_WARNING,
    service::dataset::{DatasetSnapshot, eq_ignoring_case},
};

pub const PAGE_TITLE: &str = "AI Car Buying Advisor";
pub const ADVISORY_HEADING: &str = "Your Advisory";
pub const QUESTION_LABEL: &str = "How can I help you today?";
pub const SUBMIT_LABEL: &str = "Get Advice";

const INTRO: [&str; 2] = [
    "Hello! I'm your personal car buying assistant. I'm here to help you make the best decision.",
    "You can ask me about models, request comparisons, or ask for recommendations.",
];

const PLACEHOLDER: &str = "Example: 'Compare the 2024 Toyota Corolla and the 2024 Honda Civic. Make a table of their pros and cons.'";

const PAGE_TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; padding: 0 1rem; }
textarea { width: 100%; height: 6rem; }
.warning { background: #fff4d6; border-left: 4px solid #e0a800; padding: 0.5rem 1rem; }
.error { background: #fde2e1; border-left: 4px solid #d93025; padding: 0.5rem 1rem; }
.advisory { max-height: 40rem; overflow-y: auto; white-space: pre-wrap; border-top: 1px solid #ccc; padding-top: 1rem; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ccc; padding: 0.25rem 0.5rem; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
{% for paragraph in intro %}<p>{{ paragraph }}</p>
{% endfor %}
{%- if brands is defined %}
<form method="get" action="/">
<label for="brand">Filter by brand</label>
<select id="brand" name="brand" onchange="this.form.submit()">
<option value="">All brands</option>
{% for option in brands %}<option value="{{ option.name }}"{% if option.selected %} selected{% endif %}>{{ option.name }}</option>
{% endfor %}</select>
<noscript><button type="submit">Filter</button></noscript>
</form>
{% if rows is defined %}<table>
<tr>{% for header in headers %}<th>{{ header }}</th>{% endfor %}</tr>
{% for row in rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}</table>
{% else %}<p>{{ model_count }} models loaded.</p>
{% endif %}
{%- endif %}
<form method="post" action="/ask">
<label for="question">{{ question_label }}</label>
<textarea id="question" name="question" placeholder="{{ placeholder }}">{{ question }}</textarea>
{% if brand is defined %}<input type="hidden" name="brand" value="{{ brand }}">
{% endif %}<button type="submit">{{ submit_label }}</button>
</form>
{% if warning is defined %}<p class="warning">{{ warning }}</p>
{% endif %}{% if advisory is defined %}<hr>
<h2>{{ advisory_heading }}</h2>
<div class="advisory">{{ advisory }}</div>
{% endif %}{% if notice is defined %}<p class="error">{{ notice }}</p>
<div class="advisory">{{ fallback }}</div>
{% endif %}</body>
</html>
"#;

/// Everything needed to draw the page once.
pub struct PageView<'a> {
    pub question: &'a str,
    pub outcome: Option<&'a Submission>,
    pub dataset: Option<&'a DatasetSnapshot>,
    pub brand: Option<&'a str>,
}

#[derive(Serialize)]
struct BrandOption<'a> {
    name: &'a str,
    selected: bool,
}

/// The compiled page template.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct PageRenderer {
    tera: Arc<Tera>,
}

impl PageRenderer {
    /// Compile the page template.
    pub fn new() -> Res<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;

        Ok(Self { tera: Arc::new(tera) })
    }

    pub fn render(&self, view: &PageView<'_>) -> Res<String> {
        Ok(self.tera.render(PAGE_TEMPLATE_NAME, &build_context(view))?)
    }
}

fn build_context(view: &PageView<'_>) -> Context {
    let mut context = Context::new();

    context.insert("title", PAGE_TITLE);
    context.insert("intro", &INTRO);
    context.insert("question_label", QUESTION_LABEL);
    context.insert("placeholder", PLACEHOLDER);
    context.insert("submit_label", SUBMIT_LABEL);
    context.insert("advisory_heading", ADVISORY_HEADING);
    context.insert("question", view.question);

    if let Some(brand) = view.brand {
        context.insert("brand", brand);
    }

    // The read-only brand filter and the rows it selects.

    if let Some(dataset) = view.dataset {
        let brands = dataset
            .brands()
            .into_iter()
            .map(|name| BrandOption {
                name,
                selected: view.brand.is_some_and(|brand| eq_ignoring_case(brand, name)),
            })
            .collect::<Vec<_>>();

        context.insert("brands", &brands);
        context.insert("model_count", &dataset.len());

        if let Some(brand) = view.brand {
            context.insert("headers", dataset.headers());
            context.insert("rows", &dataset.filter_by_brand(brand));
        }
    }

    match view.outcome {
        Some(Submission::MissingQuestion) => context.insert("warning", MISSING_QUESTION_WARNING),
        Some(Submission::Advisory(text)) => context.insert("advisory", text),
        Some(Submission::Fallback { message, notice }) => {
            context.insert("fallback", message);
            context.insert("notice", notice);
        }
        None => {}
    }

    context
}
