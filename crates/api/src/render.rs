//! HTML rendering for the wish pages.
//!
//! Templates are compiled into the binary and loaded once. Every piece of
//! user-supplied text goes through [`escape_html`] and is then marked safe,
//! so template auto-escaping never double-escapes it and no user markup can
//! reach the page unescaped.

use minijinja::{context, Environment, Value};
use wishlink_core::html::{escape_html, escape_multiline};
use wishlink_core::page::Page;
use wishlink_core::wish::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_SENDER_LENGTH};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("create.html", include_str!("../templates/create.html")),
    ("view.html", include_str!("../templates/view.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// Compiled page templates.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Compile all page templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render `page` to a complete HTML document.
    pub fn render(&self, page: &Page) -> Result<String, minijinja::Error> {
        let title = escaped(&page.title());

        match page {
            Page::Create => self.env.get_template("create.html")?.render(context! {
                title,
                max_name => MAX_NAME_LENGTH,
                max_description => MAX_DESCRIPTION_LENGTH,
                max_sender => MAX_SENDER_LENGTH,
            }),
            Page::View(record) => {
                let sender = match record.sender.as_deref() {
                    Some(sender) => escaped(sender),
                    None => Value::from(()),
                };
                self.env.get_template("view.html")?.render(context! {
                    title,
                    name => escaped(&record.name),
                    message => Value::from_safe_string(escape_multiline(&record.description)),
                    sender,
                })
            }
            Page::Error { message, .. } => self.env.get_template("error.html")?.render(context! {
                title,
                message => escaped(message),
            }),
        }
    }
}

fn escaped(text: &str) -> Value {
    Value::from_safe_string(escape_html(text))
}
