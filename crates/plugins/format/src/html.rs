//! HTML table renderer.

use std::fmt;

use gitreq_core::{Error, Result};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::{format_timestamp, FormatArgs, Formatter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The `.html` suffix turns on HTML auto-escaping in minijinja.
const TEMPLATE_NAME: &str = "table.html";

const TEMPLATE: &str = r#"<html>
  <head>
    <meta charset="utf-8" />
    <link href="style.css" rel="stylesheet">
  </head>
  <body>
    <table>
      <tr>
        <th class="header-repository">Repository</th>
        <th class="header-name">Name</th>
        <th class="header-created">Created</th>
        <th class="header-updated">Updated</th>
      </tr>
      {%- for r in requests %}
      <tr>
        <td class="item-repository">{{ r.repository }}</td>
        <td class="item-name"><a target="_top" href="{{ r.url }}">{{ r.name }}</a></td>
        <td class="item-created">{{ r.created }}</td>
        <td class="item-updated">{{ r.updated }}</td>
      </tr>
      {%- endfor %}
    </table>
  </body>
</html>
"#;

#[derive(Serialize)]
struct Row<'a> {
    repository: &'a str,
    name: &'a str,
    url: &'a str,
    created: String,
    updated: String,
}

/// Static HTML document, rendered once at construction.
#[derive(Debug)]
pub struct HtmlTable {
    html: String,
}

impl HtmlTable {
    pub fn new(args: FormatArgs) -> Result<Self> {
        let rows: Vec<Row<'_>> = args
            .requests
            .iter()
            .map(|r| Row {
                repository: &r.repository,
                name: &r.name,
                url: &r.url,
                created: format_timestamp(&r.created, args.timezone, TIMESTAMP_FORMAT),
                updated: format_timestamp(&r.updated, args.timezone, TIMESTAMP_FORMAT),
            })
            .collect();

        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)
            .map_err(|e| Error::Render(format!("invalid template: {}", e)))?;

        let html = env
            .get_template(TEMPLATE_NAME)
            .and_then(|tmpl| tmpl.render(context! { requests => rows }))
            .map_err(|e| Error::Render(format!("template rendering failed: {}", e)))?;

        Ok(Self { html })
    }
}

impl fmt::Display for HtmlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

impl Formatter for HtmlTable {}
