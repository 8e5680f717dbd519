//! Template rendering and prompt assembly.

use kindling_core::config::Template;
use kindling_core::KindlingError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Fill every `{name}` placeholder of the template with a value drawn from
/// its variable pool. One value is drawn per non-empty pool, in pool-name order.
pub fn fill_template<R: Rng + ?Sized>(template: &Template, rng: &mut R) -> Result<String, KindlingError> {
    let mut values = BTreeMap::new();
    for (name, options) in &template.variable_pools {
        if let Some(value) = options.choose(rng) {
            values.insert(name.as_str(), value.as_str());
        }
    }
    substitute(&template.id, &template.base_text, &values)
}

/// Replace `{name}` placeholders in `text`; `{{` and `}}` produce literal braces.
pub fn substitute(
    template_id: &str,
    text: &str,
    values: &BTreeMap<&str, &str>,
) -> Result<String, KindlingError> {
    let render_error = |reason: String| KindlingError::TemplateRender {
        template: template_id.to_string(),
        reason,
    };

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(render_error(format!(
                                "unterminated placeholder '{{{name}'"
                            )))
                        }
                    }
                }
                let value = values
                    .get(name.as_str())
                    .ok_or_else(|| render_error(format!("no values for placeholder '{name}'")))?;
                out.push_str(value);
            }
            '}' => return Err(render_error("unmatched '}'".to_string())),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Join the trimmed base text with any non-blank auxiliary texts, space-separated.
pub fn assemble(base: &str, extras: &[Option<&str>]) -> String {
    std::iter::once(base)
        .chain(extras.iter().flatten().copied())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
